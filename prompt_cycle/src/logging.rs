//! Development-time tracing for debugging node behavior.
//!
//! The host owns process-wide logging; this is for running the nodes outside
//! it (tests, local harnesses). Output goes to stderr and is never part of a
//! node's outputs.

use anyhow::{Result, anyhow};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize a tracing subscriber.
///
/// Reads `RUST_LOG`. Defaults to `warn` if unset. Output: stderr, compact
/// format. Fails if a global subscriber is already installed.
///
/// # Example
/// ```bash
/// RUST_LOG=prompt_cycle=debug cargo test
/// ```
pub fn init() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr).compact())
        .try_init()
        .map_err(|err| anyhow!("install tracing subscriber: {err}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn second_init_reports_instead_of_panicking() {
        let _ = init();
        assert!(init().is_err());
    }
}
