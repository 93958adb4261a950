//! Node defaults stored in a TOML file.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result, anyhow};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Defaults for every node input (TOML).
///
/// These become the defaults the node schemas advertise and the values used
/// when the host omits an input. Missing fields keep the built-in defaults.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct NodeConfig {
    pub counter: CounterConfig,
    pub loader: LoaderConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct CounterConfig {
    pub start_value: f64,
    pub step: f64,
    /// `-1` for an endless counter.
    pub max_steps: i64,
    pub auto_reset: bool,
}

impl Default for CounterConfig {
    fn default() -> Self {
        Self {
            start_value: 0.0,
            step: 1.0,
            max_steps: -1,
            auto_reset: false,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct LoaderConfig {
    /// Trim the emitted prompt.
    pub strip_whitespace: bool,
    /// CSV header to read; empty joins whole rows.
    pub csv_column: String,
    /// Joiner used when flattening a whole CSV row.
    pub csv_separator: String,
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            strip_whitespace: true,
            csv_column: String::new(),
            csv_separator: ", ".to_string(),
        }
    }
}

impl NodeConfig {
    pub fn validate(&self) -> Result<()> {
        if self.counter.max_steps < -1 {
            return Err(anyhow!(
                "counter.max_steps must be >= -1 (got {})",
                self.counter.max_steps
            ));
        }
        if self.loader.csv_separator.contains(['\n', '\r']) {
            return Err(anyhow!("loader.csv_separator must not contain a newline"));
        }
        Ok(())
    }
}

/// Parse config from TOML text.
pub fn parse_config(contents: &str) -> Result<NodeConfig> {
    let cfg: NodeConfig = toml::from_str(contents).context("parse node config")?;
    cfg.validate()?;
    Ok(cfg)
}

/// Load config from a TOML file.
///
/// If the file is missing, returns `NodeConfig::default()`.
pub fn load_config(path: &Path) -> Result<NodeConfig> {
    if !path.exists() {
        debug!(path = %path.display(), "no node config, using defaults");
        return Ok(NodeConfig::default());
    }
    let contents = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    parse_config(&contents).with_context(|| format!("load {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn load_missing_returns_default() {
        let temp = tempfile::tempdir().expect("tempdir");
        let cfg = load_config(&temp.path().join("missing.toml")).expect("load");
        assert_eq!(cfg, NodeConfig::default());
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let temp = tempfile::tempdir().expect("tempdir");
        let path = temp.path().join("nodes.toml");
        fs::write(&path, "[counter]\nstep = 0.5\n\n[loader]\ncsv_column = \"prompt\"\n")
            .expect("write");
        let cfg = load_config(&path).expect("load");
        assert_eq!(cfg.counter.step, 0.5);
        assert_eq!(cfg.counter.max_steps, -1);
        assert_eq!(cfg.loader.csv_column, "prompt");
        assert!(cfg.loader.strip_whitespace);
    }

    #[test]
    fn rejects_invalid_values() {
        let err = parse_config("[counter]\nmax_steps = -2\n").expect_err("max_steps");
        assert!(err.to_string().contains("max_steps"));

        let err = parse_config("[loader]\ncsv_separator = \"\\n\"\n").expect_err("separator");
        assert!(err.to_string().contains("csv_separator"));
    }

    #[test]
    fn parse_errors_name_the_file() {
        let temp = tempfile::tempdir().expect("tempdir");
        let path = temp.path().join("broken.toml");
        fs::write(&path, "[counter\n").expect("write");
        let err = load_config(&path).expect_err("broken");
        assert!(format!("{err:#}").contains("broken.toml"));
    }
}
