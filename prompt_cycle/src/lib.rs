//! Step counter and prompt line loader nodes for node-graph image workflows.
//!
//! The host calls each node once per graph execution. Nodes keep their own
//! state between calls; nothing is shared between instances.
//!
//! - **[`core`]**: Pure, deterministic logic (counter state machine, index
//!   wraparound, value and schema types). No I/O.
//! - **[`io`]**: Side-effecting helpers (config, file formats, the
//!   modification-time line cache).
//! - **[`nodes`]**: Host-facing nodes and the static registries.

pub mod core;
pub mod io;
pub mod logging;
pub mod nodes;
#[cfg(any(test, feature = "test-support"))]
pub mod test_support;

pub use crate::core::types::{NodeSchema, Value, ValueType};
pub use io::config::{NodeConfig, load_config};
pub use io::error::LoadError;
pub use nodes::registry::{NODE_CLASS_MAPPINGS, NODE_DISPLAY_NAME_MAPPINGS, NodeRegistry};
pub use nodes::{Inputs, Node, NodeError, Outputs};
