//! Static node registries exposed to the host.
//!
//! The host discovers nodes through two tables keyed by node identifier: one
//! maps to a constructor, the other to a human-readable display name.

use serde_json::json;

use crate::core::types::NodeSchema;
use crate::io::config::NodeConfig;
use crate::nodes::{AutoPromptLineLoader, Node, NodeError, PromptLineLoader, SimpleNumberCounter};

/// Builds a fresh node instance with its own state.
pub type NodeFactory = fn(&NodeConfig) -> Box<dyn Node>;

fn number_counter(config: &NodeConfig) -> Box<dyn Node> {
    Box::new(SimpleNumberCounter::new(&config.counter))
}

fn prompt_line_loader(config: &NodeConfig) -> Box<dyn Node> {
    Box::new(PromptLineLoader::new(&config.loader))
}

fn auto_prompt_line_loader(config: &NodeConfig) -> Box<dyn Node> {
    Box::new(AutoPromptLineLoader::new(&config.loader))
}

/// Node identifier to constructor.
pub static NODE_CLASS_MAPPINGS: &[(&str, NodeFactory)] = &[
    ("SimpleNumberCounter", number_counter),
    ("PromptLineLoader", prompt_line_loader),
    ("AutoPromptLineLoader", auto_prompt_line_loader),
];

/// Node identifier to display name.
pub static NODE_DISPLAY_NAME_MAPPINGS: &[(&str, &str)] = &[
    ("SimpleNumberCounter", "Simple Number Counter"),
    ("PromptLineLoader", "Prompt Line Loader"),
    ("AutoPromptLineLoader", "Auto Prompt Line Loader"),
];

/// Both registries plus the config new instances are built with.
#[derive(Debug, Clone, Default)]
pub struct NodeRegistry {
    config: NodeConfig,
}

impl NodeRegistry {
    pub fn new(config: NodeConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &NodeConfig {
        &self.config
    }

    /// Registered identifiers in registration order.
    pub fn ids(&self) -> impl Iterator<Item = &'static str> {
        NODE_CLASS_MAPPINGS.iter().map(|(id, _)| *id)
    }

    /// Construct a new instance of `id`.
    pub fn create(&self, id: &str) -> Result<Box<dyn Node>, NodeError> {
        NODE_CLASS_MAPPINGS
            .iter()
            .find(|(key, _)| *key == id)
            .map(|(_, factory)| factory(&self.config))
            .ok_or_else(|| NodeError::UnknownNode(id.to_string()))
    }

    pub fn display_name(&self, id: &str) -> Option<&'static str> {
        NODE_DISPLAY_NAME_MAPPINGS
            .iter()
            .find(|(key, _)| *key == id)
            .map(|(_, name)| *name)
    }

    /// Schemas of all registered nodes, in registration order.
    pub fn schemas(&self) -> Vec<(&'static str, NodeSchema)> {
        NODE_CLASS_MAPPINGS
            .iter()
            .map(|(id, factory)| (*id, factory(&self.config).schema()))
            .collect()
    }

    /// Host-facing description of every node, keyed by identifier.
    pub fn schemas_json(&self) -> serde_json::Value {
        let nodes: serde_json::Map<String, serde_json::Value> = self
            .schemas()
            .into_iter()
            .map(|(id, schema)| {
                let mut entry = schema.to_json();
                entry["display_name"] = json!(self.display_name(id).unwrap_or(id));
                (id.to_string(), entry)
            })
            .collect();
        serde_json::Value::Object(nodes)
    }
}
