//! Host-facing nodes and their registries.
//!
//! Each node owns its state for the lifetime of the host session and is
//! invoked once per graph execution through [`Node::invoke`].

mod auto_prompt_line;
mod number_counter;
mod prompt_line;
pub mod registry;

use std::collections::BTreeMap;

use crate::core::types::{NodeSchema, Value, ValueType};
use crate::io::error::LoadError;

pub use auto_prompt_line::{AutoPrompt, AutoPromptLineLoader, LineSequence};
pub use number_counter::SimpleNumberCounter;
pub use prompt_line::PromptLineLoader;

/// Named inputs for one invocation. Omitted names take the schema default.
pub type Inputs = BTreeMap<String, Value>;

/// Errors surfaced to the host from a node invocation.
#[derive(Debug, thiserror::Error)]
pub enum NodeError {
    #[error("unknown node type '{0}'")]
    UnknownNode(String),

    #[error("input '{0}' is not declared by this node")]
    UndeclaredInput(String),

    #[error("input '{name}' expects {expected:?}, got {actual:?}")]
    TypeMismatch {
        name: String,
        expected: ValueType,
        actual: ValueType,
    },

    #[error("input '{name}' must be >= {min} (got {value})")]
    OutOfRange { name: String, min: i64, value: i64 },

    #[error(transparent)]
    Load(#[from] LoadError),
}

/// A unit of computation the host can schedule.
pub trait Node {
    /// Declared inputs and outputs.
    fn schema(&self) -> NodeSchema;

    /// Run one tick.
    fn invoke(&mut self, inputs: &Inputs) -> Result<Outputs, NodeError>;
}

/// Ordered outputs of one invocation, matching the schema's output order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Outputs(Vec<(String, Value)>);

impl Outputs {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, name: &str, value: impl Into<Value>) -> Self {
        self.0.push((name.to_string(), value.into()));
        self
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.0
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value)
    }

    pub fn values(&self) -> impl Iterator<Item = &Value> {
        self.0.iter().map(|(_, value)| value)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Typed access to invocation inputs, applying schema defaults and bounds.
struct InputReader<'a> {
    schema: &'a NodeSchema,
    inputs: &'a Inputs,
}

impl<'a> InputReader<'a> {
    fn new(schema: &'a NodeSchema, inputs: &'a Inputs) -> Self {
        Self { schema, inputs }
    }

    fn value(&self, name: &str) -> Result<(&'a Value, Option<i64>), NodeError> {
        let spec = self
            .schema
            .input(name)
            .ok_or_else(|| NodeError::UndeclaredInput(name.to_string()))?;
        let value = self.inputs.get(name).unwrap_or(&spec.default);
        Ok((value, spec.min))
    }

    fn mismatch(name: &str, expected: ValueType, value: &Value) -> NodeError {
        NodeError::TypeMismatch {
            name: name.to_string(),
            expected,
            actual: value.value_type(),
        }
    }

    fn float(&self, name: &str) -> Result<f64, NodeError> {
        let (value, _) = self.value(name)?;
        value
            .as_f64()
            .ok_or_else(|| Self::mismatch(name, ValueType::Float, value))
    }

    fn int(&self, name: &str) -> Result<i64, NodeError> {
        let (value, min) = self.value(name)?;
        let int = value
            .as_i64()
            .ok_or_else(|| Self::mismatch(name, ValueType::Int, value))?;
        match min {
            Some(min) if int < min => Err(NodeError::OutOfRange {
                name: name.to_string(),
                min,
                value: int,
            }),
            _ => Ok(int),
        }
    }

    fn boolean(&self, name: &str) -> Result<bool, NodeError> {
        let (value, _) = self.value(name)?;
        value
            .as_bool()
            .ok_or_else(|| Self::mismatch(name, ValueType::Boolean, value))
    }

    fn string(&self, name: &str) -> Result<&'a str, NodeError> {
        let (value, _) = self.value(name)?;
        value
            .as_str()
            .ok_or_else(|| Self::mismatch(name, ValueType::String, value))
    }
}
