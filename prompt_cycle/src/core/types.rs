//! Shared value and schema types for node inputs and outputs.
//!
//! These types describe the contract between a node and the host that invokes
//! it. They carry no I/O and serialize deterministically.

use serde::{Deserialize, Serialize};
use serde_json::json;

/// Scalar type tag understood by the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ValueType {
    Float,
    Int,
    Boolean,
    String,
}

impl ValueType {
    pub fn as_str(self) -> &'static str {
        match self {
            ValueType::Float => "FLOAT",
            ValueType::Int => "INT",
            ValueType::Boolean => "BOOLEAN",
            ValueType::String => "STRING",
        }
    }
}

/// A single scalar passed into or out of a node.
///
/// Untagged so that plain JSON scalars from the host deserialize directly.
/// Variant order matters: integers must be tried before floats.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    Boolean(bool),
    Int(i64),
    Float(f64),
    String(String),
}

impl Value {
    pub fn value_type(&self) -> ValueType {
        match self {
            Value::Boolean(_) => ValueType::Boolean,
            Value::Int(_) => ValueType::Int,
            Value::Float(_) => ValueType::Float,
            Value::String(_) => ValueType::String,
        }
    }

    /// Float view; integers widen.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Float(value) => Some(*value),
            Value::Int(value) => Some(*value as f64),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Int(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Boolean(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(value) => Some(value),
            _ => None,
        }
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Float(value)
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Int(value)
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Boolean(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::String(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::String(value)
    }
}

/// Declared input: name, type, default and an optional lower bound.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InputSpec {
    pub name: String,
    #[serde(rename = "type")]
    pub value_type: ValueType,
    pub default: Value,
    /// Inclusive lower bound, only meaningful for `INT` inputs.
    pub min: Option<i64>,
    pub required: bool,
}

impl InputSpec {
    fn new(name: &str, default: Value) -> Self {
        Self {
            name: name.to_string(),
            value_type: default.value_type(),
            default,
            min: None,
            required: true,
        }
    }

    pub fn float(name: &str, default: f64) -> Self {
        Self::new(name, Value::Float(default))
    }

    pub fn int(name: &str, default: i64) -> Self {
        Self::new(name, Value::Int(default))
    }

    pub fn boolean(name: &str, default: bool) -> Self {
        Self::new(name, Value::Boolean(default))
    }

    pub fn string(name: &str, default: &str) -> Self {
        Self::new(name, Value::from(default))
    }

    pub fn min(mut self, min: i64) -> Self {
        self.min = Some(min);
        self
    }

    /// Widget options as the host expects them (`{"default": .., "min": ..}`).
    fn options_json(&self) -> serde_json::Value {
        let mut options = json!({ "default": self.default });
        if let Some(min) = self.min {
            options["min"] = json!(min);
        }
        options
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OutputSpec {
    pub name: String,
    #[serde(rename = "type")]
    pub value_type: ValueType,
}

/// Everything the host needs to render and wire a node.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NodeSchema {
    pub category: String,
    /// Name of the compute entry point.
    pub function: String,
    pub inputs: Vec<InputSpec>,
    pub outputs: Vec<OutputSpec>,
}

impl NodeSchema {
    pub fn new(category: &str, function: &str) -> Self {
        Self {
            category: category.to_string(),
            function: function.to_string(),
            inputs: Vec::new(),
            outputs: Vec::new(),
        }
    }

    pub fn required(mut self, input: InputSpec) -> Self {
        self.inputs.push(InputSpec {
            required: true,
            ..input
        });
        self
    }

    pub fn optional(mut self, input: InputSpec) -> Self {
        self.inputs.push(InputSpec {
            required: false,
            ..input
        });
        self
    }

    pub fn output(mut self, name: &str, value_type: ValueType) -> Self {
        self.outputs.push(OutputSpec {
            name: name.to_string(),
            value_type,
        });
        self
    }

    pub fn input(&self, name: &str) -> Option<&InputSpec> {
        self.inputs.iter().find(|input| input.name == name)
    }

    /// Host-facing JSON: inputs grouped into `required`/`optional`, outputs as
    /// parallel type and name arrays.
    pub fn to_json(&self) -> serde_json::Value {
        let mut required = serde_json::Map::new();
        let mut optional = serde_json::Map::new();
        for input in &self.inputs {
            let entry = json!([input.value_type.as_str(), input.options_json()]);
            if input.required {
                required.insert(input.name.clone(), entry);
            } else {
                optional.insert(input.name.clone(), entry);
            }
        }
        json!({
            "category": self.category,
            "function": self.function,
            "input": { "required": required, "optional": optional },
            "output": self.outputs.iter().map(|o| o.value_type.as_str()).collect::<Vec<_>>(),
            "output_name": self.outputs.iter().map(|o| o.name.as_str()).collect::<Vec<_>>(),
        })
    }
}
