//! `SimpleNumberCounter`: emits the next number of a sequence on every tick.

use crate::core::counter::{CounterParams, CounterState, Emission};
use crate::core::types::{InputSpec, NodeSchema, ValueType};
use crate::io::config::CounterConfig;
use crate::nodes::{InputReader, Inputs, Node, NodeError, Outputs};

pub(crate) const CATEGORY: &str = "Utils 🧮";

/// Stateful counter node.
///
/// Inputs: `start_value`, `step`, `max_steps` (`-1` for endless), optional
/// `auto_reset` and `reset`. Outputs: `value`, `step_index`, `done`.
#[derive(Debug, Clone, Default)]
pub struct SimpleNumberCounter {
    defaults: CounterConfig,
    state: CounterState,
}

impl SimpleNumberCounter {
    pub fn new(defaults: &CounterConfig) -> Self {
        Self {
            defaults: defaults.clone(),
            state: CounterState::new(),
        }
    }

    /// Typed entry point behind [`Node::invoke`].
    pub fn count(&mut self, params: CounterParams, reset: bool) -> Emission {
        self.state.advance(params, reset)
    }

    pub fn state(&self) -> &CounterState {
        &self.state
    }
}

impl Node for SimpleNumberCounter {
    fn schema(&self) -> NodeSchema {
        NodeSchema::new(CATEGORY, "count")
            .required(InputSpec::float("start_value", self.defaults.start_value))
            .required(InputSpec::float("step", self.defaults.step))
            .required(InputSpec::int("max_steps", self.defaults.max_steps).min(-1))
            .optional(InputSpec::boolean("auto_reset", self.defaults.auto_reset))
            .optional(InputSpec::boolean("reset", false))
            .output("value", ValueType::Float)
            .output("step_index", ValueType::Int)
            .output("done", ValueType::Boolean)
    }

    fn invoke(&mut self, inputs: &Inputs) -> Result<Outputs, NodeError> {
        let schema = self.schema();
        let reader = InputReader::new(&schema, inputs);
        let params = CounterParams {
            start_value: reader.float("start_value")?,
            step: reader.float("step")?,
            max_steps: reader.int("max_steps")?,
            auto_reset: reader.boolean("auto_reset")?,
        };
        let emission = self.count(params, reader.boolean("reset")?);
        Ok(Outputs::new()
            .with("value", emission.value)
            .with("step_index", emission.step_index)
            .with("done", emission.done))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::Value;

    fn inputs(pairs: &[(&str, Value)]) -> Inputs {
        pairs
            .iter()
            .map(|(name, value)| (name.to_string(), value.clone()))
            .collect()
    }

    #[test]
    fn invoke_uses_config_defaults_for_omitted_inputs() {
        let defaults = CounterConfig {
            start_value: 10.0,
            step: 2.0,
            max_steps: 2,
            auto_reset: false,
        };
        let mut node = SimpleNumberCounter::new(&defaults);
        let empty = Inputs::new();

        let first = node.invoke(&empty).expect("invoke");
        assert_eq!(first.get("value"), Some(&Value::Float(12.0)));
        assert_eq!(first.get("step_index"), Some(&Value::Int(1)));
        assert_eq!(first.get("done"), Some(&Value::Boolean(false)));

        let second = node.invoke(&empty).expect("invoke");
        assert_eq!(second.get("done"), Some(&Value::Boolean(true)));
        assert_eq!(node.invoke(&empty).expect("invoke"), second);
    }

    #[test]
    fn integer_start_value_widens() {
        let mut node = SimpleNumberCounter::default();
        let out = node
            .invoke(&inputs(&[("start_value", Value::Int(5))]))
            .expect("invoke");
        assert_eq!(out.get("value"), Some(&Value::Float(6.0)));
    }

    #[test]
    fn rejects_bad_inputs() {
        let mut node = SimpleNumberCounter::default();
        let err = node
            .invoke(&inputs(&[("max_steps", Value::Int(-2))]))
            .expect_err("below min");
        assert!(matches!(err, NodeError::OutOfRange { min: -1, value: -2, .. }));

        let err = node
            .invoke(&inputs(&[("max_steps", Value::Float(3.0))]))
            .expect_err("float for int");
        assert!(matches!(
            err,
            NodeError::TypeMismatch { expected: ValueType::Int, actual: ValueType::Float, .. }
        ));

        let err = node
            .invoke(&inputs(&[("reset", Value::from("yes"))]))
            .expect_err("string for bool");
        assert!(matches!(err, NodeError::TypeMismatch { .. }));
    }

    #[test]
    fn rejected_invocation_leaves_state_untouched() {
        let mut node = SimpleNumberCounter::default();
        node.invoke(&Inputs::new()).expect("invoke");
        let before = node.state().clone();
        node.invoke(&inputs(&[("max_steps", Value::Int(-5))]))
            .expect_err("below min");
        assert_eq!(node.state(), &before);
    }

    #[test]
    fn schema_advertises_config_defaults() {
        let defaults = CounterConfig {
            max_steps: 8,
            ..CounterConfig::default()
        };
        let schema = SimpleNumberCounter::new(&defaults).schema();
        let max_steps = schema.input("max_steps").expect("max_steps");
        assert_eq!(max_steps.default, Value::Int(8));
        assert_eq!(max_steps.min, Some(-1));
        assert!(!schema.input("reset").expect("reset").required);
        let names: Vec<_> = schema.outputs.iter().map(|o| o.name.as_str()).collect();
        assert_eq!(names, vec!["value", "step_index", "done"]);
    }
}
