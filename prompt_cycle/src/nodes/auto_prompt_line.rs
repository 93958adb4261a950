//! `AutoPromptLineLoader`: a counter and a line loader in one node.
//!
//! The n-th emission reads line `start_value + (n - 1) * step`, wrapped into
//! the file. Editing the file (a new modification time) restarts the sequence.

use std::path::PathBuf;

use tracing::debug;

use crate::core::counter::{CounterParams, CounterState};
use crate::core::types::{InputSpec, NodeSchema, ValueType};
use crate::core::wrap::wrap_line_index;
use crate::io::config::LoaderConfig;
use crate::io::error::LoadError;
use crate::io::loader::LineLoader;
use crate::nodes::prompt_line::CATEGORY;
use crate::nodes::{InputReader, Inputs, Node, NodeError, Outputs};

/// Line positions visited by [`AutoPromptLineLoader`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineSequence {
    /// 1-based line of the first emission.
    pub start_value: i64,
    pub step: i64,
    /// Negative means unbounded.
    pub max_steps: i64,
    pub auto_reset: bool,
}

impl LineSequence {
    /// Unwrapped line position of the `step_index`-th emission (1-based).
    pub fn position(&self, step_index: i64) -> i128 {
        i128::from(self.start_value)
            + (i128::from(step_index) - 1) * i128::from(self.step)
    }

    fn counter_params(&self) -> CounterParams {
        CounterParams {
            start_value: self.start_value as f64,
            step: self.step as f64,
            max_steps: self.max_steps,
            auto_reset: self.auto_reset,
        }
    }
}

/// Inputs whose change restarts the sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Settings {
    sequence: LineSequence,
    strip_whitespace: bool,
}

/// Sequential prompt emitter with its own counter.
#[derive(Debug, Clone, Default)]
pub struct AutoPromptLineLoader {
    defaults: LoaderConfig,
    counter: CounterState,
    loader: LineLoader,
    last: Option<Settings>,
}

/// One emission of [`AutoPromptLineLoader`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AutoPrompt {
    pub prompt: String,
    /// 1-based line number after wrapping; 0 before anything was emitted.
    pub line_index: i64,
    pub step_index: i64,
    pub total_lines: i64,
    pub done: bool,
}

impl AutoPromptLineLoader {
    pub fn new(defaults: &LoaderConfig) -> Self {
        Self {
            defaults: defaults.clone(),
            counter: CounterState::new(),
            loader: LineLoader::new(&defaults.csv_separator),
            last: None,
        }
    }

    /// Typed entry point behind [`Node::invoke`].
    pub fn next_prompt(
        &mut self,
        file_path: &str,
        csv_column: &str,
        strip_whitespace: bool,
        sequence: LineSequence,
        reset: bool,
    ) -> Result<AutoPrompt, LoadError> {
        let reloaded = self.loader.refresh(file_path, csv_column)?;
        let settings = Settings {
            sequence,
            strip_whitespace,
        };
        let changed = self.last.is_some_and(|last| last != settings);
        let file_changed = reloaded && self.last.is_some();
        if file_changed {
            debug!(file_path, "prompt file changed, restarting sequence");
        }
        if changed {
            debug!(file_path, "inputs changed, restarting sequence");
        }
        let emission = self
            .counter
            .advance(sequence.counter_params(), reset || changed || file_changed);
        self.last = Some(settings);

        let lines = self.loader.lines();
        let total_lines = lines.len() as i64;
        if emission.step_index == 0 {
            return Ok(AutoPrompt {
                prompt: String::new(),
                line_index: 0,
                step_index: 0,
                total_lines,
                done: emission.done,
            });
        }

        let slot = wrap_line_index(sequence.position(emission.step_index), lines.len())
            .ok_or_else(|| LoadError::EmptyFile {
                path: PathBuf::from(file_path),
            })?;
        let line = &lines[slot.offset];
        Ok(AutoPrompt {
            prompt: if strip_whitespace {
                line.trim().to_string()
            } else {
                line.clone()
            },
            line_index: slot.line_index,
            step_index: emission.step_index,
            total_lines,
            done: emission.done,
        })
    }
}

impl Node for AutoPromptLineLoader {
    fn schema(&self) -> NodeSchema {
        NodeSchema::new(CATEGORY, "next_prompt")
            .required(InputSpec::string("file_path", ""))
            .required(InputSpec::int("start_value", 1))
            .required(InputSpec::int("step", 1))
            .required(InputSpec::int("max_steps", -1).min(-1))
            .optional(InputSpec::boolean("auto_reset", false))
            .optional(InputSpec::boolean("reset", false))
            .optional(InputSpec::string("csv_column", &self.defaults.csv_column))
            .optional(InputSpec::boolean(
                "strip_whitespace",
                self.defaults.strip_whitespace,
            ))
            .output("prompt", ValueType::String)
            .output("line_index", ValueType::Int)
            .output("step_index", ValueType::Int)
            .output("total_lines", ValueType::Int)
            .output("done", ValueType::Boolean)
    }

    fn invoke(&mut self, inputs: &Inputs) -> Result<Outputs, NodeError> {
        let schema = self.schema();
        let reader = InputReader::new(&schema, inputs);
        let sequence = LineSequence {
            start_value: reader.int("start_value")?,
            step: reader.int("step")?,
            max_steps: reader.int("max_steps")?,
            auto_reset: reader.boolean("auto_reset")?,
        };
        let prompt = self.next_prompt(
            reader.string("file_path")?,
            reader.string("csv_column")?,
            reader.boolean("strip_whitespace")?,
            sequence,
            reader.boolean("reset")?,
        )?;
        Ok(Outputs::new()
            .with("prompt", prompt.prompt)
            .with("line_index", prompt.line_index)
            .with("step_index", prompt.step_index)
            .with("total_lines", prompt.total_lines)
            .with("done", prompt.done))
    }
}
