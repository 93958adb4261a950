//! `PromptLineLoader`: returns one line of a prompt file per tick.

use crate::core::types::{InputSpec, NodeSchema, ValueType};
use crate::io::config::LoaderConfig;
use crate::io::loader::{LineLoader, LoadRequest, LoadedLine};
use crate::nodes::{InputReader, Inputs, Node, NodeError, Outputs};

pub(crate) const CATEGORY: &str = "Prompt Cycle 🧮";

/// Loads the line at a 1-based index, wrapping out-of-range indices.
#[derive(Debug, Clone, Default)]
pub struct PromptLineLoader {
    defaults: LoaderConfig,
    loader: LineLoader,
}

impl PromptLineLoader {
    pub fn new(defaults: &LoaderConfig) -> Self {
        Self {
            defaults: defaults.clone(),
            loader: LineLoader::new(&defaults.csv_separator),
        }
    }

    /// Typed entry point behind [`Node::invoke`].
    pub fn load_line(&mut self, request: &LoadRequest<'_>) -> Result<LoadedLine, NodeError> {
        Ok(self.loader.load(request)?)
    }
}

impl Node for PromptLineLoader {
    fn schema(&self) -> NodeSchema {
        NodeSchema::new(CATEGORY, "load_line")
            .required(InputSpec::string("file_path", ""))
            .required(InputSpec::int("line_index", 1))
            .optional(InputSpec::string("csv_column", &self.defaults.csv_column))
            .optional(InputSpec::boolean(
                "strip_whitespace",
                self.defaults.strip_whitespace,
            ))
            .output("prompt", ValueType::String)
            .output("line_index", ValueType::Int)
            .output("total_lines", ValueType::Int)
            .output("done", ValueType::Boolean)
    }

    fn invoke(&mut self, inputs: &Inputs) -> Result<Outputs, NodeError> {
        let schema = self.schema();
        let reader = InputReader::new(&schema, inputs);
        let request = LoadRequest {
            file_path: reader.string("file_path")?,
            line_index: reader.int("line_index")?,
            csv_column: reader.string("csv_column")?,
            strip_whitespace: reader.boolean("strip_whitespace")?,
        };
        let line = self.load_line(&request)?;
        Ok(Outputs::new()
            .with("prompt", line.prompt)
            .with("line_index", line.line_index)
            .with("total_lines", line.total_lines)
            .with("done", line.done))
    }
}
