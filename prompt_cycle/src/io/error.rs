//! Errors raised while resolving and reading a prompt file.

use std::path::PathBuf;

/// Failure to produce lines from a file. Surfaced to the host unchanged.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("file_path is empty")]
    EmptyPath,

    #[error("file not found: {}", path.display())]
    NotFound { path: PathBuf },

    #[error("cannot read {}: {source}", path.display())]
    Unreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("unsupported file extension '{extension}' for {}; use txt, log, md, csv or docx", path.display())]
    UnsupportedFormat { path: PathBuf, extension: String },

    #[error("{} contained zero lines", path.display())]
    EmptyFile { path: PathBuf },

    #[error("invalid csv {}: {source}", path.display())]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("column '{column}' not found in {} (available: {available})", path.display())]
    MissingColumn {
        path: PathBuf,
        column: String,
        available: String,
    },

    #[error("invalid document {}: {message}", path.display())]
    Document { path: PathBuf, message: String },
}

impl LoadError {
    /// True for the "file does not exist or cannot be read" family.
    pub fn is_not_found(&self) -> bool {
        matches!(self, LoadError::NotFound { .. } | LoadError::Unreadable { .. })
    }
}
