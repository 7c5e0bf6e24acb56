//! Load-time errors.
//!
//! Only loading can fail. Once a level is running every anomaly degrades
//! to a default instead of surfacing as an error.

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while reading settings, world data or the asset catalog.
#[derive(Debug, Error)]
pub enum LoadError {
    /// The file could not be read.
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// The file is not valid JSON for the expected shape.
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
    /// Parsed fine but a value is out of range.
    #[error("invalid setting `{field}`: {reason}")]
    Invalid { field: &'static str, reason: String },
}

impl LoadError {
    pub(crate) fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        LoadError::Invalid {
            field,
            reason: reason.into(),
        }
    }
}

/// Read a whole file, tagging IO failures with the path.
pub(crate) fn read_file(path: &std::path::Path) -> Result<String, LoadError> {
    std::fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })
}
