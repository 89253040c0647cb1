//! Build-time error type.

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while compiling rules and writing deploy artifacts.
#[derive(Debug, Error)]
pub enum BuildError {
    /// A file could not be read or written.
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A JSON document could not be parsed or produced.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The build configuration is unusable.
    #[error("invalid configuration: {0}")]
    Config(String),
}

impl BuildError {
    /// Wrap an I/O error with the path it occurred on.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        BuildError::Io {
            path: path.into(),
            source,
        }
    }
}
