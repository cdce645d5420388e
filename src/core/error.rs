//! Error type for catalog operations

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised by loading, admin writes and page rendering.
///
/// Recoverable data problems (duplicate ids, missing optional fields,
/// malformed single records) never surface here; they are logged and
/// resolved at the normalization boundary.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// A file could not be read or written
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        /// File involved in the failed operation
        path: PathBuf,
        /// Underlying I/O error
        source: std::io::Error,
    },

    /// A payload could not be parsed or serialized as JSON
    #[error("invalid JSON from {origin}: {source}")]
    Json {
        /// Human-readable description of where the JSON came from
        origin: String,
        /// Underlying serde error
        source: serde_json::Error,
    },

    /// Every configured data source failed or was empty
    #[error("no course data could be loaded (tried: {})", attempts.join(", "))]
    NoData {
        /// Sources tried, in order
        attempts: Vec<String>,
    },

    /// Backing up the data file failed; nothing was written
    #[error("backup failed: {0}")]
    Backup(String),

    /// Detail page template failed to render; nothing was written
    #[error("template render failed: {0}")]
    Render(#[from] askama::Error),

    /// Named backup does not exist
    #[error("backup not found: {0}")]
    BackupNotFound(String),

    /// A record does not have the expected shape
    #[error("invalid record: {0}")]
    InvalidRecord(String),
}

impl CatalogError {
    /// Wrap an I/O error with the path it occurred on
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Wrap a JSON error with a description of its origin
    pub fn json(origin: impl Into<String>, source: serde_json::Error) -> Self {
        Self::Json {
            origin: origin.into(),
            source,
        }
    }
}
