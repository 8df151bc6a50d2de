//! Store error types.

use crate::types::Key;
use std::path::PathBuf;
use thiserror::Error;

/// Errors surfaced by store operations.
///
/// Nothing is retried internally; every failure propagates synchronously to
/// the caller as the immediate result of the operation that triggered it.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Requested key or index is absent from the document's in-memory value.
    #[error("key not found: {key}")]
    NotFound { key: Key },

    /// Backing file contents are not valid JSON.
    #[error("failed to parse {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// In-memory value could not be encoded as JSON.
    #[error("failed to serialize {}: {source}", path.display())]
    Serialize {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// A filesystem operation failed.
    #[error("{op} failed for {}: {source}", path.display())]
    Io {
        op: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A container operation was applied to a value of the wrong shape.
    #[error("type mismatch: expected {expected}, found {found}")]
    TypeMismatch {
        expected: &'static str,
        found: &'static str,
    },

    /// Configuration file could not be parsed.
    #[error("invalid configuration {}: {source}", path.display())]
    Config {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}
