//! Store configuration.

use crate::error::StoreError;
use crate::paths::DOCUMENT_EXTENSION;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Store-wide configuration, inherited by every node of a store tree.
///
/// Collections hand their configuration down to every document they
/// construct, so one `StoreConfig` governs a whole tree of lookups.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Pretty-print JSON when writing document files (default: false)
    #[serde(default)]
    pub pretty: bool,

    /// Write via temp-file-and-rename instead of truncating the target in
    /// place (default: false). Observable contents are identical; a crash
    /// mid-write leaves the previous file intact instead of a truncated one.
    #[serde(default)]
    pub atomic_writes: bool,

    /// Reserved document file extension, without the dot (default: "json")
    #[serde(default = "default_extension")]
    pub extension: String,
}

fn default_extension() -> String {
    DOCUMENT_EXTENSION.to_string()
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            pretty: false,
            atomic_writes: false,
            extension: default_extension(),
        }
    }
}

impl StoreConfig {
    /// Load configuration from a TOML file.
    pub fn load_from_file(path: &Path) -> Result<Self, StoreError> {
        let raw = std::fs::read_to_string(path).map_err(|source| StoreError::Io {
            op: "read",
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&raw).map_err(|source| StoreError::Config {
            path: path.to_path_buf(),
            source,
        })
    }
}
