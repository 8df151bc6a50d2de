//! Path and suffix utilities plus the filesystem probe.
//!
//! Document paths are carried without their extension; the suffixed backing
//! file path is derived on demand. Existence checks go through [`probe`],
//! which returns a tagged result instead of scattered boolean tests.

use crate::error::StoreError;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Reserved extension marking document files, without the dot.
pub const DOCUMENT_EXTENSION: &str = "json";

/// Tagged result of a filesystem probe.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathKind {
    /// A regular file (or anything that is not a directory).
    File,
    /// A directory.
    Directory,
    /// Nothing currently exists at the path.
    Missing,
}

/// Probe what currently sits at `path`.
pub fn probe(path: &Path) -> PathKind {
    match fs::metadata(path) {
        Ok(meta) if meta.is_dir() => PathKind::Directory,
        Ok(_) => PathKind::File,
        Err(_) => PathKind::Missing,
    }
}

/// Strip the reserved document suffix from a collection entry name.
///
/// Names are accepted with or without the suffix, so `users.json` and
/// `users` address the same document.
pub fn strip_document_suffix<'a>(name: &'a str, extension: &str) -> &'a str {
    let suffix = format!(".{}", extension);
    name.strip_suffix(suffix.as_str()).unwrap_or(name)
}

/// Backing file path for a document path carried without its extension.
///
/// Appends rather than replaces, so dots inside the final segment survive.
pub fn backing_file_path(path: &Path, extension: &str) -> PathBuf {
    let mut os = path.as_os_str().to_os_string();
    os.push(".");
    os.push(extension);
    PathBuf::from(os)
}

/// Create every missing ancestor directory of the document at `path`.
///
/// `path` is the document path sans extension; its final segment belongs to
/// the backing file and is never created as a directory.
pub fn ensure_parent_dirs(path: &Path) -> Result<(), StoreError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && probe(parent) == PathKind::Missing {
            debug!(path = %parent.display(), "creating ancestor directories");
            fs::create_dir_all(parent).map_err(|source| StoreError::Io {
                op: "create directory",
                path: parent.to_path_buf(),
                source,
            })?;
        }
    }
    Ok(())
}
