//! Directory-backed collections.

use crate::config::StoreConfig;
use crate::document::Document;
use crate::error::StoreError;
use crate::paths::{self, PathKind};
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, trace};

/// Result of resolving a name inside a collection.
#[derive(Debug)]
pub enum Entry {
    /// The name addresses a directory, present or ghost.
    Collection(Collection),
    /// The name addresses an existing document file.
    Document(Document),
}

/// A directory-backed node resolving names to child collections or documents.
///
/// A collection referencing a directory that does not exist yet is a ghost:
/// resolving it costs nothing and creates nothing; the directory appears on
/// disk the first time a document beneath it is written.
#[derive(Debug, Clone)]
pub struct Collection {
    path: PathBuf,
    config: StoreConfig,
}

impl Collection {
    /// Open a collection rooted at `path` with the default configuration.
    ///
    /// The directory does not have to exist.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self::with_config(path, StoreConfig::default())
    }

    /// Open a collection rooted at `path` with an explicit configuration.
    ///
    /// The configuration is handed down to every child node.
    pub fn with_config(path: impl Into<PathBuf>, config: StoreConfig) -> Self {
        Self {
            path: path.into(),
            config,
        }
    }

    /// Directory path this collection represents.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Final path component of the collection directory.
    pub fn name(&self) -> &str {
        self.path
            .file_name()
            .and_then(|name| name.to_str())
            .unwrap_or("")
    }

    /// Whether the collection directory currently exists on disk.
    pub fn exists(&self) -> bool {
        paths::probe(&self.path) == PathKind::Directory
    }

    /// Resolve `name` to a child document or collection.
    ///
    /// The reserved document suffix is stripped if present, so
    /// `resolve("users.json")` and `resolve("users")` address the same
    /// entry. If the suffixed file exists the result is a root document view
    /// loaded from disk; anything else is a (possibly ghost) collection.
    /// Nothing is created on disk.
    pub fn resolve(&self, name: &str) -> Result<Entry, StoreError> {
        let name = paths::strip_document_suffix(name, &self.config.extension);
        let child = self.path.join(name);
        let file = paths::backing_file_path(&child, &self.config.extension);
        match paths::probe(&file) {
            PathKind::File => {
                trace!(entry = name, path = %self.path.display(), "resolved to document");
                Ok(Entry::Document(Document::open(child, self.config.clone())?))
            }
            _ => {
                trace!(entry = name, path = %self.path.display(), "resolved to collection");
                Ok(Entry::Collection(Collection::with_config(
                    child,
                    self.config.clone(),
                )))
            }
        }
    }

    /// Create or overwrite the document `name` with `value`.
    ///
    /// The document is constructed bypassing the load and saved in full;
    /// missing intermediate directories are created along the way. Returns
    /// the root view over the written document.
    pub fn put(&self, name: &str, value: impl Into<Value>) -> Result<Document, StoreError> {
        let name = paths::strip_document_suffix(name, &self.config.extension);
        let mut document =
            Document::create(self.path.join(name), value.into(), self.config.clone())?;
        document.save()?;
        debug!(entry = name, path = %self.path.display(), "document written");
        Ok(document)
    }

    /// Linear scan over the documents directly inside this collection.
    ///
    /// Every document file is parsed in full and the values satisfying
    /// `predicate` are returned, in directory listing order (platform
    /// defined, not stable). Sub-collections and entries without the
    /// document extension are skipped; a ghost collection yields an empty
    /// result. Cost is proportional to the number of files, each requiring
    /// a full parse; there is no index.
    pub fn query<F>(&self, predicate: F) -> Result<Vec<Value>, StoreError>
    where
        F: Fn(&Value) -> bool,
    {
        if paths::probe(&self.path) != PathKind::Directory {
            trace!(path = %self.path.display(), "query on ghost collection");
            return Ok(Vec::new());
        }
        let entries = fs::read_dir(&self.path).map_err(|source| StoreError::Io {
            op: "list",
            path: self.path.clone(),
            source,
        })?;

        let mut matches = Vec::new();
        let mut scanned = 0usize;
        for entry in entries {
            let entry = entry.map_err(|source| StoreError::Io {
                op: "list",
                path: self.path.clone(),
                source,
            })?;
            let path = entry.path();
            if paths::probe(&path) != PathKind::File {
                continue;
            }
            if path.extension().and_then(|ext| ext.to_str())
                != Some(self.config.extension.as_str())
            {
                continue;
            }
            let raw = fs::read_to_string(&path).map_err(|source| StoreError::Io {
                op: "read",
                path: path.clone(),
                source,
            })?;
            let value: Value =
                serde_json::from_str(&raw).map_err(|source| StoreError::Parse { path, source })?;
            scanned += 1;
            if predicate(&value) {
                matches.push(value);
            }
        }
        debug!(scanned, matched = matches.len(), path = %self.path.display(), "query scan complete");
        Ok(matches)
    }
}
