//! Document views and write propagation.
//!
//! A [`Document`] is either the root view of one backing JSON file or a
//! nested view into a container value inside that file. Every view of one
//! load shares the parsed value tree; a mutation applied through any view
//! commits upward along the parent chain until the root view rewrites the
//! backing file in full. Nothing is ever patched in place on disk.

use crate::config::StoreConfig;
use crate::error::StoreError;
use crate::paths::{self, PathKind};
use crate::types::{expected_shape, shape_of, Key};
use serde_json::{Map, Value};
use std::cell::RefCell;
use std::fs;
use std::path::{Path, PathBuf};
use std::rc::Rc;
use tracing::{debug, trace, warn};

/// Result of a keyed lookup on a document.
#[derive(Debug, Clone)]
pub enum Node {
    /// The key held a container; a navigable nested view over it.
    Document(Document),
    /// The key held a scalar; the value itself, cloned out.
    Value(Value),
}

/// A view over one backing JSON file, or over a nested container within it.
///
/// The root view (no parent) owns the load and is the only view that touches
/// disk. A nested view records the owning view plus the key locating it
/// there; its lifecycle is entirely driven by the root's value tree. Cloning
/// a view keeps the underlying value shared.
///
/// `Document` holds the load behind an `Rc` and is intentionally not `Send`:
/// the store is single-threaded and performs no file-level locking. Two root
/// views opened on the same path are independent in-memory copies, and the
/// last save silently wins.
#[derive(Debug, Clone)]
pub struct Document {
    /// Backing file path, sans extension.
    path: PathBuf,
    config: StoreConfig,
    /// Full parsed value of the load, shared by every view of it.
    root: Rc<RefCell<Value>>,
    /// Owning back-link plus the key locating this view in the owner.
    parent: Option<(Box<Document>, Key)>,
}

impl Document {
    /// Open the root view at `path`, loading the backing file from disk.
    ///
    /// Every missing ancestor directory is created. A missing backing file
    /// is not an error: the document starts ghost, with an empty object
    /// value, and materializes on the first save. Malformed JSON fails the
    /// load with a parse error.
    pub fn open(path: impl Into<PathBuf>, config: StoreConfig) -> Result<Self, StoreError> {
        let path = path.into();
        paths::ensure_parent_dirs(&path)?;
        let value = Self::load_value(&path, &config)?;
        debug!(path = %path.display(), "opened document");
        Ok(Self {
            path,
            config,
            root: Rc::new(RefCell::new(value)),
            parent: None,
        })
    }

    /// Construct a root view with `value` as its content, bypassing the load.
    ///
    /// Ancestor directories are created; the backing file is not read or
    /// written. Callers persist with [`Document::save`].
    pub fn create(
        path: impl Into<PathBuf>,
        value: Value,
        config: StoreConfig,
    ) -> Result<Self, StoreError> {
        let path = path.into();
        paths::ensure_parent_dirs(&path)?;
        Ok(Self {
            path,
            config,
            root: Rc::new(RefCell::new(value)),
            parent: None,
        })
    }

    fn load_value(path: &Path, config: &StoreConfig) -> Result<Value, StoreError> {
        let file = paths::backing_file_path(path, &config.extension);
        match paths::probe(&file) {
            PathKind::File => {
                let raw = fs::read_to_string(&file).map_err(|source| StoreError::Io {
                    op: "read",
                    path: file.clone(),
                    source,
                })?;
                serde_json::from_str(&raw).map_err(|source| StoreError::Parse { path: file, source })
            }
            _ => Ok(Value::Object(Map::new())),
        }
    }

    /// Backing file path, sans extension.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Whether this is the root view of its load.
    pub fn is_root(&self) -> bool {
        self.parent.is_none()
    }

    /// Whether the backing file currently exists on disk.
    ///
    /// Probes the suffixed file itself; a document that has never been
    /// saved reports false even when its ancestor directories exist.
    pub fn exists(&self) -> bool {
        let file = paths::backing_file_path(&self.path, &self.config.extension);
        paths::probe(&file) == PathKind::File
    }

    /// Deep clone of this view's current container value.
    pub fn value(&self) -> Result<Value, StoreError> {
        let root = self.root.borrow();
        Ok(self.container(&root)?.clone())
    }

    /// Look up `key` in this view's container.
    ///
    /// A container value comes back as a nested view sharing this load; a
    /// scalar comes back as the value itself. A missing key is a not-found
    /// error; keying an object with an index or an array with a field name
    /// is a type mismatch.
    pub fn get(&self, key: impl Into<Key>) -> Result<Node, StoreError> {
        let key = key.into();
        let root = self.root.borrow();
        let container = self.container(&root)?;
        let slot = match (&key, container) {
            (Key::Field(name), Value::Object(map)) => map.get(name.as_str()),
            (Key::Index(index), Value::Array(items)) => items.get(*index),
            (_, other) => {
                return Err(StoreError::TypeMismatch {
                    expected: expected_shape(&key),
                    found: shape_of(other),
                })
            }
        }
        .ok_or_else(|| StoreError::NotFound { key: key.clone() })?;

        if slot.is_object() || slot.is_array() {
            trace!(%key, path = %self.path.display(), "descending into nested view");
            Ok(Node::Document(Document {
                path: self.path.clone(),
                config: self.config.clone(),
                root: Rc::clone(&self.root),
                parent: Some((Box::new(self.clone()), key)),
            }))
        } else {
            Ok(Node::Value(slot.clone()))
        }
    }

    /// Assign `value` at `key` and persist.
    ///
    /// The mutation lands in the shared value tree, then commits upward
    /// through the parent chain; the root view rewrites the backing file in
    /// full. Object fields are inserted or replaced; array indexes must
    /// already be in bounds.
    pub fn set(&mut self, key: impl Into<Key>, value: impl Into<Value>) -> Result<(), StoreError> {
        let key = key.into();
        let value = value.into();
        {
            let mut root = self.root.borrow_mut();
            let container = self.container_mut(&mut root)?;
            match (&key, container) {
                (Key::Field(name), Value::Object(map)) => {
                    map.insert(name.clone(), value);
                }
                (Key::Index(index), Value::Array(items)) => {
                    let slot = items
                        .get_mut(*index)
                        .ok_or_else(|| StoreError::NotFound { key: key.clone() })?;
                    *slot = value;
                }
                (_, other) => {
                    return Err(StoreError::TypeMismatch {
                        expected: expected_shape(&key),
                        found: shape_of(other),
                    })
                }
            }
        }
        trace!(%key, path = %self.path.display(), "set");
        self.commit()
    }

    /// Explicitly flush the current value to disk.
    ///
    /// Same upward propagation as [`Document::set`], applied to the value as
    /// a whole. On a ghost document this is the materializing write.
    pub fn save(&mut self) -> Result<(), StoreError> {
        self.commit()
    }

    /// Re-read the backing file, discarding unsaved in-memory mutations.
    ///
    /// Only meaningful on the root view; a nested view has nothing
    /// independently reloadable and the call is a no-op there. A backing
    /// file that has vanished resets the value to the empty container.
    pub fn reload(&mut self) -> Result<(), StoreError> {
        if self.parent.is_some() {
            trace!(path = %self.path.display(), "reload on nested view ignored");
            return Ok(());
        }
        let file = paths::backing_file_path(&self.path, &self.config.extension);
        if paths::probe(&file) != PathKind::File {
            warn!(path = %file.display(), "backing file missing on reload; resetting to empty");
        }
        let value = Self::load_value(&self.path, &self.config)?;
        *self.root.borrow_mut() = value;
        debug!(path = %self.path.display(), "document reloaded");
        Ok(())
    }

    /// Climb the parent chain to the root view and write the file.
    ///
    /// The value tree is shared with the owner, so the climb carries no
    /// payload; it only has to reach the view that owns the backing file.
    fn commit(&mut self) -> Result<(), StoreError> {
        match &mut self.parent {
            Some((parent, _)) => parent.commit(),
            None => self.write_file(),
        }
    }

    fn write_file(&self) -> Result<(), StoreError> {
        let file = paths::backing_file_path(&self.path, &self.config.extension);
        let root = self.root.borrow();
        let raw = if self.config.pretty {
            serde_json::to_string_pretty(&*root)
        } else {
            serde_json::to_string(&*root)
        }
        .map_err(|source| StoreError::Serialize {
            path: file.clone(),
            source,
        })?;

        if self.config.atomic_writes {
            let tmp = paths::backing_file_path(&self.path, &format!("{}.tmp", self.config.extension));
            fs::write(&tmp, &raw).map_err(|source| StoreError::Io {
                op: "write",
                path: tmp.clone(),
                source,
            })?;
            fs::rename(&tmp, &file).map_err(|source| StoreError::Io {
                op: "rename",
                path: file.clone(),
                source,
            })?;
        } else {
            fs::write(&file, &raw).map_err(|source| StoreError::Io {
                op: "write",
                path: file.clone(),
                source,
            })?;
        }
        debug!(path = %file.display(), bytes = raw.len(), "document saved");
        Ok(())
    }

    /// Keys from the root value down to this view's container.
    fn trail(&self) -> Vec<Key> {
        match &self.parent {
            Some((parent, key)) => {
                let mut trail = parent.trail();
                trail.push(key.clone());
                trail
            }
            None => Vec::new(),
        }
    }

    /// Resolve this view's container inside the shared value tree.
    ///
    /// Fails when an ancestor slot was removed or replaced by a scalar
    /// through another view since this one was created.
    fn container<'a>(&self, root: &'a Value) -> Result<&'a Value, StoreError> {
        let mut current = root;
        for key in self.trail() {
            current = match (key, current) {
                (Key::Field(name), Value::Object(map)) => map
                    .get(name.as_str())
                    .ok_or(StoreError::NotFound { key: Key::Field(name) })?,
                (Key::Index(index), Value::Array(items)) => items
                    .get(index)
                    .ok_or(StoreError::NotFound { key: Key::Index(index) })?,
                (key, other) => {
                    return Err(StoreError::TypeMismatch {
                        expected: expected_shape(&key),
                        found: shape_of(other),
                    })
                }
            };
        }
        Ok(current)
    }

    fn container_mut<'a>(&self, root: &'a mut Value) -> Result<&'a mut Value, StoreError> {
        let mut current = root;
        for key in self.trail() {
            current = match (key, current) {
                (Key::Field(name), Value::Object(map)) => map
                    .get_mut(name.as_str())
                    .ok_or(StoreError::NotFound { key: Key::Field(name) })?,
                (Key::Index(index), Value::Array(items)) => items
                    .get_mut(index)
                    .ok_or(StoreError::NotFound { key: Key::Index(index) })?,
                (key, other) => {
                    return Err(StoreError::TypeMismatch {
                        expected: expected_shape(&key),
                        found: shape_of(other),
                    })
                }
            };
        }
        Ok(current)
    }
}
