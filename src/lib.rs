//! docshelf: a lazy, filesystem-backed JSON document store.
//!
//! A store maps a directory hierarchy onto a nested key-value tree:
//! directories are [`Collection`]s resolving names to children, files are
//! JSON [`Document`]s. Collections are ghosts until the first write beneath
//! them; documents load lazily from disk, and a write on any nested view
//! propagates upward through its parent chain until the root view rewrites
//! the backing file in full.
//!
//! ```no_run
//! use docshelf::{Collection, Entry};
//! use serde_json::json;
//!
//! # fn main() -> Result<(), docshelf::StoreError> {
//! let db = Collection::new("/path/to/db");
//! let users = match db.resolve("users")? {
//!     Entry::Collection(collection) => collection,
//!     Entry::Document(_) => unreachable!(),
//! };
//! let mut johndoe = users.put("johndoe", json!({"name": "John", "age": 26}))?;
//! johndoe.set("age", 27)?;
//! # Ok(())
//! # }
//! ```
//!
//! # Concurrency
//!
//! The store is single-threaded and synchronous, with no file-level locking
//! and no atomic rename by default. Two root documents opened on the same
//! path are independent in-memory copies; the last save wins and silently
//! discards edits made through the other copy. Coordinate writers
//! externally if that matters, or enable
//! [`StoreConfig::atomic_writes`](config::StoreConfig) to at least keep a
//! crashed write from truncating the previous contents.

pub mod collection;
pub mod config;
pub mod document;
pub mod error;
pub mod paths;
pub mod types;

pub use collection::{Collection, Entry};
pub use config::StoreConfig;
pub use document::{Document, Node};
pub use error::StoreError;
pub use types::Key;
