//! Core types shared across the store tree.

use serde_json::Value;
use std::fmt;

/// Key addressing a slot inside a document container.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Key {
    /// Member of a JSON object.
    Field(String),
    /// Element of a JSON array.
    Index(usize),
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Key::Field(name) => write!(f, "{}", name),
            Key::Index(index) => write!(f, "[{}]", index),
        }
    }
}

impl From<&str> for Key {
    fn from(name: &str) -> Self {
        Key::Field(name.to_string())
    }
}

impl From<String> for Key {
    fn from(name: String) -> Self {
        Key::Field(name)
    }
}

impl From<usize> for Key {
    fn from(index: usize) -> Self {
        Key::Index(index)
    }
}

/// Shape name of a JSON value, used in error messages.
pub fn shape_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Container shape a key expects: fields address objects, indexes address arrays.
pub fn expected_shape(key: &Key) -> &'static str {
    match key {
        Key::Field(_) => "object",
        Key::Index(_) => "array",
    }
}
