//! Memory: access kinds and seed values
//!
//! The runtime owns a key-value memory. A workflow document never carries
//! runtime values except the initial `external_memory` seeds; what it does
//! carry is *how* each task reads a slot, expressed as a [`MemoryAccessKind`].

use crate::{WorkflowError, WorkflowResult};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

// ── Access kinds ─────────────────────────────────────────────────────

/// How a value is pulled from memory when a task executes
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MemoryAccessKind {
    /// Caller-supplied input at execution time
    Input,
    /// Read a scalar slot
    Read,
    /// Remove and return the top of a collection
    Pop,
    /// Return the element at an index without removing it
    Peek,
    /// Return the whole collection
    GetAll,
    /// Return the number of elements in a collection
    Size,
    /// A string literal carried in the binding's `key`
    #[serde(rename = "string")]
    Literal,
}

impl MemoryAccessKind {
    /// Every access kind, in wire order
    pub const ALL: [MemoryAccessKind; 7] = [
        MemoryAccessKind::Input,
        MemoryAccessKind::Read,
        MemoryAccessKind::Pop,
        MemoryAccessKind::Peek,
        MemoryAccessKind::GetAll,
        MemoryAccessKind::Size,
        MemoryAccessKind::Literal,
    ];

    /// The name used in serialized documents
    pub fn as_str(&self) -> &'static str {
        match self {
            MemoryAccessKind::Input => "input",
            MemoryAccessKind::Read => "read",
            MemoryAccessKind::Pop => "pop",
            MemoryAccessKind::Peek => "peek",
            MemoryAccessKind::GetAll => "get_all",
            MemoryAccessKind::Size => "size",
            MemoryAccessKind::Literal => "string",
        }
    }

    /// Whether this kind operates on a collection slot
    pub fn is_collection_access(&self) -> bool {
        matches!(
            self,
            MemoryAccessKind::Pop
                | MemoryAccessKind::Peek
                | MemoryAccessKind::GetAll
                | MemoryAccessKind::Size
        )
    }
}

impl std::fmt::Display for MemoryAccessKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ── Seed values ──────────────────────────────────────────────────────

/// An initial memory value placed in `external_memory`
///
/// The shape is decided once, when the value is built, and never
/// re-inferred afterwards.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MemoryValue {
    /// A scalar slot
    Text(String),
    /// A collection slot
    Stack(Vec<StackEntry>),
}

/// One element of a collection seed
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum StackEntry {
    Text(String),
    Object(BTreeMap<String, String>),
}

impl MemoryValue {
    /// Classify a raw JSON value seeded under `key`
    ///
    /// Accepts a string, or an array whose elements are each a string or a
    /// flat object of string values. An empty array is an empty collection.
    pub fn from_json(key: &str, value: Value) -> WorkflowResult<Self> {
        match value {
            Value::String(text) => Ok(MemoryValue::Text(text)),
            Value::Array(items) => items
                .into_iter()
                .map(|item| StackEntry::from_json(key, item))
                .collect::<WorkflowResult<Vec<_>>>()
                .map(MemoryValue::Stack),
            other => Err(unsupported(key, &other)),
        }
    }

    /// Whether this value seeds a collection slot
    pub fn is_collection(&self) -> bool {
        matches!(self, MemoryValue::Stack(_))
    }
}

impl StackEntry {
    fn from_json(key: &str, value: Value) -> WorkflowResult<Self> {
        match value {
            Value::String(text) => Ok(StackEntry::Text(text)),
            Value::Object(map) => {
                let mut entry = BTreeMap::new();
                for (field, field_value) in map {
                    match field_value {
                        Value::String(text) => {
                            entry.insert(field, text);
                        }
                        other => return Err(unsupported(key, &other)),
                    }
                }
                Ok(StackEntry::Object(entry))
            }
            other => Err(unsupported(key, &other)),
        }
    }
}

fn unsupported(key: &str, value: &Value) -> WorkflowError {
    let found = match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "a nested list",
        Value::Object(_) => "an object",
    };
    WorkflowError::UnsupportedMemoryType {
        key: key.to_string(),
        found: found.to_string(),
    }
}

impl From<&str> for MemoryValue {
    fn from(text: &str) -> Self {
        MemoryValue::Text(text.to_string())
    }
}

impl From<String> for MemoryValue {
    fn from(text: String) -> Self {
        MemoryValue::Text(text)
    }
}

impl From<Vec<String>> for MemoryValue {
    fn from(items: Vec<String>) -> Self {
        MemoryValue::Stack(items.into_iter().map(StackEntry::Text).collect())
    }
}

impl From<Vec<&str>> for MemoryValue {
    fn from(items: Vec<&str>) -> Self {
        MemoryValue::Stack(
            items
                .into_iter()
                .map(|item| StackEntry::Text(item.to_string()))
                .collect(),
        )
    }
}

impl From<Vec<StackEntry>> for MemoryValue {
    fn from(entries: Vec<StackEntry>) -> Self {
        MemoryValue::Stack(entries)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_access_kind_wire_names() {
        let names: Vec<String> = MemoryAccessKind::ALL
            .iter()
            .map(|kind| serde_json::to_value(kind).unwrap().as_str().unwrap().to_string())
            .collect();
        assert_eq!(
            names,
            vec!["input", "read", "pop", "peek", "get_all", "size", "string"]
        );
        for kind in MemoryAccessKind::ALL {
            assert_eq!(serde_json::to_value(kind).unwrap(), json!(kind.as_str()));
        }
    }

    #[test]
    fn test_collection_access() {
        assert!(MemoryAccessKind::GetAll.is_collection_access());
        assert!(MemoryAccessKind::Pop.is_collection_access());
        assert!(!MemoryAccessKind::Read.is_collection_access());
        assert!(!MemoryAccessKind::Literal.is_collection_access());
    }

    #[test]
    fn test_classify_scalar_and_collection() {
        let scalar = MemoryValue::from_json("topic", json!("Linear Algebra")).unwrap();
        assert_eq!(scalar, MemoryValue::Text("Linear Algebra".into()));
        assert!(!scalar.is_collection());

        let stack = MemoryValue::from_json(
            "history",
            json!(["a", {"question": "why?", "answer": "because"}]),
        )
        .unwrap();
        assert!(stack.is_collection());
        match stack {
            MemoryValue::Stack(entries) => {
                assert_eq!(entries.len(), 2);
                assert_eq!(entries[0], StackEntry::Text("a".into()));
                assert!(matches!(entries[1], StackEntry::Object(_)));
            }
            MemoryValue::Text(_) => panic!("expected a collection"),
        }
    }

    #[test]
    fn test_empty_list_is_collection() {
        let value = MemoryValue::from_json("inventory", json!([])).unwrap();
        assert_eq!(value, MemoryValue::Stack(Vec::new()));
    }

    #[test]
    fn test_unsupported_values() {
        for bad in [
            json!(42),
            json!(null),
            json!(true),
            json!({"a": "b"}),
            json!([1, 2]),
            json!([["nested"]]),
            json!([{"count": 3}]),
        ] {
            let err = MemoryValue::from_json("slot", bad).unwrap_err();
            assert!(matches!(
                err,
                WorkflowError::UnsupportedMemoryType { ref key, .. } if key == "slot"
            ));
        }
    }

    #[test]
    fn test_memory_value_serializes_untagged() {
        let value = MemoryValue::from(vec!["x", "y"]);
        assert_eq!(serde_json::to_value(&value).unwrap(), json!(["x", "y"]));

        let parsed: MemoryValue = serde_json::from_value(json!("plain")).unwrap();
        assert_eq!(parsed, MemoryValue::Text("plain".into()));
    }
}
