//! The accumulating structured record.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::FieldPath;
use crate::domain::foundation::ValidationError;

/// Nested namespace → field mapping built up over a conversation.
///
/// A draft starts empty and only changes through [`MergePolicy`](super::MergePolicy),
/// which always produces a new value. There are no public setters.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DraftEntity {
    root: Map<String, Value>,
}

impl DraftEntity {
    /// Creates an empty draft.
    pub fn new() -> Self {
        Self::default()
    }

    /// Restores a draft from a persisted snapshot (wholesale replacement).
    ///
    /// # Errors
    ///
    /// - `InvalidFormat` if the snapshot is not a JSON object
    pub fn from_snapshot(value: Value) -> Result<Self, ValidationError> {
        match value {
            Value::Object(root) => Ok(Self { root }),
            other => Err(ValidationError::invalid_format(
                "draft",
                format!("expected an object, got {}", json_type_name(&other)),
            )),
        }
    }

    pub(super) fn from_map(root: Map<String, Value>) -> Self {
        Self { root }
    }

    pub(super) fn as_map(&self) -> &Map<String, Value> {
        &self.root
    }

    /// Reads the value stored at `path`, if any.
    pub fn get(&self, path: &FieldPath) -> Option<&Value> {
        let (leaf, namespaces) = path.segments().split_last()?;
        let mut level = &self.root;
        for name in namespaces {
            level = level.get(name)?.as_object()?;
        }
        level.get(leaf)
    }

    /// Returns true if no field has been captured yet.
    pub fn is_empty(&self) -> bool {
        self.root.values().all(|v| match v {
            Value::Object(children) => children.is_empty(),
            _ => false,
        })
    }

    /// Paths of every captured leaf, in key order.
    pub fn leaf_paths(&self) -> Vec<FieldPath> {
        fn walk(level: &Map<String, Value>, prefix: &mut Vec<String>, out: &mut Vec<FieldPath>) {
            for (key, value) in level {
                prefix.push(key.clone());
                match value {
                    Value::Object(children) => walk(children, prefix, out),
                    _ => {
                        if let Ok(path) = FieldPath::from_segments(prefix.iter().cloned()) {
                            out.push(path);
                        }
                    }
                }
                prefix.pop();
            }
        }

        let mut out = Vec::new();
        walk(&self.root, &mut Vec::new(), &mut out);
        out
    }

    /// Returns the draft as a JSON value (for prompts and persistence).
    pub fn to_json(&self) -> Value {
        Value::Object(self.root.clone())
    }
}

pub(crate) fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
