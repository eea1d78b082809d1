//! Declared shape of a draft: namespaces, leaves and their value kinds.
//!
//! The schema is what lets the merge step tell a legitimate partial update
//! from an oracle inventing fields, and what gives the orchestrator a human
//! label to ask for when the oracle stays silent.

use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;

use super::FieldPath;
use crate::domain::foundation::ValidationError;

/// The JSON value kind a leaf accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldKind {
    /// Free text.
    Text,
    /// Whole number. `6.0` is accepted, `6.5` is not.
    Integer,
    /// Any JSON number.
    Number,
    /// `true` / `false`.
    Boolean,
    /// Array of strings.
    TextList,
}

impl FieldKind {
    /// Returns true if `value` has the JSON shape this kind expects.
    pub fn accepts(&self, value: &Value) -> bool {
        match self {
            FieldKind::Text => value.is_string(),
            FieldKind::Integer => {
                value.is_i64()
                    || value.is_u64()
                    || value.as_f64().is_some_and(|f| f.is_finite() && f.fract() == 0.0)
            }
            FieldKind::Number => value.is_number(),
            FieldKind::Boolean => value.is_boolean(),
            FieldKind::TextList => value
                .as_array()
                .is_some_and(|items| items.iter().all(Value::is_string)),
        }
    }
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            FieldKind::Text => "text",
            FieldKind::Integer => "integer",
            FieldKind::Number => "number",
            FieldKind::Boolean => "boolean",
            FieldKind::TextList => "list of text",
        };
        f.write_str(s)
    }
}

/// A declared leaf.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldSpec {
    pub kind: FieldKind,
    /// Human wording used when asking for this field.
    pub label: String,
}

/// A node of the schema tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum SchemaNode {
    Namespace(BTreeMap<String, SchemaNode>),
    Leaf(FieldSpec),
}

/// Tree of namespaces and leaves describing one entity kind.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct DraftSchema {
    root: BTreeMap<String, SchemaNode>,
}

impl DraftSchema {
    /// Creates an empty schema.
    pub fn new() -> Self {
        Self::default()
    }

    /// Declares a leaf, creating intermediate namespaces as needed.
    ///
    /// # Errors
    ///
    /// - `InvalidFormat` if the path is a single segment (leaves live inside a namespace),
    ///   if it is already declared, or if it crosses an existing leaf
    pub fn with_field(
        mut self,
        path: &str,
        kind: FieldKind,
        label: impl Into<String>,
    ) -> Result<Self, ValidationError> {
        let path = FieldPath::parse(path)?;
        let segments = path.segments();
        if segments.len() < 2 {
            return Err(ValidationError::invalid_format(
                "field_path",
                format!("'{}' must be nested inside a namespace", path),
            ));
        }

        let Some((leaf, namespaces)) = segments.split_last() else {
            return Err(ValidationError::empty_field("field_path"));
        };
        let mut level = &mut self.root;
        for name in namespaces {
            let node = level
                .entry(name.clone())
                .or_insert_with(|| SchemaNode::Namespace(BTreeMap::new()));
            level = match node {
                SchemaNode::Namespace(children) => children,
                SchemaNode::Leaf(_) => {
                    return Err(ValidationError::invalid_format(
                        "field_path",
                        format!("'{}' crosses a declared leaf", path),
                    ))
                }
            };
        }

        if level.contains_key(leaf) {
            return Err(ValidationError::invalid_format(
                "field_path",
                format!("'{}' is declared twice", path),
            ));
        }
        level.insert(
            leaf.clone(),
            SchemaNode::Leaf(FieldSpec {
                kind,
                label: label.into(),
            }),
        );
        Ok(self)
    }

    /// Top-level namespaces.
    pub fn namespaces(&self) -> &BTreeMap<String, SchemaNode> {
        &self.root
    }

    /// Looks up a declared leaf.
    pub fn leaf(&self, path: &FieldPath) -> Option<&FieldSpec> {
        let (leaf, namespaces) = path.segments().split_last()?;
        let mut level = &self.root;
        for name in namespaces {
            match level.get(name)? {
                SchemaNode::Namespace(children) => level = children,
                SchemaNode::Leaf(_) => return None,
            }
        }
        match level.get(leaf)? {
            SchemaNode::Leaf(spec) => Some(spec),
            SchemaNode::Namespace(_) => None,
        }
    }

    /// All declared leaf paths in sorted order.
    pub fn leaf_paths(&self) -> Vec<FieldPath> {
        fn walk(level: &BTreeMap<String, SchemaNode>, prefix: &mut Vec<String>, out: &mut Vec<FieldPath>) {
            for (name, node) in level {
                prefix.push(name.clone());
                match node {
                    SchemaNode::Leaf(_) => {
                        if let Ok(path) = FieldPath::from_segments(prefix.iter().cloned()) {
                            out.push(path);
                        }
                    }
                    SchemaNode::Namespace(children) => walk(children, prefix, out),
                }
                prefix.pop();
            }
        }

        let mut out = Vec::new();
        walk(&self.root, &mut Vec::new(), &mut out);
        out
    }

    /// Human label for a declared leaf, falling back to the dotted path.
    pub fn label_for(&self, path: &FieldPath) -> String {
        self.leaf(path)
            .map(|spec| spec.label.clone())
            .unwrap_or_else(|| path.to_string())
    }
}
