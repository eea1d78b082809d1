//! Deep merge of oracle partial updates into a draft.
//!
//! Oracle answers are always partial and turn-scoped, so a plain top-level
//! overwrite would drop sibling fields captured on earlier turns. The merge
//! here recurses namespace by namespace and only replaces leaves the update
//! actually names.

use serde::Serialize;
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::fmt;

use super::entity::json_type_name;
use super::schema::{DraftSchema, FieldKind, SchemaNode};
use super::{DraftEntity, FieldPath};

/// Why part of an update was ignored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ViolationKind {
    /// The path is not declared in the schema.
    UnknownPath,
    /// A declared leaf received a value of the wrong JSON type.
    TypeMismatch { expected: FieldKind, actual: String },
    /// A declared namespace received a scalar or array instead of an object.
    NotANamespace { actual: String },
}

/// A warning raised while merging. Never fails the turn.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SchemaViolation {
    /// Dotted location of the offending branch as the oracle spelled it.
    pub path: String,
    #[serde(flatten)]
    pub kind: ViolationKind,
}

impl fmt::Display for SchemaViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            ViolationKind::UnknownPath => write!(f, "unknown field path '{}'", self.path),
            ViolationKind::TypeMismatch { expected, actual } => write!(
                f,
                "field '{}' expects {}, got {}",
                self.path, expected, actual
            ),
            ViolationKind::NotANamespace { actual } => {
                write!(f, "'{}' is a namespace, got {}", self.path, actual)
            }
        }
    }
}

/// Result of applying one update.
#[derive(Debug, Clone, PartialEq)]
pub struct MergeOutcome {
    /// The draft after the merge.
    pub draft: DraftEntity,
    /// Leaves whose value was set or changed by this update.
    pub changed: Vec<FieldPath>,
    /// Ignored branches.
    pub violations: Vec<SchemaViolation>,
}

/// Schema-guided recursive merge.
#[derive(Debug, Clone, Copy)]
pub struct MergePolicy<'a> {
    schema: &'a DraftSchema,
}

impl<'a> MergePolicy<'a> {
    /// Creates a merge policy bound to a schema.
    pub fn new(schema: &'a DraftSchema) -> Self {
        Self { schema }
    }

    /// Folds `update` into `draft`, returning a new draft.
    ///
    /// - Namespaces and leaves absent from `update` are kept as they are.
    /// - A leaf named in `update` replaces the draft's leaf.
    /// - `null` leaves carry no information and are skipped.
    /// - Undeclared or mistyped branches are skipped and reported.
    ///
    /// The input draft is never modified, so a caller that drops the outcome
    /// observes no partial merge.
    pub fn apply(&self, draft: &DraftEntity, update: &Map<String, Value>) -> MergeOutcome {
        let mut merged = draft.as_map().clone();
        let mut changed = Vec::new();
        let mut violations = Vec::new();
        merge_level(
            self.schema.namespaces(),
            &mut merged,
            update,
            &mut Vec::new(),
            &mut changed,
            &mut violations,
        );
        MergeOutcome {
            draft: DraftEntity::from_map(merged),
            changed,
            violations,
        }
    }
}

fn merge_level(
    declared: &BTreeMap<String, SchemaNode>,
    target: &mut Map<String, Value>,
    update: &Map<String, Value>,
    prefix: &mut Vec<String>,
    changed: &mut Vec<FieldPath>,
    violations: &mut Vec<SchemaViolation>,
) {
    for (key, incoming) in update {
        prefix.push(key.clone());
        match declared.get(key) {
            None => violations.push(SchemaViolation {
                path: prefix.join("."),
                kind: ViolationKind::UnknownPath,
            }),
            Some(SchemaNode::Namespace(children)) => match incoming {
                Value::Null => {}
                Value::Object(nested) => {
                    let mut level = target
                        .get(key)
                        .and_then(Value::as_object)
                        .cloned()
                        .unwrap_or_default();
                    merge_level(children, &mut level, nested, prefix, changed, violations);
                    if !level.is_empty() {
                        target.insert(key.clone(), Value::Object(level));
                    }
                }
                other => violations.push(SchemaViolation {
                    path: prefix.join("."),
                    kind: ViolationKind::NotANamespace {
                        actual: json_type_name(other).to_string(),
                    },
                }),
            },
            Some(SchemaNode::Leaf(spec)) => {
                if incoming.is_null() {
                    // no information, keep what we have
                } else if spec.kind.accepts(incoming) {
                    if target.get(key) != Some(incoming) {
                        if let Ok(path) = FieldPath::from_segments(prefix.iter().cloned()) {
                            changed.push(path);
                        }
                        target.insert(key.clone(), incoming.clone());
                    }
                } else {
                    violations.push(SchemaViolation {
                        path: prefix.join("."),
                        kind: ViolationKind::TypeMismatch {
                            expected: spec.kind,
                            actual: json_type_name(incoming).to_string(),
                        },
                    });
                }
            }
        }
        prefix.pop();
    }
}
