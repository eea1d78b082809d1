//! Completion gate for drafts.
//!
//! Pure functions of the draft's current leaf values and the required field
//! list. No history, no oracle.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashSet;

use super::{DraftEntity, FieldPath};
use crate::domain::foundation::ValidationError;

/// Ordered list of fields a draft needs before it can be published.
///
/// The order is also the order in which missing fields are asked for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<FieldPath>", into = "Vec<FieldPath>")]
pub struct RequiredFieldSpec {
    fields: Vec<FieldPath>,
}

impl RequiredFieldSpec {
    /// Builds the spec, rejecting a path listed twice.
    pub fn new(fields: Vec<FieldPath>) -> Result<Self, ValidationError> {
        let mut seen = HashSet::new();
        for field in &fields {
            if !seen.insert(field) {
                return Err(ValidationError::invalid_format(
                    "required_fields",
                    format!("'{}' is listed twice", field),
                ));
            }
        }
        Ok(Self { fields })
    }

    /// Parses dotted paths in order.
    pub fn parse<'a>(paths: impl IntoIterator<Item = &'a str>) -> Result<Self, ValidationError> {
        let fields = paths
            .into_iter()
            .map(FieldPath::parse)
            .collect::<Result<Vec<_>, _>>()?;
        Self::new(fields)
    }

    pub fn fields(&self) -> &[FieldPath] {
        &self.fields
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl TryFrom<Vec<FieldPath>> for RequiredFieldSpec {
    type Error = ValidationError;

    fn try_from(fields: Vec<FieldPath>) -> Result<Self, Self::Error> {
        Self::new(fields)
    }
}

impl From<RequiredFieldSpec> for Vec<FieldPath> {
    fn from(spec: RequiredFieldSpec) -> Self {
        spec.fields
    }
}

/// Returns true if a stored leaf value counts as provided.
///
/// Numbers are present even when zero and booleans even when false. Text
/// must contain something other than whitespace and lists must have items.
pub fn is_present(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => false,
        Some(Value::Number(_)) | Some(Value::Bool(_)) => true,
        Some(Value::String(s)) => !s.trim().is_empty(),
        Some(Value::Array(items)) => !items.is_empty(),
        Some(Value::Object(_)) => false,
    }
}

/// Decides whether a draft is complete and what to ask for next.
#[derive(Debug, Clone, Copy)]
pub struct CompletionEvaluator<'a> {
    spec: &'a RequiredFieldSpec,
}

impl<'a> CompletionEvaluator<'a> {
    pub fn new(spec: &'a RequiredFieldSpec) -> Self {
        Self { spec }
    }

    /// True iff every required field is present.
    pub fn is_complete(&self, draft: &DraftEntity) -> bool {
        self.next_missing_field(draft).is_none()
    }

    /// First missing field in declared order.
    pub fn next_missing_field(&self, draft: &DraftEntity) -> Option<&'a FieldPath> {
        self.spec
            .fields()
            .iter()
            .find(|path| !is_present(draft.get(path)))
    }

    /// Every missing field in declared order.
    pub fn missing_fields(&self, draft: &DraftEntity) -> Vec<&'a FieldPath> {
        self.spec
            .fields()
            .iter()
            .filter(|path| !is_present(draft.get(path)))
            .collect()
    }
}
