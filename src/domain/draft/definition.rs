//! Static configuration for one draft kind.

use super::{CompletionEvaluator, DraftSchema, FieldPath, MergePolicy, RequiredFieldSpec};
use crate::domain::foundation::{EntityKind, ValidationError};

/// Schema, required fields and closing message of one entity kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntityDefinition {
    kind: EntityKind,
    schema: DraftSchema,
    required: RequiredFieldSpec,
    confirmation: String,
}

impl EntityDefinition {
    /// Builds a definition whose required fields are all declared leaves.
    ///
    /// # Errors
    ///
    /// - `InvalidFormat` if a required path is not a leaf of `schema`
    /// - `EmptyField` if `confirmation` is blank
    pub fn new(
        kind: EntityKind,
        schema: DraftSchema,
        required: RequiredFieldSpec,
        confirmation: impl Into<String>,
    ) -> Result<Self, ValidationError> {
        let confirmation = confirmation.into();
        if confirmation.trim().is_empty() {
            return Err(ValidationError::empty_field("confirmation"));
        }
        if let Some(undeclared) = required.fields().iter().find(|p| schema.leaf(p).is_none()) {
            return Err(ValidationError::invalid_format(
                "required_fields",
                format!("'{}' is not a declared field", undeclared),
            ));
        }
        Ok(Self {
            kind,
            schema,
            required,
            confirmation,
        })
    }

    pub fn kind(&self) -> &EntityKind {
        &self.kind
    }

    pub fn schema(&self) -> &DraftSchema {
        &self.schema
    }

    pub fn required(&self) -> &RequiredFieldSpec {
        &self.required
    }

    /// Message shown once every required field is present.
    pub fn confirmation(&self) -> &str {
        &self.confirmation
    }

    pub fn merge_policy(&self) -> MergePolicy<'_> {
        MergePolicy::new(&self.schema)
    }

    pub fn evaluator(&self) -> CompletionEvaluator<'_> {
        CompletionEvaluator::new(&self.required)
    }

    /// Question asked when the oracle leaves the follow-up empty.
    pub fn question_for(&self, path: &FieldPath) -> String {
        format!(
            "Could you tell me the {} of your {}?",
            self.schema.label_for(path),
            self.kind
        )
    }
}
