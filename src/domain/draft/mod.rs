//! Draft domain module.
//!
//! The accumulating structured record, its schema, the merge that folds
//! oracle updates into it and the completion gate.

mod completion;
mod definition;
mod entity;
mod field_path;
mod listing;
mod merge;
mod schema;

pub use completion::{is_present, CompletionEvaluator, RequiredFieldSpec};
pub use definition::EntityDefinition;
pub use entity::DraftEntity;
pub(crate) use entity::json_type_name;
pub use field_path::FieldPath;
pub use listing::{listing_definition, LISTING_REQUIRED_FIELDS};
pub use merge::{MergeOutcome, MergePolicy, SchemaViolation, ViolationKind};
pub use schema::{DraftSchema, FieldKind, FieldSpec, SchemaNode};
