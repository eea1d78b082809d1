//! Foundation module - Shared domain primitives.
//!
//! Identifiers, timestamps, the state machine trait and value-object
//! validation errors used across the intake, search and verification flows.

mod errors;
mod ids;
mod state_machine;
mod timestamp;

pub use errors::ValidationError;
pub use ids::{ArtifactId, DraftId, EntityKind, SessionId};
pub use state_machine::StateMachine;
pub use timestamp::Timestamp;
