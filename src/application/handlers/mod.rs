//! Application handlers.
//!
//! Session types that drive the turn loop against the oracle ports.

mod conversational_search;
mod listing_intake;
mod oracle_call;
mod verification_gate;

pub use conversational_search::{SearchSession, SearchTurnOutcome, SuggestionTurn};
pub use listing_intake::{ListingIntakeSession, MergedTurn, PublishError, TurnOutcome};
pub use verification_gate::VerificationGate;
