//! Application layer - Sessions and their wiring.
//!
//! This layer orchestrates domain operations and coordinates between ports.
//! Every oracle failure is absorbed here and turned into an assistant reply;
//! only persistence errors and synchronous turn rejections reach callers.

pub mod handlers;
mod session_registry;
mod settings;

pub use handlers::{
    ListingIntakeSession, MergedTurn, PublishError, SearchSession, SearchTurnOutcome,
    SuggestionTurn, TurnOutcome, VerificationGate,
};
pub use session_registry::{RegistryError, SessionRegistry};
pub use settings::SessionSettings;
