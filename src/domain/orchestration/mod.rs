//! Orchestration domain module.
//!
//! The turn state machine and the log-owning turn cycle that every
//! conversational session drives.

mod cycle;
mod errors;
mod state;

pub use cycle::{TurnCycle, BLANK_REPLY};
pub use errors::TurnError;
pub use state::TurnState;
