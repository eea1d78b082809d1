//! Conversation domain module.
//!
//! Turn-based dialogue shared by listing intake and conversational search.

mod log;
mod turn;

pub use log::ConversationLog;
pub use turn::{ConversationTurn, Speaker};
