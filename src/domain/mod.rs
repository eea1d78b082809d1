//! Domain layer containing business logic and domain types.
//!
//! Everything here is synchronous and oracle-free; it can be tested without
//! network access.
//!
//! # Module Organization
//!
//! - `foundation` - Shared primitives (IDs, errors, state machine, timestamps)
//! - `conversation` - Turns and the append-only conversation log
//! - `draft` - Draft entities, schemas, merge and completion
//! - `search` - Candidate corpus, accumulated filters, suggestion ledger
//! - `verification` - Artifacts, verdicts and per-artifact reports
//! - `orchestration` - Turn state machine and turn cycle
//! - `oracle` - Oracle result shapes and payload extraction

pub mod conversation;
pub mod draft;
pub mod foundation;
pub mod oracle;
pub mod orchestration;
pub mod search;
pub mod verification;
