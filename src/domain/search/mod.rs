//! Search domain module.
//!
//! Candidate corpus, accumulated filters and the repeat-suppression ledger
//! used by conversational search.

mod corpus;
mod filters;
mod ledger;

pub use corpus::{ListingCorpus, ListingSummary};
pub use filters::search_filter_schema;
pub use ledger::SuggestionLedger;
