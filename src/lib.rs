//! Staybook - Conversational Intake and Search for a Short-Stay Marketplace
//!
//! Hosts describe a listing in free text and an oracle fills a structured
//! draft turn by turn. Guests search in free text and are never shown the same
//! listing twice. Uploaded documents are checked before a role upgrade.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod observability;
pub mod ports;
