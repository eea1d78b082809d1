//! Adapters - Implementations of port interfaces.
//!
//! Adapters connect the domain to external systems:
//! - `ai` - LLM providers (OpenAI, Anthropic, mock)
//! - `oracle` - The three oracle contracts over an LLM provider
//! - `validation` - JSON Schema checks on oracle answers
//! - `storage` - Draft and artifact persistence

pub mod ai;
pub mod oracle;
pub mod storage;
pub mod validation;

pub use ai::{provider_from_config, MockAIProvider};
pub use oracle::LlmOracle;
pub use storage::{FileDraftStore, InMemoryArtifactStorage, InMemoryDraftStore};
pub use validation::JsonResponseValidator;
