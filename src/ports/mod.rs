//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the domain and the outside world. Adapters implement these ports.
//!
//! ## Oracle Ports
//!
//! - `ExtractionOracle`, `VerificationOracle`, `SearchOracle` - the three oracle contracts
//! - `AIProvider` - LLM completion transport used by the oracle adapter
//! - `ResponseValidator` - Schema checks on raw oracle payloads
//!
//! ## Collaborator Ports
//!
//! - `DraftStore` - Draft persistence
//! - `ArtifactStorage` - Binary upload storage

mod ai_provider;
mod artifact_storage;
mod draft_store;
mod oracle;
mod response_validator;

pub use ai_provider::{
    AIError, AIProvider, CompletionRequest, CompletionResponse, FinishReason, Message,
    MessageRole, ProviderInfo, RequestMetadata, TokenUsage,
};
pub use artifact_storage::{ArtifactStorage, ArtifactStorageError};
pub use draft_store::{DraftRecord, DraftStore, DraftStoreError};
pub use oracle::{
    ExtractionOracle, ExtractionRequest, OracleError, SearchOracle, SearchRequest,
    VerificationOracle, VerificationRequest,
};
pub use response_validator::{ResponseValidationError, ResponseValidator};
