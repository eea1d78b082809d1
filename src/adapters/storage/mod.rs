//! Storage Adapters
//!
//! Implementations of the persistence collaborators.
//!
//! ## Available Adapters
//!
//! - **FileDraftStore** - Stores draft records as YAML files on disk
//! - **InMemoryDraftStore** - Stores draft records in memory (testing/development)
//! - **InMemoryArtifactStorage** - Content-addressed upload storage
//!
//! ## Usage
//!
//! ```ignore
//! use adapters::storage::{FileDraftStore, InMemoryDraftStore};
//!
//! // Production: file-based storage
//! let store = FileDraftStore::new("./data/drafts");
//!
//! // Testing: in-memory storage
//! let store = InMemoryDraftStore::new();
//! ```

mod file_draft_store;
mod in_memory_artifact_storage;
mod in_memory_draft_store;

pub use file_draft_store::FileDraftStore;
pub use in_memory_artifact_storage::InMemoryArtifactStorage;
pub use in_memory_draft_store::InMemoryDraftStore;
