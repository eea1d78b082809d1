//! Artifact Storage Port - binary store for uploads.

use async_trait::async_trait;

/// Errors from the artifact store.
#[derive(Debug, Clone, thiserror::Error, PartialEq, Eq)]
pub enum ArtifactStorageError {
    #[error("Artifact is empty")]
    Empty,

    #[error("Storage failure: {0}")]
    Backend(String),
}

/// Port for storing uploaded bytes. Returns a URL usable as an opaque handle.
#[async_trait]
pub trait ArtifactStorage: Send + Sync {
    async fn put(&self, bytes: &[u8], media_type: &str) -> Result<String, ArtifactStorageError>;
}
