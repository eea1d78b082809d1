//! Draft Store Port - persistence collaborator for drafts.
//!
//! The store is outside the core and shared across sessions; it is assumed
//! to synchronize itself. Failures are surfaced to the caller for retry and
//! never retried here.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::domain::draft::DraftEntity;
use crate::domain::foundation::{DraftId, EntityKind, Timestamp};

/// Errors that can occur during draft persistence.
#[derive(Debug, thiserror::Error)]
pub enum DraftStoreError {
    #[error("No {kind} draft with id {id}")]
    NotFound { kind: EntityKind, id: DraftId },

    #[error("Failed to serialize draft: {0}")]
    SerializationFailed(String),

    #[error("Failed to deserialize draft: {0}")]
    DeserializationFailed(String),

    #[error("IO error: {0}")]
    IoError(String),
}

/// One persisted draft snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DraftRecord {
    pub id: DraftId,
    pub kind: EntityKind,
    pub saved_at: Timestamp,
    pub draft: DraftEntity,
}

/// Port for saving and loading drafts.
#[async_trait]
pub trait DraftStore: Send + Sync {
    /// Stores a new record and returns its id.
    async fn save(&self, kind: &EntityKind, draft: &DraftEntity) -> Result<DraftId, DraftStoreError>;

    /// Replaces the draft of an existing record.
    ///
    /// # Errors
    /// Returns `DraftStoreError::NotFound` if no such record exists
    async fn update(
        &self,
        kind: &EntityKind,
        id: DraftId,
        draft: &DraftEntity,
    ) -> Result<(), DraftStoreError>;

    /// Loads a record's draft.
    ///
    /// # Errors
    /// Returns `DraftStoreError::NotFound` if no such record exists
    async fn load(&self, kind: &EntityKind, id: DraftId) -> Result<DraftEntity, DraftStoreError>;
}
