//! In-Memory Draft Store Adapter
//!
//! Keeps draft records in memory. Useful for testing and development.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::draft::DraftEntity;
use crate::domain::foundation::{DraftId, EntityKind, Timestamp};
use crate::ports::{DraftRecord, DraftStore, DraftStoreError};

/// In-memory storage for draft records
#[derive(Debug, Clone, Default)]
pub struct InMemoryDraftStore {
    records: Arc<RwLock<HashMap<DraftId, DraftRecord>>>,
}

impl InMemoryDraftStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the number of stored records
    pub async fn record_count(&self) -> usize {
        self.records.read().await.len()
    }

    /// Full record, including when it was saved.
    pub async fn record(&self, id: DraftId) -> Option<DraftRecord> {
        self.records.read().await.get(&id).cloned()
    }

    /// Clear all stored data (useful for tests)
    pub async fn clear(&self) {
        self.records.write().await.clear();
    }
}

fn not_found(kind: &EntityKind, id: DraftId) -> DraftStoreError {
    DraftStoreError::NotFound {
        kind: kind.clone(),
        id,
    }
}

#[async_trait]
impl DraftStore for InMemoryDraftStore {
    async fn save(&self, kind: &EntityKind, draft: &DraftEntity) -> Result<DraftId, DraftStoreError> {
        let id = DraftId::new();
        self.records.write().await.insert(
            id,
            DraftRecord {
                id,
                kind: kind.clone(),
                saved_at: Timestamp::now(),
                draft: draft.clone(),
            },
        );
        Ok(id)
    }

    async fn update(
        &self,
        kind: &EntityKind,
        id: DraftId,
        draft: &DraftEntity,
    ) -> Result<(), DraftStoreError> {
        let mut records = self.records.write().await;
        let record = records
            .get_mut(&id)
            .filter(|r| &r.kind == kind)
            .ok_or_else(|| not_found(kind, id))?;
        record.draft = draft.clone();
        record.saved_at = Timestamp::now();
        Ok(())
    }

    async fn load(&self, kind: &EntityKind, id: DraftId) -> Result<DraftEntity, DraftStoreError> {
        self.records
            .read()
            .await
            .get(&id)
            .filter(|r| &r.kind == kind)
            .map(|r| r.draft.clone())
            .ok_or_else(|| not_found(kind, id))
    }
}
