//! File-based Draft Store Adapter
//!
//! Stores each draft record as a YAML file on disk, one file per record,
//! grouped by entity kind: `<base>/<kind>/<id>.yaml`.

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tokio::fs;

use crate::domain::draft::DraftEntity;
use crate::domain::foundation::{DraftId, EntityKind, Timestamp};
use crate::ports::{DraftRecord, DraftStore, DraftStoreError};

/// File-based storage for draft records
#[derive(Debug, Clone)]
pub struct FileDraftStore {
    base_path: PathBuf,
}

impl FileDraftStore {
    /// Create a new file store rooted at `base_path`
    ///
    /// # Example
    /// ```ignore
    /// let store = FileDraftStore::new("./data/drafts");
    /// ```
    pub fn new<P: AsRef<Path>>(base_path: P) -> Self {
        Self {
            base_path: base_path.as_ref().to_path_buf(),
        }
    }

    fn kind_dir(&self, kind: &EntityKind) -> PathBuf {
        self.base_path.join(kind.as_str())
    }

    fn record_path(&self, kind: &EntityKind, id: DraftId) -> PathBuf {
        self.kind_dir(kind).join(format!("{}.yaml", id))
    }

    async fn write_record(&self, record: &DraftRecord) -> Result<(), DraftStoreError> {
        fs::create_dir_all(self.kind_dir(&record.kind))
            .await
            .map_err(|e| DraftStoreError::IoError(e.to_string()))?;

        let yaml = serde_yaml::to_string(record)
            .map_err(|e| DraftStoreError::SerializationFailed(e.to_string()))?;

        fs::write(self.record_path(&record.kind, record.id), yaml)
            .await
            .map_err(|e| DraftStoreError::IoError(e.to_string()))
    }

    /// Reads the full record, including when it was saved.
    pub async fn load_record(
        &self,
        kind: &EntityKind,
        id: DraftId,
    ) -> Result<DraftRecord, DraftStoreError> {
        let path = self.record_path(kind, id);
        if !fs::try_exists(&path).await.unwrap_or(false) {
            return Err(DraftStoreError::NotFound {
                kind: kind.clone(),
                id,
            });
        }

        let yaml = fs::read_to_string(&path)
            .await
            .map_err(|e| DraftStoreError::IoError(e.to_string()))?;

        serde_yaml::from_str(&yaml).map_err(|e| DraftStoreError::DeserializationFailed(e.to_string()))
    }
}

#[async_trait]
impl DraftStore for FileDraftStore {
    async fn save(&self, kind: &EntityKind, draft: &DraftEntity) -> Result<DraftId, DraftStoreError> {
        let record = DraftRecord {
            id: DraftId::new(),
            kind: kind.clone(),
            saved_at: Timestamp::now(),
            draft: draft.clone(),
        };
        self.write_record(&record).await?;
        Ok(record.id)
    }

    async fn update(
        &self,
        kind: &EntityKind,
        id: DraftId,
        draft: &DraftEntity,
    ) -> Result<(), DraftStoreError> {
        // Existing record required; update never creates.
        self.load_record(kind, id).await?;
        self.write_record(&DraftRecord {
            id,
            kind: kind.clone(),
            saved_at: Timestamp::now(),
            draft: draft.clone(),
        })
        .await
    }

    async fn load(&self, kind: &EntityKind, id: DraftId) -> Result<DraftEntity, DraftStoreError> {
        Ok(self.load_record(kind, id).await?.draft)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    fn listing() -> EntityKind {
        EntityKind::new("listing").unwrap()
    }

    fn draft() -> DraftEntity {
        DraftEntity::from_snapshot(json!({
            "basics": { "title": "Lake House" },
            "capacity": { "maxGuests": 0 },
            "pricing": { "basePrice": 9000.5 }
        }))
        .unwrap()
    }

    #[tokio::test]
    async fn save_and_load_round_trips_values() {
        let temp_dir = TempDir::new().unwrap();
        let store = FileDraftStore::new(temp_dir.path());

        let id = store.save(&listing(), &draft()).await.unwrap();
        let loaded = store.load(&listing(), id).await.unwrap();

        assert_eq!(loaded, draft());
    }

    #[tokio::test]
    async fn writes_one_yaml_file_per_record() {
        let temp_dir = TempDir::new().unwrap();
        let store = FileDraftStore::new(temp_dir.path());

        let id = store.save(&listing(), &draft()).await.unwrap();
        let path = temp_dir.path().join("listing").join(format!("{}.yaml", id));
        let yaml = std::fs::read_to_string(path).unwrap();

        assert!(yaml.contains("Lake House"));
        assert!(yaml.contains("saved_at"));
    }

    #[tokio::test]
    async fn load_missing_is_not_found() {
        let temp_dir = TempDir::new().unwrap();
        let store = FileDraftStore::new(temp_dir.path());

        let result = store.load(&listing(), DraftId::new()).await;
        assert!(matches!(result, Err(DraftStoreError::NotFound { .. })));
    }

    #[tokio::test]
    async fn load_with_other_kind_is_not_found() {
        let temp_dir = TempDir::new().unwrap();
        let store = FileDraftStore::new(temp_dir.path());

        let id = store.save(&listing(), &draft()).await.unwrap();
        let other = EntityKind::new("profile").unwrap();
        assert!(matches!(
            store.load(&other, id).await,
            Err(DraftStoreError::NotFound { .. })
        ));
    }

    #[tokio::test]
    async fn update_replaces_draft_in_place() {
        let temp_dir = TempDir::new().unwrap();
        let store = FileDraftStore::new(temp_dir.path());

        let id = store.save(&listing(), &DraftEntity::new()).await.unwrap();
        store.update(&listing(), id, &draft()).await.unwrap();

        assert_eq!(store.load(&listing(), id).await.unwrap(), draft());
        let files = std::fs::read_dir(temp_dir.path().join("listing")).unwrap().count();
        assert_eq!(files, 1);
    }

    #[tokio::test]
    async fn update_unknown_record_fails() {
        let temp_dir = TempDir::new().unwrap();
        let store = FileDraftStore::new(temp_dir.path());

        let result = store.update(&listing(), DraftId::new(), &draft()).await;
        assert!(matches!(result, Err(DraftStoreError::NotFound { .. })));
    }

    #[tokio::test]
    async fn corrupt_file_is_deserialization_error() {
        let temp_dir = TempDir::new().unwrap();
        let store = FileDraftStore::new(temp_dir.path());

        let id = store.save(&listing(), &draft()).await.unwrap();
        let path = temp_dir.path().join("listing").join(format!("{}.yaml", id));
        std::fs::write(path, ": not: [valid").unwrap();

        assert!(matches!(
            store.load(&listing(), id).await,
            Err(DraftStoreError::DeserializationFailed(_))
        ));
    }
}
