//! In-Memory Artifact Storage Adapter
//!
//! Content-addressed: the URL is derived from the SHA-256 of the bytes, so
//! identical uploads share one entry.

use async_trait::async_trait;
use sha2::{Digest, Sha256};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::ports::{ArtifactStorage, ArtifactStorageError};

const URL_PREFIX: &str = "mem://artifacts/";

#[derive(Debug, Clone)]
struct StoredArtifact {
    bytes: Vec<u8>,
    media_type: String,
}

/// In-memory storage for uploaded artifacts
#[derive(Debug, Clone, Default)]
pub struct InMemoryArtifactStorage {
    artifacts: Arc<RwLock<HashMap<String, StoredArtifact>>>,
}

impl InMemoryArtifactStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bytes and media type stored under `url`.
    pub async fn get(&self, url: &str) -> Option<(Vec<u8>, String)> {
        let key = url.strip_prefix(URL_PREFIX)?;
        self.artifacts
            .read()
            .await
            .get(key)
            .map(|a| (a.bytes.clone(), a.media_type.clone()))
    }

    pub async fn len(&self) -> usize {
        self.artifacts.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.artifacts.read().await.is_empty()
    }
}

fn content_hash(bytes: &[u8]) -> String {
    let digest = Sha256::digest(bytes);
    digest.iter().map(|b| format!("{:02x}", b)).collect()
}

#[async_trait]
impl ArtifactStorage for InMemoryArtifactStorage {
    async fn put(&self, bytes: &[u8], media_type: &str) -> Result<String, ArtifactStorageError> {
        if bytes.is_empty() {
            return Err(ArtifactStorageError::Empty);
        }
        let key = content_hash(bytes);
        self.artifacts
            .write()
            .await
            .entry(key.clone())
            .or_insert_with(|| StoredArtifact {
                bytes: bytes.to_vec(),
                media_type: media_type.to_string(),
            });
        Ok(format!("{}{}", URL_PREFIX, key))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn url_is_sha256_of_content() {
        let storage = InMemoryArtifactStorage::new();
        let url = storage.put(b"abc", "image/png").await.unwrap();
        assert_eq!(
            url,
            "mem://artifacts/ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }

    #[tokio::test]
    async fn identical_uploads_share_one_entry() {
        let storage = InMemoryArtifactStorage::new();
        let a = storage.put(b"same", "image/png").await.unwrap();
        let b = storage.put(b"same", "image/png").await.unwrap();

        assert_eq!(a, b);
        assert_eq!(storage.len().await, 1);
        assert_eq!(storage.get(&a).await, Some((b"same".to_vec(), "image/png".to_string())));
    }

    #[tokio::test]
    async fn rejects_empty_bytes() {
        let storage = InMemoryArtifactStorage::new();
        assert_eq!(storage.put(b"", "image/png").await, Err(ArtifactStorageError::Empty));
        assert!(storage.is_empty().await);
    }
}
