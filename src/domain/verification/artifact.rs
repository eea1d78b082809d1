//! An uploaded document awaiting a verdict.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{ArtifactId, ValidationError};

/// One upload in a verification batch.
///
/// The caller stores the bytes before submission and attaches the returned
/// URL with [`with_handle`](Self::with_handle); the oracle only ever sees that
/// handle. The bytes stay for local pre-checks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerificationArtifact {
    id: ArtifactId,
    #[serde(skip)]
    bytes: Vec<u8>,
    media_type: String,
    described_kind: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    handle: Option<String>,
}

impl VerificationArtifact {
    /// Creates an artifact.
    ///
    /// # Errors
    ///
    /// - `EmptyField` if `media_type` or `described_kind` is blank
    pub fn new(
        bytes: Vec<u8>,
        media_type: impl Into<String>,
        described_kind: impl Into<String>,
    ) -> Result<Self, ValidationError> {
        let media_type = media_type.into().trim().to_ascii_lowercase();
        let described_kind = described_kind.into().trim().to_string();
        if media_type.is_empty() {
            return Err(ValidationError::empty_field("media_type"));
        }
        if described_kind.is_empty() {
            return Err(ValidationError::empty_field("described_kind"));
        }
        Ok(Self {
            id: ArtifactId::new(),
            bytes,
            media_type,
            described_kind,
            handle: None,
        })
    }

    /// Attaches the storage URL returned for these bytes.
    pub fn with_handle(mut self, handle: impl Into<String>) -> Self {
        let handle = handle.into();
        self.handle = (!handle.trim().is_empty()).then_some(handle);
        self
    }

    pub fn id(&self) -> ArtifactId {
        self.id
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn size(&self) -> usize {
        self.bytes.len()
    }

    /// Lower-cased media type, e.g. `image/jpeg`.
    pub fn media_type(&self) -> &str {
        &self.media_type
    }

    /// What the uploader says this document is, e.g. `government id`.
    pub fn described_kind(&self) -> &str {
        &self.described_kind
    }

    /// Where the bytes were stored, once the caller has done so.
    pub fn handle(&self) -> Option<&str> {
        self.handle.as_deref()
    }
}
