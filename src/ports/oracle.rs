//! Oracle Port - the three structured request/response contracts.
//!
//! Each contract is a pure function of its read-only context. Requests
//! borrow session state; implementations cannot keep or mutate it.
//!
//! The search contract is deliberately never given the suggestion ledger.
//! Repeat suppression happens after the oracle answers.

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::conversation::ConversationLog;
use crate::domain::draft::{DraftEntity, EntityDefinition};
use crate::domain::foundation::SessionId;
use crate::domain::oracle::{ExtractionResult, SearchResult};
use crate::domain::search::ListingCorpus;
use crate::domain::verification::{VerificationArtifact, VerificationVerdict};
use crate::ports::AIError;

/// Turn-scoped oracle failures. Neither may change session state.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum OracleError {
    /// The call could not complete (transport, provider outage, timeout).
    #[error("oracle unavailable: {0}")]
    Unavailable(String),

    /// The answer did not satisfy the contract's schema.
    #[error("oracle returned a malformed response: {0}")]
    MalformedResponse(String),
}

impl OracleError {
    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::Unavailable(message.into())
    }

    pub fn malformed(message: impl Into<String>) -> Self {
        Self::MalformedResponse(message.into())
    }
}

impl From<AIError> for OracleError {
    fn from(err: AIError) -> Self {
        match err {
            AIError::Parse(message) => Self::MalformedResponse(message),
            other => Self::Unavailable(other.to_string()),
        }
    }
}

/// Context for one extraction call.
#[derive(Debug, Clone, Copy)]
pub struct ExtractionRequest<'a> {
    pub session_id: SessionId,
    pub log: &'a ConversationLog,
    pub draft: &'a DraftEntity,
    /// Schema and required fields of the entity being drafted.
    pub definition: &'a EntityDefinition,
}

/// Context for one verification call. No conversation.
#[derive(Debug, Clone, Copy)]
pub struct VerificationRequest<'a> {
    pub session_id: SessionId,
    pub artifact: &'a VerificationArtifact,
    /// Where the artifact bytes were stored.
    pub handle: &'a str,
}

/// Context for one search call.
#[derive(Debug, Clone, Copy)]
pub struct SearchRequest<'a> {
    pub session_id: SessionId,
    pub log: &'a ConversationLog,
    pub corpus: &'a ListingCorpus,
}

/// Turns the conversation into a partial draft update plus a follow-up.
#[async_trait]
pub trait ExtractionOracle: Send + Sync {
    async fn extract(&self, request: ExtractionRequest<'_>) -> Result<ExtractionResult, OracleError>;
}

/// Judges one uploaded artifact.
#[async_trait]
pub trait VerificationOracle: Send + Sync {
    async fn verify(
        &self,
        request: VerificationRequest<'_>,
    ) -> Result<VerificationVerdict, OracleError>;
}

/// Turns a guest's conversation into a narrative, candidates and filters.
#[async_trait]
pub trait SearchOracle: Send + Sync {
    async fn search(&self, request: SearchRequest<'_>) -> Result<SearchResult, OracleError>;
}
