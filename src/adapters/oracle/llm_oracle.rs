//! LLM-backed oracle.
//!
//! One adapter serves all three contracts. Every answer goes through the same
//! gauntlet before it is trusted: locate the JSON object in the model text,
//! sanitize it, validate it against the contract schema, then deserialize.

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::sync::Arc;
use uuid::Uuid;

use super::prompts;
use crate::config::OracleConfig;
use crate::domain::foundation::SessionId;
use crate::domain::oracle::{ExtractionResult, OracleContract, PayloadExtractor, SearchResult};
use crate::domain::verification::VerificationVerdict;
use crate::ports::{
    AIProvider, CompletionRequest, ExtractionOracle, ExtractionRequest, FinishReason, Message,
    OracleError, RequestMetadata, ResponseValidator, SearchOracle, SearchRequest,
    VerificationOracle, VerificationRequest,
};

/// Oracle implementation over any [`AIProvider`].
pub struct LlmOracle {
    provider: Arc<dyn AIProvider>,
    validator: Arc<dyn ResponseValidator>,
    extractor: PayloadExtractor,
    max_tokens: u32,
    temperature: f32,
}

impl LlmOracle {
    pub fn new(provider: Arc<dyn AIProvider>, validator: Arc<dyn ResponseValidator>) -> Self {
        Self {
            provider,
            validator,
            extractor: PayloadExtractor::new(),
            max_tokens: 1024,
            temperature: 0.2,
        }
    }

    /// Applies the token and temperature settings from configuration.
    pub fn configured(mut self, config: &OracleConfig) -> Self {
        self.max_tokens = config.max_tokens;
        self.temperature = config.temperature;
        self
    }

    pub fn with_extractor(mut self, extractor: PayloadExtractor) -> Self {
        self.extractor = extractor;
        self
    }

    async fn call<T: DeserializeOwned>(
        &self,
        contract: OracleContract,
        session_id: SessionId,
        system_prompt: String,
        messages: Vec<Message>,
    ) -> Result<T, OracleError> {
        let trace_id = Uuid::new_v4().to_string();
        let mut request =
            CompletionRequest::new(RequestMetadata::new(session_id, contract, trace_id.as_str()))
                .with_system_prompt(system_prompt)
                .with_max_tokens(self.max_tokens)
                .with_temperature(self.temperature);
        request.messages = messages;

        tracing::debug!(
            session_id = %session_id,
            %contract,
            trace_id = %trace_id,
            messages = request.messages.len(),
            "calling oracle"
        );

        let response = self.provider.complete(request).await?;
        match response.finish_reason {
            FinishReason::Length => {
                return Err(OracleError::malformed("answer was cut off at the token limit"))
            }
            FinishReason::ContentFilter => {
                return Err(OracleError::unavailable("provider withheld the answer"))
            }
            _ => {}
        }

        let payload = self
            .extractor
            .extract_object(&response.content)
            .map(Value::Object)
            .map_err(|e| OracleError::malformed(e.to_string()))?;
        self.validator
            .validate(contract, &payload)
            .map_err(|e| OracleError::malformed(e.to_string()))?;

        serde_json::from_value(payload).map_err(|e| OracleError::malformed(e.to_string()))
    }
}

#[async_trait]
impl ExtractionOracle for LlmOracle {
    async fn extract(&self, request: ExtractionRequest<'_>) -> Result<ExtractionResult, OracleError> {
        let system = prompts::extraction_system_prompt(
            request.definition,
            request.draft,
            self.validator.schema_for(OracleContract::Extraction),
        );
        self.call(
            OracleContract::Extraction,
            request.session_id,
            system,
            prompts::transcript(request.log),
        )
        .await
    }
}

#[async_trait]
impl VerificationOracle for LlmOracle {
    async fn verify(
        &self,
        request: VerificationRequest<'_>,
    ) -> Result<VerificationVerdict, OracleError> {
        let system =
            prompts::verification_system_prompt(self.validator.schema_for(OracleContract::Verification));
        let message = Message::user(prompts::verification_request(request.artifact, request.handle));
        self.call(
            OracleContract::Verification,
            request.session_id,
            system,
            vec![message],
        )
        .await
    }
}

#[async_trait]
impl SearchOracle for LlmOracle {
    async fn search(&self, request: SearchRequest<'_>) -> Result<SearchResult, OracleError> {
        let system = prompts::search_system_prompt(
            request.corpus,
            self.validator.schema_for(OracleContract::Search),
        );
        self.call(
            OracleContract::Search,
            request.session_id,
            system,
            prompts::transcript(request.log),
        )
        .await
    }
}
