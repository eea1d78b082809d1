//! AI Provider Adapters.
//!
//! Implementations of the AIProvider port for various LLM providers.
//!
//! ## Available Adapters
//!
//! - `MockAIProvider` - Configurable mock for testing
//! - `OpenAIProvider` - OpenAI chat models
//! - `AnthropicProvider` - Anthropic Claude models

mod anthropic_provider;
mod http;
mod mock_provider;
mod openai_provider;

pub use anthropic_provider::{AnthropicConfig, AnthropicProvider};
pub use mock_provider::{MockAIProvider, MockError, MockResponse};
pub use openai_provider::{OpenAIConfig, OpenAIProvider};

use std::sync::Arc;

use crate::config::{OracleConfig, ProviderKind};
use crate::ports::{AIError, AIProvider};

/// Builds the provider selected by configuration.
///
/// # Errors
///
/// - `AuthenticationFailed` if the selected provider has no API key
/// - `InvalidRequest` if the HTTP client cannot be built
pub fn provider_from_config(config: &OracleConfig) -> Result<Arc<dyn AIProvider>, AIError> {
    let provider: Arc<dyn AIProvider> = match config.provider {
        ProviderKind::OpenAI => {
            let key = config
                .openai_api_key
                .as_deref()
                .filter(|k| !k.is_empty())
                .ok_or(AIError::AuthenticationFailed)?;
            let mut openai = OpenAIConfig::new(key)
                .with_timeout(config.timeout())
                .with_max_retries(config.max_retries);
            if let Some(model) = &config.model {
                openai = openai.with_model(model);
            }
            Arc::new(OpenAIProvider::new(openai)?)
        }
        ProviderKind::Anthropic => {
            let key = config
                .anthropic_api_key
                .as_deref()
                .filter(|k| !k.is_empty())
                .ok_or(AIError::AuthenticationFailed)?;
            let mut anthropic = AnthropicConfig::new(key)
                .with_timeout(config.timeout())
                .with_max_retries(config.max_retries);
            if let Some(model) = &config.model {
                anthropic = anthropic.with_model(model);
            }
            Arc::new(AnthropicProvider::new(anthropic)?)
        }
        ProviderKind::Mock => Arc::new(MockAIProvider::new()),
    };

    let info = provider.provider_info();
    tracing::info!(provider = %info.name, model = %info.model, "oracle provider ready");
    Ok(provider)
}
