//! Per-session knobs derived from configuration.

use std::time::Duration;

use crate::config::AppConfig;

/// Limits every session type reads from.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionSettings {
    pub max_input_chars: usize,
    pub max_suggestions_per_turn: usize,
    pub max_artifact_bytes: usize,
    /// Lower-cased media types the verification gate accepts.
    pub accepted_media_types: Vec<String>,
    /// Upper bound on one oracle call. Expiry counts as the oracle being unavailable.
    pub oracle_timeout: Duration,
}

impl SessionSettings {
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            max_input_chars: config.intake.max_input_chars,
            max_suggestions_per_turn: config.intake.max_suggestions_per_turn,
            max_artifact_bytes: config.intake.max_artifact_bytes,
            accepted_media_types: config
                .intake
                .accepted_media_types
                .iter()
                .map(|m| m.trim().to_ascii_lowercase())
                .filter(|m| !m.is_empty())
                .collect(),
            oracle_timeout: config.oracle.timeout(),
        }
    }

    pub fn with_oracle_timeout(mut self, timeout: Duration) -> Self {
        self.oracle_timeout = timeout;
        self
    }

    pub fn with_max_suggestions(mut self, max: usize) -> Self {
        self.max_suggestions_per_turn = max;
        self
    }

    pub fn accepts_media_type(&self, media_type: &str) -> bool {
        self.accepted_media_types.iter().any(|m| m == media_type)
    }
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self::from_config(&AppConfig::default())
    }
}
