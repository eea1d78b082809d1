//! Session limits for listing intake, search and verification

use serde::Deserialize;
use std::path::PathBuf;

use super::error::ValidationError;

/// Per-session limits
#[derive(Debug, Clone, Deserialize)]
pub struct IntakeConfig {
    /// Longest accepted user message, in characters
    #[serde(default = "default_max_input_chars")]
    pub max_input_chars: usize,

    /// How many new listings one search turn may show
    #[serde(default = "default_max_suggestions")]
    pub max_suggestions_per_turn: usize,

    /// Largest artifact accepted for verification
    #[serde(default = "default_max_artifact_bytes")]
    pub max_artifact_bytes: usize,

    #[serde(default = "default_media_types")]
    pub accepted_media_types: Vec<String>,

    /// Selects the file-backed draft store when set
    pub drafts_dir: Option<PathBuf>,
}

impl IntakeConfig {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.max_input_chars == 0 {
            return Err(ValidationError::MustBePositive("max_input_chars"));
        }
        if self.max_suggestions_per_turn == 0 {
            return Err(ValidationError::MustBePositive("max_suggestions_per_turn"));
        }
        if self.max_artifact_bytes == 0 {
            return Err(ValidationError::MustBePositive("max_artifact_bytes"));
        }
        if self.accepted_media_types.iter().all(|m| m.trim().is_empty()) {
            return Err(ValidationError::NoAcceptedMediaTypes);
        }
        Ok(())
    }
}

impl Default for IntakeConfig {
    fn default() -> Self {
        Self {
            max_input_chars: default_max_input_chars(),
            max_suggestions_per_turn: default_max_suggestions(),
            max_artifact_bytes: default_max_artifact_bytes(),
            accepted_media_types: default_media_types(),
            drafts_dir: None,
        }
    }
}

fn default_max_input_chars() -> usize {
    4000
}

fn default_max_suggestions() -> usize {
    6
}

fn default_max_artifact_bytes() -> usize {
    10 * 1024 * 1024
}

fn default_media_types() -> Vec<String> {
    ["image/jpeg", "image/png", "image/webp", "application/pdf"]
        .into_iter()
        .map(String::from)
        .collect()
}
