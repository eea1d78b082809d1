//! Structured oracle answers and the contracts they belong to.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

/// The three request/response shapes the oracle is asked to satisfy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OracleContract {
    Extraction,
    Verification,
    Search,
}

impl OracleContract {
    pub fn all() -> &'static [OracleContract] {
        &[Self::Extraction, Self::Verification, Self::Search]
    }
}

impl fmt::Display for OracleContract {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Extraction => "extraction",
            Self::Verification => "verification",
            Self::Search => "search",
        };
        f.write_str(s)
    }
}

/// One turn's extraction answer. Consumed immediately, never stored.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractionResult {
    #[serde(default)]
    pub partial_update: Map<String, Value>,
    #[serde(default)]
    pub follow_up_prompt: String,
}

/// One turn's search answer.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResult {
    #[serde(default)]
    pub narrative: String,
    #[serde(default)]
    pub candidate_ids: Vec<String>,
    #[serde(default)]
    pub inferred_filters: Map<String, Value>,
}
