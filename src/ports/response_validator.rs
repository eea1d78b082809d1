//! Response Validator Port - oracle answer validation.
//!
//! Every oracle answer is treated as untrusted input and checked against its
//! contract's JSON Schema before it is deserialized.

use serde_json::Value;
use thiserror::Error;

use crate::domain::oracle::OracleContract;

/// Port for validating raw oracle payloads.
///
/// # Usage
///
/// ```rust,ignore
/// let validator: &dyn ResponseValidator = &JsonResponseValidator::new();
/// validator.validate(OracleContract::Extraction, &payload)?;
/// let schema = validator.schema_for(OracleContract::Search); // embedded in the prompt
/// ```
pub trait ResponseValidator: Send + Sync {
    /// Validate a payload against the contract's schema.
    fn validate(&self, contract: OracleContract, payload: &Value) -> Result<(), ResponseValidationError>;

    /// The JSON Schema for a contract.
    fn schema_for(&self, contract: OracleContract) -> &Value;
}

/// Why a payload was refused.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ResponseValidationError {
    #[error("Missing required field: {field}")]
    MissingRequired { field: String },

    #[error("Invalid type for field {field}: expected {expected}, got {actual}")]
    InvalidType {
        field: String,
        expected: String,
        actual: String,
    },

    #[error("Schema validation failed: {message}")]
    Generic { message: String },

    #[error("Validation errors: {0:?}")]
    Multiple(Vec<ResponseValidationError>),
}

impl ResponseValidationError {
    /// Number of individual failures.
    pub fn error_count(&self) -> usize {
        match self {
            Self::Multiple(errors) => errors.len(),
            _ => 1,
        }
    }

    /// Folds a list of failures into one error.
    pub fn collect(mut errors: Vec<ResponseValidationError>) -> Option<Self> {
        match errors.len() {
            0 => None,
            1 => errors.pop(),
            _ => Some(Self::Multiple(errors)),
        }
    }
}
