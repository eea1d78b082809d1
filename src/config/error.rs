//! Configuration error types

use thiserror::Error;

/// Errors that can occur during configuration loading
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration loading failed: {0}")]
    LoadError(#[from] config::ConfigError),

    #[error("Validation failed: {0}")]
    ValidationFailed(#[from] ValidationError),
}

/// Errors that can occur during configuration validation
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Required configuration missing: {0}")]
    MissingRequired(&'static str),

    #[error("Invalid oracle timeout (must be 1..=300 seconds)")]
    InvalidTimeout,

    #[error("Oracle temperature must be within 0.0..=2.0")]
    InvalidTemperature,

    #[error("{0} must be at least 1")]
    MustBePositive(&'static str),

    #[error("At least one accepted media type is required")]
    NoAcceptedMediaTypes,
}
