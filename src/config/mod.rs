//! Application configuration module
//!
//! Configuration is read from environment variables using the `config` and
//! `dotenvy` crates. Variables carry the `STAYBOOK` prefix and nested values
//! are separated by double underscores. Every section has defaults, so an
//! empty environment yields a runnable configuration backed by the mock
//! oracle.
//!
//! # Example
//!
//! ```no_run
//! use staybook::config::AppConfig;
//!
//! let config = AppConfig::load().expect("Failed to load configuration");
//! config.validate().expect("Invalid configuration");
//!
//! println!("Oracle provider: {:?}", config.oracle.provider);
//! ```

mod ai;
mod error;
mod intake;
mod logging;

pub use ai::{OracleConfig, ProviderKind};
pub use error::{ConfigError, ValidationError};
pub use intake::IntakeConfig;
pub use logging::{Environment, LoggingConfig};

use serde::Deserialize;

/// Root application configuration
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Log level and output format
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Oracle provider selection and call limits
    #[serde(default)]
    pub oracle: OracleConfig,

    /// Session limits
    #[serde(default)]
    pub intake: IntakeConfig,
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// This function:
    /// 1. Loads `.env` file if present (for development)
    /// 2. Reads environment variables with `STAYBOOK` prefix
    /// 3. Uses `__` (double underscore) to separate nested values
    /// 4. Deserializes into typed configuration structs
    ///
    /// # Environment Variable Format
    ///
    /// - `STAYBOOK__ORACLE__PROVIDER=openai` -> `oracle.provider = openai`
    /// - `STAYBOOK__INTAKE__ACCEPTED_MEDIA_TYPES=image/png,application/pdf`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if values cannot be parsed into expected types.
    pub fn load() -> Result<Self, ConfigError> {
        // Load .env file if present (development)
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(
                config::Environment::default()
                    .prefix("STAYBOOK")
                    .separator("__")
                    .try_parsing(true)
                    .list_separator(",")
                    .with_list_parse_key("intake.accepted_media_types"),
            )
            .build()?
            .try_deserialize()?;

        Ok(config)
    }

    /// Validate all configuration values
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` if any configuration value is invalid.
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.oracle.validate()?;
        self.intake.validate()?;
        Ok(())
    }

    /// Check if running in production environment
    pub fn is_production(&self) -> bool {
        self.logging.environment == Environment::Production
    }
}
