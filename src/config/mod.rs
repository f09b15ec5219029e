//! Application configuration module
//!
//! This module provides type-safe configuration loading from environment variables
//! using the `config` and `dotenvy` crates. Configuration is loaded with the
//! `MOA_CHAT` prefix and nested values use double underscores as separators.
//!
//! # Example
//!
//! ```no_run
//! use moa_chat::config::AppConfig;
//!
//! let config = AppConfig::load().expect("Failed to load configuration");
//! config.validate().expect("Invalid configuration");
//!
//! println!("Server running on {}", config.server.socket_addr().unwrap());
//! ```

mod ai;
mod branding;
mod database;
mod error;
mod server;
mod uploads;

pub use ai::{AiConfig, AiProvider};
pub use branding::BrandingConfig;
pub use database::DatabaseConfig;
pub use error::{ConfigError, ValidationError};
pub use server::{Environment, ServerConfig};
pub use uploads::UploadsConfig;

use secrecy::Secret;
use serde::Deserialize;

/// Root application configuration
///
/// Every section has defaults; only the completion API key is required
/// when the Together provider is selected.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Server configuration (host, port, environment)
    #[serde(default)]
    pub server: ServerConfig,

    /// Database configuration (SQLite)
    #[serde(default)]
    pub database: DatabaseConfig,

    /// Completion provider configuration
    #[serde(default)]
    pub ai: AiConfig,

    /// Upload handling
    #[serde(default)]
    pub uploads: UploadsConfig,

    /// Branding exposed to clients
    #[serde(default)]
    pub branding: BrandingConfig,
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// This function:
    /// 1. Loads `.env` file if present (for development)
    /// 2. Reads environment variables with `MOA_CHAT` prefix
    /// 3. Uses `__` (double underscore) to separate nested values
    /// 4. Falls back to a plain `TOGETHER_API_KEY` variable for the API key
    ///
    /// # Environment Variable Format
    ///
    /// - `MOA_CHAT__SERVER__PORT=8080` -> `server.port = 8080`
    /// - `MOA_CHAT__AI__API_KEY=...` -> `ai.api_key = ...`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if values cannot be parsed into expected types.
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let mut config: AppConfig = config::Config::builder()
            .add_source(
                config::Environment::default()
                    .prefix("MOA_CHAT")
                    .prefix_separator("__")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()?;

        if !config.ai.has_api_key() {
            if let Ok(key) = std::env::var("TOGETHER_API_KEY") {
                if !key.trim().is_empty() {
                    config.ai.api_key = Some(Secret::new(key));
                }
            }
        }

        Ok(config)
    }

    /// Validate all configuration values
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` if any configuration value is invalid.
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.server.validate()?;
        self.database.validate()?;
        self.ai.validate()?;
        self.uploads.validate()?;
        if self.ai.timeout_secs >= self.server.request_timeout_secs {
            return Err(ValidationError::InvalidGenerationTimeout);
        }
        Ok(())
    }

    /// Check if running in production environment
    pub fn is_production(&self) -> bool {
        self.server.is_production()
    }
}
