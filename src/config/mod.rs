//! Application configuration module
//!
//! Type-safe configuration loading from environment variables using the
//! `config` and `dotenvy` crates. Values use the `TASK_COURIER` prefix
//! with `__` separating nested sections.
//!
//! # Example
//!
//! ```no_run
//! use task_courier::config::AppConfig;
//!
//! let config = AppConfig::load().expect("Failed to load configuration");
//! config.validate().expect("Invalid configuration");
//! ```

mod error;
mod task_api;
mod telegram;

pub use error::{ConfigError, ValidationError};
pub use task_api::TaskApiConfig;
pub use telegram::TelegramConfig;

use serde::Deserialize;

/// Root application configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Telegram transport (token, polling, welcome image)
    pub telegram: TelegramConfig,

    /// Remote task-tracking API (host, version, upload timeout)
    pub task_api: TaskApiConfig,

    /// Rust log filter directive
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl AppConfig {
    /// Load configuration from environment variables.
    ///
    /// Loads `.env` if present, then reads variables such as
    /// `TASK_COURIER__TELEGRAM__BOT_TOKEN` and
    /// `TASK_COURIER__TASK_API__HOST`.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing or
    /// values cannot be parsed into the expected types.
    pub fn load() -> Result<Self, ConfigError> {
        // Load .env file if present (development)
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(
                config::Environment::default()
                    .prefix("TASK_COURIER")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()?;

        Ok(config)
    }

    /// Validate all configuration values.
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.telegram.validate()?;
        self.task_api.validate()?;
        Ok(())
    }
}

fn default_log_level() -> String {
    "info,task_courier=debug".to_string()
}
