//! Telegram transport configuration.

use secrecy::{ExposeSecret, Secret};
use serde::Deserialize;
use std::path::PathBuf;

use super::error::ValidationError;

/// Telegram Bot API configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct TelegramConfig {
    /// Bot token issued by BotFather.
    pub bot_token: Secret<String>,

    /// Base URL of the Bot API.
    #[serde(default = "default_api_url")]
    pub api_url: String,

    /// Long-poll timeout passed to getUpdates, in seconds.
    #[serde(default = "default_poll_timeout")]
    pub poll_timeout_secs: u64,

    /// Welcome image sent on /start, if configured.
    pub welcome_image: Option<PathBuf>,
}

impl TelegramConfig {
    /// Exposes the bot token for request URLs.
    pub fn token(&self) -> &str {
        self.bot_token.expose_secret()
    }

    /// Validate Telegram configuration.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.token().is_empty() {
            return Err(ValidationError::MissingRequired("telegram.bot_token"));
        }
        if !self.api_url.starts_with("http") {
            return Err(ValidationError::InvalidApiUrl);
        }
        if self.poll_timeout_secs == 0 || self.poll_timeout_secs > 120 {
            return Err(ValidationError::InvalidPollTimeout);
        }
        Ok(())
    }
}

fn default_api_url() -> String {
    "https://api.telegram.org".to_string()
}

fn default_poll_timeout() -> u64 {
    30
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(token: &str) -> TelegramConfig {
        TelegramConfig {
            bot_token: Secret::new(token.to_string()),
            api_url: default_api_url(),
            poll_timeout_secs: default_poll_timeout(),
            welcome_image: None,
        }
    }

    #[test]
    fn valid_config_passes() {
        assert!(config("123:abc").validate().is_ok());
    }

    #[test]
    fn empty_token_fails_validation() {
        assert!(config("").validate().is_err());
    }

    #[test]
    fn zero_poll_timeout_fails_validation() {
        let mut cfg = config("123:abc");
        cfg.poll_timeout_secs = 0;
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn token_is_not_in_debug_output() {
        let cfg = config("123:secret");
        let debug = format!("{cfg:?}");
        assert!(!debug.contains("secret"));
    }
}
