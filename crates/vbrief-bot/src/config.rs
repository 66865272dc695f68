//! Bot configuration.

use std::time::Duration;

use vbrief_notify::DEFAULT_TELEGRAM_API;

use crate::error::{BotError, BotResult};

/// Bot configuration.
#[derive(Debug, Clone)]
pub struct BotConfig {
    /// Telegram Bot API token.
    pub bot_token: String,
    /// API base URL.
    pub api_base: String,
    /// Long-poll timeout passed to `getUpdates`.
    pub poll_timeout: Duration,
}

impl BotConfig {
    /// Create config from environment variables. The token is required.
    pub fn from_env() -> BotResult<Self> {
        Ok(Self {
            bot_token: std::env::var("TELEGRAM_BOT_TOKEN")
                .map_err(|_| BotError::config_error("TELEGRAM_BOT_TOKEN not set"))?,
            api_base: std::env::var("TELEGRAM_API_URL")
                .unwrap_or_else(|_| DEFAULT_TELEGRAM_API.to_string()),
            poll_timeout: Duration::from_secs(
                std::env::var("BOT_POLL_TIMEOUT_SECS")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(30),
            ),
        })
    }
}
