//! Bot error types.

use reqwest::StatusCode;
use thiserror::Error;

pub type BotResult<T> = Result<T, BotError>;

#[derive(Debug, Error)]
pub enum BotError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Telegram API rejected the request ({status}): {body}")]
    Api { status: StatusCode, body: String },

    #[error("Malformed Telegram response: {0}")]
    Malformed(String),

    #[error("Queue error: {0}")]
    Queue(#[from] vbrief_queue::QueueError),
}

impl BotError {
    pub fn config_error(msg: impl Into<String>) -> Self {
        Self::ConfigError(msg.into())
    }

    pub fn malformed(msg: impl Into<String>) -> Self {
        Self::Malformed(msg.into())
    }
}
