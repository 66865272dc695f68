//! Notifier error types.

use reqwest::StatusCode;
use thiserror::Error;

pub type NotifyResult<T> = Result<T, NotifyError>;

#[derive(Debug, Error)]
pub enum NotifyError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Notification request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Notification delivery failed with {status}: {body}")]
    Delivery { status: StatusCode, body: String },

    #[error("Notification rate limited after {attempts} attempts")]
    RateLimited { attempts: u32 },
}

impl NotifyError {
    pub fn config_error(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }
}
