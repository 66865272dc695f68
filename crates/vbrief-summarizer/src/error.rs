//! Summarizer error types.

use reqwest::StatusCode;
use thiserror::Error;

pub type SummarizeResult<T> = Result<T, SummarizeError>;

#[derive(Debug, Error)]
pub enum SummarizeError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Summarization request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Summarization API returned {status}: {body}")]
    Api { status: StatusCode, body: String },

    #[error("Malformed summarization response: {0}")]
    Malformed(String),

    #[error("Summarization returned an empty completion")]
    EmptyCompletion,
}

impl SummarizeError {
    pub fn config_error(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    pub fn malformed(msg: impl Into<String>) -> Self {
        Self::Malformed(msg.into())
    }
}
