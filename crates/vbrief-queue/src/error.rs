//! Queue error types.

use thiserror::Error;

pub type QueueResult<T> = Result<T, QueueError>;

/// Errors surfaced by queue operations.
///
/// A corrupt or missing queue file is deliberately NOT an error: reads
/// recover to an empty queue and log instead, so a damaged file can never
/// wedge the worker. Only real IO and write-side serialization failures
/// reach callers.
#[derive(Debug, Error)]
pub enum QueueError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl From<tempfile::PersistError> for QueueError {
    fn from(e: tempfile::PersistError) -> Self {
        Self::Io(e.error)
    }
}
