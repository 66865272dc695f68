//! Worker error types.

use thiserror::Error;

pub type WorkerResult<T> = Result<T, WorkerError>;

/// Anything that can fail a processing round or the loop around it.
///
/// The loop never branches on the variant; it only renders the error for
/// logs and dead-letter records. The variants exist so stage errors keep
/// their own types on the way through.
#[derive(Debug, Error)]
pub enum WorkerError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Video ID derivation failed: {0}")]
    VideoId(#[from] vbrief_models::VideoIdError),

    #[error("Transcript acquisition failed: {0}")]
    Transcript(#[from] vbrief_transcript::TranscriptError),

    #[error("Summarization failed: {0}")]
    Summarize(#[from] vbrief_summarizer::SummarizeError),

    #[error("Report persistence failed: {0}")]
    Report(#[from] vbrief_reports::ReportError),

    #[error("Notification failed: {0}")]
    Notify(#[from] vbrief_notify::NotifyError),

    #[error("Queue error: {0}")]
    Queue(#[from] vbrief_queue::QueueError),
}

impl WorkerError {
    pub fn config_error(msg: impl Into<String>) -> Self {
        Self::ConfigError(msg.into())
    }

    /// Stage the error came from, for structured logs.
    pub fn stage(&self) -> &'static str {
        match self {
            Self::ConfigError(_) => "config",
            Self::VideoId(_) => "identify",
            Self::Transcript(_) => "transcript",
            Self::Summarize(_) => "summarize",
            Self::Report(_) => "persist",
            Self::Notify(_) => "notify",
            Self::Queue(_) => "queue",
        }
    }
}
