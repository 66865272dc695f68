//! Transcript error types.

use thiserror::Error;

pub type TranscriptResult<T> = Result<T, TranscriptError>;

#[derive(Debug, Error)]
pub enum TranscriptError {
    /// No source produced a transcript in any configured language.
    #[error("No transcript available for video {video_id}")]
    NotFound { video_id: String },

    #[error("Caption request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Caption payload malformed: {0}")]
    Malformed(String),
}

impl TranscriptError {
    pub fn not_found(video_id: impl Into<String>) -> Self {
        Self::NotFound {
            video_id: video_id.into(),
        }
    }

    pub fn malformed(msg: impl Into<String>) -> Self {
        Self::Malformed(msg.into())
    }
}
