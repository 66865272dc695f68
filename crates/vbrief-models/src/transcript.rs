//! Transcript models.

use serde::{Deserialize, Serialize};

/// One caption segment as returned by a caption source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TranscriptSegment {
    /// Caption text.
    pub text: String,

    /// Segment start, seconds from video start.
    pub start: f64,

    /// Segment duration in seconds.
    pub duration: f64,
}

/// An ordered transcript for one video.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transcript {
    /// Segments in playback order.
    pub segments: Vec<TranscriptSegment>,

    /// Language code the segments were fetched in.
    pub language: String,
}

impl Transcript {
    pub fn new(segments: Vec<TranscriptSegment>, language: impl Into<String>) -> Self {
        Self {
            segments,
            language: language.into(),
        }
    }

    /// Whether the transcript carries no usable text at all.
    pub fn is_empty(&self) -> bool {
        self.segments.iter().all(|s| s.text.trim().is_empty())
    }

    /// Segment texts joined with newlines, in order.
    pub fn full_text(&self) -> String {
        self.segments
            .iter()
            .map(|s| s.text.as_str())
            .collect::<Vec<_>>()
            .join("\n")
    }
}
