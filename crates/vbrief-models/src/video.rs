//! Video identifier model.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier derived from a video URL, e.g. `dQw4w9WgXcQ`.
///
/// Always an 11-character token when produced by
/// [`extract_video_id`](crate::utils::extract_video_id). Doubles as the
/// report file stem, so it must never contain path separators; the
/// extraction character class guarantees that.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VideoId(pub String);

impl VideoId {
    /// Create from an existing string.
    pub fn from_string(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    /// Get the inner string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for VideoId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for VideoId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for VideoId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}
