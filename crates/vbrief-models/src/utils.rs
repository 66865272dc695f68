//! Video ID extraction from submitted URLs.
//!
//! Derivation is an ordered list of URL shapes; the first shape that yields
//! a valid 11-character token wins. There is deliberately no domain check:
//! the generic path-segment shape at the end accepts any URL that carries an
//! ID-shaped token, and URLs that never match fail the processing round
//! instead of being guessed at.

use crate::video::VideoId;
use thiserror::Error;

/// Length of a video ID token.
const ID_LEN: usize = 11;

/// Errors that can occur during video ID extraction.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum VideoIdError {
    /// No URL shape yielded a valid ID token.
    #[error("No video ID found in URL")]
    NotFound,
}

/// Result type for video ID extraction.
pub type VideoIdResult<T> = Result<T, VideoIdError>;

/// Extract a video ID from a URL.
///
/// Shapes are tried in order:
/// - `?v=` / `&v=` query parameter
/// - `youtu.be/<id>`
/// - `/embed/<id>`
/// - `/shorts/<id>`
/// - `/v/<id>`
/// - any path segment starting with an ID-shaped token
///
/// A shape matches when the marker is followed by at least 11 ID characters
/// (`[A-Za-z0-9_-]`); the first 11 are the token. A shape whose candidate is
/// too short is skipped, not fatal.
pub fn extract_video_id(url: &str) -> VideoIdResult<VideoId> {
    let url = url.trim();

    if let Some(id) = from_query_param(url) {
        return Ok(id);
    }
    if let Some(id) = after_marker(url, "youtu.be/") {
        return Ok(id);
    }
    if let Some(id) = after_marker(url, "/embed/") {
        return Ok(id);
    }
    if let Some(id) = after_marker(url, "/shorts/") {
        return Ok(id);
    }
    if let Some(id) = after_marker(url, "/v/") {
        return Ok(id);
    }
    if let Some(id) = from_any_path_segment(url) {
        return Ok(id);
    }

    Err(VideoIdError::NotFound)
}

fn is_id_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '-' || c == '_'
}

/// Take the ID token at the start of `rest`, if the leading run of ID
/// characters is long enough. Runs longer than 11 are truncated to 11.
fn token_at(rest: &str) -> Option<VideoId> {
    let run = rest.chars().take_while(|c| is_id_char(*c)).count();
    if run >= ID_LEN {
        // ID characters are ASCII, so byte slicing is safe here.
        Some(VideoId::from(&rest[..ID_LEN]))
    } else {
        None
    }
}

/// `watch?v=<id>` and `&v=<id>` forms.
fn from_query_param(url: &str) -> Option<VideoId> {
    for marker in ["?v=", "&v="] {
        if let Some(pos) = url.find(marker) {
            if let Some(id) = token_at(&url[pos + marker.len()..]) {
                return Some(id);
            }
        }
    }
    None
}

/// First occurrence of `marker` followed by an ID token.
fn after_marker(url: &str, marker: &str) -> Option<VideoId> {
    let pos = url.find(marker)?;
    token_at(&url[pos + marker.len()..])
}

/// Fallback shape: scan every `/` and accept the first ID-shaped token
/// directly after it. Catches bare `https://host/<id>` style URLs.
fn from_any_path_segment(url: &str) -> Option<VideoId> {
    url.match_indices('/')
        .find_map(|(pos, _)| token_at(&url[pos + 1..]))
}
