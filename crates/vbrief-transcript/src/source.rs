//! Caption source trait and fallback chain.

use async_trait::async_trait;
use tracing::{debug, warn};

use vbrief_models::{Transcript, VideoId};

use crate::error::{TranscriptError, TranscriptResult};

/// One way of obtaining captions for a video.
#[async_trait]
pub trait CaptionSource: Send + Sync {
    /// Short name for logs.
    fn name(&self) -> &'static str;

    /// Fetch captions in one language. `NotFound` means this source has no
    /// track for that language; other errors mean the source itself failed.
    async fn fetch(&self, video_id: &VideoId, lang: &str) -> TranscriptResult<Transcript>;
}

/// Ordered caption sources with language fallback.
///
/// Sources are tried in order, and within a source each configured language
/// in order; the first non-empty transcript wins. A failing source is
/// logged and skipped rather than aborting the chain, so a flaky primary
/// still falls through to the speech-to-text track.
pub struct SourceChain {
    sources: Vec<Box<dyn CaptionSource>>,
    languages: Vec<String>,
}

impl SourceChain {
    pub fn new(sources: Vec<Box<dyn CaptionSource>>, languages: Vec<String>) -> Self {
        Self { sources, languages }
    }

    /// Fetch a transcript, falling back across sources and languages.
    pub async fn fetch(&self, video_id: &VideoId) -> TranscriptResult<Transcript> {
        for source in &self.sources {
            for lang in &self.languages {
                match source.fetch(video_id, lang).await {
                    Ok(transcript) if !transcript.is_empty() => {
                        debug!(
                            source = source.name(),
                            lang = %lang,
                            segments = transcript.segments.len(),
                            "transcript fetched"
                        );
                        return Ok(transcript);
                    }
                    Ok(_) => {
                        debug!(source = source.name(), lang = %lang, "empty transcript, trying next");
                    }
                    Err(TranscriptError::NotFound { .. }) => {
                        debug!(source = source.name(), lang = %lang, "no track, trying next");
                    }
                    Err(e) => {
                        warn!(source = source.name(), lang = %lang, error = %e, "caption source failed, trying next");
                    }
                }
            }
        }

        Err(TranscriptError::not_found(video_id.as_str()))
    }
}
