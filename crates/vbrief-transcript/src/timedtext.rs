//! YouTube timed-text caption source.
//!
//! Fetches caption tracks from the timed-text endpoint in `json3` format.
//! The same endpoint serves manually-authored tracks and auto-generated
//! (`kind=asr`) tracks; the ASR variant is the speech-to-text fallback in
//! the default chain. A missing track comes back as an empty body, not an
//! HTTP error.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

use vbrief_models::{Transcript, TranscriptSegment, VideoId};

use crate::error::{TranscriptError, TranscriptResult};
use crate::source::CaptionSource;

/// Production timed-text endpoint.
pub const DEFAULT_TIMEDTEXT_URL: &str = "https://www.youtube.com/api/timedtext";

/// Caption source backed by the timed-text endpoint.
pub struct TimedTextSource {
    client: Client,
    base_url: String,
    asr: bool,
}

impl TimedTextSource {
    /// Source for manually-authored caption tracks.
    pub fn manual(client: Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
            asr: false,
        }
    }

    /// Source for auto-generated (speech recognition) tracks.
    pub fn auto_generated(client: Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
            asr: true,
        }
    }
}

#[async_trait]
impl CaptionSource for TimedTextSource {
    fn name(&self) -> &'static str {
        if self.asr {
            "timedtext-asr"
        } else {
            "timedtext"
        }
    }

    async fn fetch(&self, video_id: &VideoId, lang: &str) -> TranscriptResult<Transcript> {
        let mut query = vec![
            ("v", video_id.as_str()),
            ("lang", lang),
            ("fmt", "json3"),
        ];
        if self.asr {
            query.push(("kind", "asr"));
        }

        let body = self
            .client
            .get(&self.base_url)
            .query(&query)
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;

        // No track for this video/language combination.
        if body.trim().is_empty() {
            return Err(TranscriptError::not_found(video_id.as_str()));
        }

        let payload: TimedTextPayload = serde_json::from_str(&body)
            .map_err(|e| TranscriptError::malformed(format!("bad json3 payload: {e}")))?;

        Ok(payload.into_transcript(lang))
    }
}

/// `json3` wire format, reduced to the fields we read.
#[derive(Debug, Deserialize)]
struct TimedTextPayload {
    #[serde(default)]
    events: Vec<TimedTextEvent>,
}

#[derive(Debug, Deserialize)]
struct TimedTextEvent {
    #[serde(rename = "tStartMs", default)]
    start_ms: u64,
    #[serde(rename = "dDurationMs", default)]
    duration_ms: u64,
    /// Absent on window-styling events, which carry no text.
    #[serde(default)]
    segs: Vec<TimedTextSeg>,
}

#[derive(Debug, Deserialize)]
struct TimedTextSeg {
    #[serde(default)]
    utf8: String,
}

impl TimedTextPayload {
    fn into_transcript(self, lang: &str) -> Transcript {
        let segments = self
            .events
            .into_iter()
            .filter_map(|event| {
                let text: String = event.segs.iter().map(|s| s.utf8.as_str()).collect();
                if text.trim().is_empty() {
                    return None;
                }
                Some(TranscriptSegment {
                    text,
                    start: event.start_ms as f64 / 1000.0,
                    duration: event.duration_ms as f64 / 1000.0,
                })
            })
            .collect();

        Transcript::new(segments, lang)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::SourceChain;
    use serde_json::json;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn sample_json3() -> serde_json::Value {
        json!({
            "wireMagic": "pb3",
            "events": [
                // Window event without segs, must be skipped
                { "tStartMs": 0, "dDurationMs": 0 },
                {
                    "tStartMs": 1200,
                    "dDurationMs": 2300,
                    "segs": [{ "utf8": "hello " }, { "utf8": "there" }]
                },
                { "tStartMs": 3500, "dDurationMs": 1000, "segs": [{ "utf8": "\n" }] },
                { "tStartMs": 4500, "dDurationMs": 900, "segs": [{ "utf8": "general kenobi" }] }
            ]
        })
    }

    #[test]
    fn test_json3_parsing_skips_textless_events() {
        let payload: TimedTextPayload = serde_json::from_value(sample_json3()).unwrap();
        let transcript = payload.into_transcript("en");

        assert_eq!(transcript.segments.len(), 2);
        assert_eq!(transcript.segments[0].text, "hello there");
        assert_eq!(transcript.segments[0].start, 1.2);
        assert_eq!(transcript.segments[0].duration, 2.3);
        assert_eq!(transcript.full_text(), "hello there\ngeneral kenobi");
        assert_eq!(transcript.language, "en");
    }

    #[tokio::test]
    async fn test_fetch_requests_the_expected_track() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/"))
            .and(query_param("v", "dQw4w9WgXcQ"))
            .and(query_param("lang", "en"))
            .and(query_param("fmt", "json3"))
            .respond_with(ResponseTemplate::new(200).set_body_json(sample_json3()))
            .mount(&server)
            .await;

        let source = TimedTextSource::manual(Client::new(), server.uri());
        let transcript = source
            .fetch(&VideoId::from("dQw4w9WgXcQ"), "en")
            .await
            .unwrap();

        assert_eq!(transcript.segments.len(), 2);
    }

    #[tokio::test]
    async fn test_asr_source_requests_the_asr_track() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/"))
            .and(query_param("kind", "asr"))
            .respond_with(ResponseTemplate::new(200).set_body_json(sample_json3()))
            .mount(&server)
            .await;

        let source = TimedTextSource::auto_generated(Client::new(), server.uri());
        assert!(source
            .fetch(&VideoId::from("dQw4w9WgXcQ"), "en")
            .await
            .is_ok());
    }

    #[tokio::test]
    async fn test_empty_body_means_no_track() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string(""))
            .mount(&server)
            .await;

        let source = TimedTextSource::manual(Client::new(), server.uri());
        let err = source
            .fetch(&VideoId::from("dQw4w9WgXcQ"), "en")
            .await
            .unwrap_err();

        assert!(matches!(err, TranscriptError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_garbage_body_is_malformed() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<transcript/>"))
            .mount(&server)
            .await;

        let source = TimedTextSource::manual(Client::new(), server.uri());
        let err = source
            .fetch(&VideoId::from("dQw4w9WgXcQ"), "en")
            .await
            .unwrap_err();

        assert!(matches!(err, TranscriptError::Malformed(_)));
    }

    #[tokio::test]
    async fn test_chain_falls_back_to_asr_track() {
        let server = MockServer::start().await;
        // Manual tracks missing in every language.
        Mock::given(method("GET"))
            .and(query_param("kind", "asr"))
            .and(query_param("lang", "es"))
            .respond_with(ResponseTemplate::new(200).set_body_json(sample_json3()))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string(""))
            .mount(&server)
            .await;

        let client = Client::new();
        let chain = SourceChain::new(
            vec![
                Box::new(TimedTextSource::manual(client.clone(), server.uri())),
                Box::new(TimedTextSource::auto_generated(client, server.uri())),
            ],
            vec!["en".to_string(), "es".to_string()],
        );

        let transcript = chain.fetch(&VideoId::from("dQw4w9WgXcQ")).await.unwrap();
        assert_eq!(transcript.language, "es");
    }

    #[tokio::test]
    async fn test_chain_exhaustion_is_not_found() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string(""))
            .mount(&server)
            .await;

        let client = Client::new();
        let chain = SourceChain::new(
            vec![
                Box::new(TimedTextSource::manual(client.clone(), server.uri())),
                Box::new(TimedTextSource::auto_generated(client, server.uri())),
            ],
            vec!["en".to_string(), "es".to_string()],
        );

        let err = chain.fetch(&VideoId::from("dQw4w9WgXcQ")).await.unwrap_err();
        assert!(matches!(err, TranscriptError::NotFound { .. }));
    }
}
