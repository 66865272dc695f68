//! Worker configuration.

use std::time::Duration;

use vbrief_transcript::DEFAULT_TIMEDTEXT_URL;

use crate::retry::RetryPolicy;

/// Worker configuration.
///
/// Collaborator credentials (summarizer key, bot token) live with the
/// collaborators; this struct only carries the knobs of the loop itself.
#[derive(Debug, Clone)]
pub struct WorkerConfig {
    /// How long to sleep between passes when nothing is eligible
    pub poll_interval: Duration,
    /// Preferred caption language
    pub language: String,
    /// Caption language tried when the preferred one has no track
    pub fallback_language: String,
    /// Failed rounds a job gets before it is dead-lettered
    pub max_attempts: u32,
    /// Retry delay after the first failure
    pub backoff_base: Duration,
    /// Upper bound on the retry delay
    pub backoff_cap: Duration,
    /// Timed-text endpoint
    pub timedtext_url: String,
}

impl Default for WorkerConfig {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_secs(10),
            language: "en".to_string(),
            fallback_language: "es".to_string(),
            max_attempts: 5,
            backoff_base: Duration::from_secs(2),
            backoff_cap: Duration::from_secs(600), // 10 minutes
            timedtext_url: DEFAULT_TIMEDTEXT_URL.to_string(),
        }
    }
}

impl WorkerConfig {
    /// Create config from environment variables.
    pub fn from_env() -> Self {
        Self {
            poll_interval: Duration::from_secs(
                std::env::var("WORKER_POLL_SECS")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(10),
            ),
            language: std::env::var("TRANSCRIPT_LANG").unwrap_or_else(|_| "en".to_string()),
            fallback_language: std::env::var("TRANSCRIPT_FALLBACK_LANG")
                .unwrap_or_else(|_| "es".to_string()),
            max_attempts: std::env::var("WORKER_MAX_ATTEMPTS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(5),
            backoff_base: Duration::from_secs(
                std::env::var("WORKER_BACKOFF_BASE_SECS")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(2),
            ),
            backoff_cap: Duration::from_secs(
                std::env::var("WORKER_BACKOFF_CAP_SECS")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(600),
            ),
            timedtext_url: std::env::var("TIMEDTEXT_URL")
                .unwrap_or_else(|_| DEFAULT_TIMEDTEXT_URL.to_string()),
        }
    }

    /// Caption languages in fallback order.
    pub fn languages(&self) -> Vec<String> {
        let mut langs = vec![self.language.clone()];
        if self.fallback_language != self.language {
            langs.push(self.fallback_language.clone());
        }
        langs
    }

    /// Retry policy derived from the backoff settings.
    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy::new(self.max_attempts, self.backoff_base, self.backoff_cap)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = WorkerConfig::default();
        assert_eq!(config.poll_interval, Duration::from_secs(10));
        assert_eq!(config.max_attempts, 5);
        assert_eq!(config.languages(), vec!["en", "es"]);
    }

    #[test]
    fn test_languages_deduplicate() {
        let config = WorkerConfig {
            language: "en".to_string(),
            fallback_language: "en".to_string(),
            ..WorkerConfig::default()
        };
        assert_eq!(config.languages(), vec!["en"]);
    }
}
