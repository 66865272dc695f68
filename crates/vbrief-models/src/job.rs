//! Job definitions for queue processing.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A queued summarization job.
///
/// The URL is both the payload and the queue's deduplication key; it is
/// compared by exact string equality, never normalized. Retry bookkeeping
/// travels with the job so it survives worker restarts.
///
/// Queue files written by earlier tooling hold bare URL strings; those
/// deserialize as fresh jobs with zero attempts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "JobRepr")]
pub struct Job {
    /// The submitted video URL, verbatim.
    pub url: String,

    /// Optional question to answer instead of summarizing.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub query: Option<String>,

    /// Completed failed rounds.
    pub attempts: u32,

    /// Earliest time the next round may start. `None` means immediately
    /// eligible.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_attempt_at: Option<DateTime<Utc>>,
}

/// Accepts both the current object form and the legacy bare-string form.
#[derive(Deserialize)]
#[serde(untagged)]
enum JobRepr {
    Full {
        url: String,
        #[serde(default)]
        query: Option<String>,
        #[serde(default)]
        attempts: u32,
        #[serde(default)]
        next_attempt_at: Option<DateTime<Utc>>,
    },
    Url(String),
}

impl From<JobRepr> for Job {
    fn from(repr: JobRepr) -> Self {
        match repr {
            JobRepr::Full {
                url,
                query,
                attempts,
                next_attempt_at,
            } => Self {
                url,
                query,
                attempts,
                next_attempt_at,
            },
            JobRepr::Url(url) => Self::new(url),
        }
    }
}

impl Job {
    /// Create a fresh job for a URL.
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            query: None,
            attempts: 0,
            next_attempt_at: None,
        }
    }

    /// Attach a question; the report answers it instead of summarizing.
    pub fn with_query(mut self, query: impl Into<String>) -> Self {
        self.query = Some(query.into());
        self
    }

    /// Whether a round may start now.
    pub fn is_eligible(&self, now: DateTime<Utc>) -> bool {
        self.next_attempt_at.map_or(true, |at| at <= now)
    }

    /// Record a failed round and gate the next one.
    pub fn after_failure(mut self, next_attempt_at: DateTime<Utc>) -> Self {
        self.attempts += 1;
        self.next_attempt_at = Some(next_attempt_at);
        self
    }
}

impl fmt::Display for Job {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.url)
    }
}

/// A job parked after exhausting its attempts, with the error that killed
/// the final round.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeadLetter {
    pub job: Job,

    /// Rendered error from the last round.
    pub error: String,

    pub dead_lettered_at: DateTime<Utc>,
}

impl DeadLetter {
    pub fn new(job: Job, error: impl Into<String>) -> Self {
        Self {
            job,
            error: error.into(),
            dead_lettered_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_fresh_job_is_eligible() {
        let job = Job::new("https://youtu.be/dQw4w9WgXcQ");
        assert_eq!(job.attempts, 0);
        assert!(job.is_eligible(Utc::now()));
    }

    #[test]
    fn test_failure_gates_the_next_round() {
        let now = Utc::now();
        let job = Job::new("https://youtu.be/dQw4w9WgXcQ").after_failure(now + Duration::seconds(30));

        assert_eq!(job.attempts, 1);
        assert!(!job.is_eligible(now));
        assert!(job.is_eligible(now + Duration::seconds(31)));
    }

    #[test]
    fn test_legacy_bare_string_deserializes_as_fresh_job() {
        let jobs: Vec<Job> =
            serde_json::from_str(r#"["https://youtu.be/dQw4w9WgXcQ"]"#).unwrap();

        assert_eq!(jobs.len(), 1);
        assert_eq!(jobs[0].url, "https://youtu.be/dQw4w9WgXcQ");
        assert_eq!(jobs[0].attempts, 0);
        assert!(jobs[0].next_attempt_at.is_none());
    }

    #[test]
    fn test_object_form_round_trips() {
        let job = Job::new("https://youtu.be/dQw4w9WgXcQ")
            .with_query("what is the thesis?")
            .after_failure(Utc::now() + Duration::seconds(5));

        let json = serde_json::to_string(&job).unwrap();
        let back: Job = serde_json::from_str(&json).unwrap();
        assert_eq!(back, job);
    }

    #[test]
    fn test_minimal_object_fills_defaults() {
        let job: Job = serde_json::from_str(r#"{"url":"https://example.com/x"}"#).unwrap();
        assert_eq!(job.attempts, 0);
        assert!(job.query.is_none());
        assert!(job.next_attempt_at.is_none());
    }
}
