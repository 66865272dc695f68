//! Retry policy with exponential backoff.
//!
//! Failed jobs are not retried in place. The policy stamps the job with the
//! earliest time its next round may start, and drain passes skip it until
//! that time; the bookkeeping lives in the queue file and survives worker
//! restarts.

use std::time::Duration;

use chrono::{DateTime, Utc};

/// Backoff policy for failed jobs.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    /// Failed rounds a job gets before it is dead-lettered.
    pub max_attempts: u32,
    /// Delay after the first failure (doubles each failure).
    pub base_delay: Duration,
    /// Maximum delay between rounds.
    pub max_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 5,
            base_delay: Duration::from_secs(2),
            max_delay: Duration::from_secs(600),
        }
    }
}

impl RetryPolicy {
    pub fn new(max_attempts: u32, base_delay: Duration, max_delay: Duration) -> Self {
        Self {
            max_attempts,
            base_delay,
            max_delay,
        }
    }

    /// Set the maximum number of attempts.
    pub fn with_max_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = max_attempts;
        self
    }

    /// Set the base delay for exponential backoff.
    pub fn with_base_delay(mut self, base_delay: Duration) -> Self {
        self.base_delay = base_delay;
        self
    }

    /// Calculate the delay after a round that failed with `attempts`
    /// failures already on the books.
    pub fn delay_for_attempt(&self, attempts: u32) -> Duration {
        let delay = self.base_delay.saturating_mul(2u32.saturating_pow(attempts));
        delay.min(self.max_delay)
    }

    /// Earliest start of the next round for a job failing now.
    pub fn next_attempt_at(&self, now: DateTime<Utc>, attempts: u32) -> DateTime<Utc> {
        let delay = chrono::Duration::from_std(self.delay_for_attempt(attempts))
            .unwrap_or_else(|_| chrono::Duration::seconds(self.max_delay.as_secs() as i64));
        now + delay
    }

    /// Whether a job with this many failed rounds is out of attempts.
    pub fn is_exhausted(&self, attempts: u32) -> bool {
        attempts >= self.max_attempts
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_delay_doubles_per_attempt() {
        let policy = RetryPolicy::default().with_base_delay(Duration::from_secs(2));

        assert_eq!(policy.delay_for_attempt(0), Duration::from_secs(2));
        assert_eq!(policy.delay_for_attempt(1), Duration::from_secs(4));
        assert_eq!(policy.delay_for_attempt(2), Duration::from_secs(8));
        assert_eq!(policy.delay_for_attempt(3), Duration::from_secs(16));
    }

    #[test]
    fn test_delay_caps_at_max() {
        let policy = RetryPolicy::default();

        // 2 * 2^9 = 1024s, past the 600s cap.
        assert_eq!(policy.delay_for_attempt(9), Duration::from_secs(600));
        // Large attempt counts must not overflow.
        assert_eq!(policy.delay_for_attempt(40), Duration::from_secs(600));
    }

    #[test]
    fn test_next_attempt_at_gates_eligibility() {
        let policy = RetryPolicy::default();
        let now = Utc::now();

        let at = policy.next_attempt_at(now, 0);
        assert_eq!(at, now + chrono::Duration::seconds(2));
    }

    #[test]
    fn test_exhaustion_boundary() {
        let policy = RetryPolicy::default().with_max_attempts(5);

        assert!(!policy.is_exhausted(4));
        assert!(policy.is_exhausted(5));
        assert!(policy.is_exhausted(6));
    }
}
