//! Summary report model and its on-disk timestamp format.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A finished summary for one video.
///
/// This struct is the exact payload of a report file; the video ID is the
/// file stem, not a field. Re-processing the same video overwrites the file
/// (last write wins).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Report {
    /// The URL the job was enqueued with.
    pub url: String,

    /// Summary or answer text produced by the language model.
    pub summary: String,

    /// Completion time, UTC, second precision.
    #[serde(with = "second_precision")]
    pub timestamp: DateTime<Utc>,
}

impl Report {
    /// Create a report stamped with the current time.
    pub fn new(url: impl Into<String>, summary: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            summary: summary.into(),
            timestamp: Utc::now(),
        }
    }
}

/// Serde helpers for `YYYY-MM-DDTHH:MM:SSZ` timestamps.
///
/// Report files written by earlier tooling carry zone-less stamps
/// (`2024-01-01T12:00:00`); those are read back as UTC.
pub mod second_precision {
    use chrono::{DateTime, NaiveDateTime, Utc};
    use serde::{Deserialize, Deserializer, Serializer};

    const FORMAT: &str = "%Y-%m-%dT%H:%M:%SZ";

    pub fn serialize<S>(ts: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&ts.format(FORMAT).to_string())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        if let Ok(ts) = DateTime::parse_from_rfc3339(&s) {
            return Ok(ts.with_timezone(&Utc));
        }
        NaiveDateTime::parse_from_str(&s, "%Y-%m-%dT%H:%M:%S")
            .map(|naive| naive.and_utc())
            .map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_timestamp_serializes_at_second_precision() {
        let mut report = Report::new("https://youtu.be/dQw4w9WgXcQ", "a summary");
        report.timestamp = Utc.with_ymd_and_hms(2024, 3, 7, 9, 15, 42).unwrap();

        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["timestamp"], "2024-03-07T09:15:42Z");
        assert_eq!(json["url"], "https://youtu.be/dQw4w9WgXcQ");
        assert_eq!(json["summary"], "a summary");
    }

    #[test]
    fn test_timestamp_round_trip() {
        let mut report = Report::new("https://youtu.be/dQw4w9WgXcQ", "a summary");
        // Sub-second part is dropped by the format.
        report.timestamp = Utc.with_ymd_and_hms(2024, 3, 7, 9, 15, 42).unwrap();

        let json = serde_json::to_string(&report).unwrap();
        let back: Report = serde_json::from_str(&json).unwrap();
        assert_eq!(back, report);
    }

    #[test]
    fn test_zone_less_legacy_timestamp_reads_as_utc() {
        let json = r#"{"url":"u","summary":"s","timestamp":"2024-01-01T12:00:00"}"#;
        let report: Report = serde_json::from_str(json).unwrap();
        assert_eq!(
            report.timestamp,
            Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).unwrap()
        );
    }

    #[test]
    fn test_garbage_timestamp_is_an_error() {
        let json = r#"{"url":"u","summary":"s","timestamp":"yesterday"}"#;
        assert!(serde_json::from_str::<Report>(json).is_err());
    }
}
