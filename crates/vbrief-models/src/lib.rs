//! Shared data models for the vbrief pipeline.
//!
//! This crate provides Serde-serializable types for:
//! - Queued jobs and dead-letter records
//! - Summary reports and their on-disk timestamp format
//! - Video identifiers and URL-shape extraction
//! - Transcripts as ordered caption segments

pub mod job;
pub mod report;
pub mod transcript;
pub mod utils;
pub mod video;

// Re-export common types
pub use job::{DeadLetter, Job};
pub use report::Report;
pub use transcript::{Transcript, TranscriptSegment};
pub use utils::{extract_video_id, VideoIdError, VideoIdResult};
pub use video::VideoId;
