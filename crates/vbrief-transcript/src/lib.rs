//! Caption sources and transcript fetching.
//!
//! This crate provides:
//! - The [`CaptionSource`] trait, one implementation per way of getting
//!   captions
//! - [`SourceChain`], ordered fallback across sources and languages
//! - [`TimedTextSource`], manual and auto-generated (speech recognition)
//!   tracks from the YouTube timed-text endpoint

pub mod error;
pub mod source;
pub mod timedtext;

pub use error::{TranscriptError, TranscriptResult};
pub use source::{CaptionSource, SourceChain};
pub use timedtext::{TimedTextSource, DEFAULT_TIMEDTEXT_URL};
