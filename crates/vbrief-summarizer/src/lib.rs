//! Chat-completions summarization client and prompt building.

pub mod client;
pub mod error;
pub mod prompt;

pub use client::{
    SummarizerConfig, SummaryClient, DEFAULT_COMPLETIONS_URL, DEFAULT_MAX_TOKENS, DEFAULT_MODEL,
};
pub use error::{SummarizeError, SummarizeResult};
pub use prompt::{question_prompt, summary_prompt, truncate_transcript, TRANSCRIPT_CHAR_LIMIT};
