//! Prompt construction.
//!
//! Transcripts are hard-truncated to a character budget before being
//! embedded, so an hours-long video cannot blow the model's context window.
//! The cut is by character count, not tokens, and may land mid-sentence.

/// Maximum transcript characters embedded in a prompt.
pub const TRANSCRIPT_CHAR_LIMIT: usize = 10_000;

/// First `TRANSCRIPT_CHAR_LIMIT` characters of the transcript.
pub fn truncate_transcript(transcript: &str) -> &str {
    match transcript.char_indices().nth(TRANSCRIPT_CHAR_LIMIT) {
        Some((byte_offset, _)) => &transcript[..byte_offset],
        None => transcript,
    }
}

/// Prompt asking for a plain summary of the transcript.
pub fn summary_prompt(transcript: &str) -> String {
    format!(
        "Summarize the following YouTube video transcript (leave out any advertisements that are made):\n\n{}",
        truncate_transcript(transcript)
    )
}

/// Prompt asking for an answer to `question` grounded in the transcript.
pub fn question_prompt(transcript: &str, question: &str) -> String {
    format!(
        "Given the following transcript, answer this question: '{}'\n\nTranscript:\n{}",
        question,
        truncate_transcript(transcript)
    )
}
