//! Queue-draining summarization worker.
//!
//! This crate provides:
//! - The single-consumer loop that drains the job queue in passes
//! - The per-job round: derive the video id, fetch a transcript, summarize,
//!   persist the report, deliver the notification
//! - Retry backoff bookkeeping and dead-letter promotion

pub mod config;
pub mod error;
pub mod executor;
pub mod processor;
pub mod retry;

pub use config::WorkerConfig;
pub use error::{WorkerError, WorkerResult};
pub use executor::WorkerLoop;
pub use processor::JobProcessor;
pub use retry::RetryPolicy;
