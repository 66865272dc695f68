//! File-backed job queue.
//!
//! This crate provides:
//! - Durable FIFO queueing in a single JSON file
//! - Exact-URL deduplication under one advisory-lock scope
//! - Atomic temp-and-rename writes
//! - A dead-letter file for jobs that exhausted their attempts

pub mod error;
pub mod queue;

pub use error::{QueueError, QueueResult};
pub use queue::{JobQueue, QueueConfig};
