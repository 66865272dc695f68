//! Telegram listener that queues video URLs.
//!
//! This crate provides:
//! - The `getUpdates` long-poll loop with offset tracking
//! - URL extraction from message text and per-URL enqueue replies

pub mod config;
pub mod error;
pub mod listener;

pub use config::BotConfig;
pub use error::{BotError, BotResult};
pub use listener::{scan_urls, BotListener};
