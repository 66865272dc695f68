//! Summary delivery channels.
//!
//! This crate provides:
//! - The [`Notifier`] trait for delivering finished summaries
//! - [`TelegramNotifier`], delivery via the Telegram Bot API

pub mod error;
pub mod telegram;

pub use error::{NotifyError, NotifyResult};
pub use telegram::{TelegramConfig, TelegramNotifier, DEFAULT_TELEGRAM_API};

use async_trait::async_trait;

/// A way of delivering a finished summary to its audience.
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Short name for logs.
    fn name(&self) -> &'static str;

    /// Deliver the summary for a video URL.
    async fn notify(&self, url: &str, summary: &str) -> NotifyResult<()>;
}
