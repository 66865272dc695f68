//! Telegram Bot API delivery channel.
//!
//! Sends summaries via `POST /bot<token>/sendMessage`. Handles 429 rate
//! limits by respecting the `parameters.retry_after` field returned in the
//! JSON response body, with a bounded number of waits.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde_json::json;
use tracing::{debug, warn};

use crate::error::{NotifyError, NotifyResult};
use crate::Notifier;

/// Production Telegram API base.
pub const DEFAULT_TELEGRAM_API: &str = "https://api.telegram.org";

/// Maximum number of retries for rate-limited requests.
const MAX_RATE_LIMIT_RETRIES: u32 = 3;

/// Upper bound on one `sendMessage` call.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Telegram `sendMessage` text limit (characters).
const TELEGRAM_MESSAGE_LIMIT: usize = 4096;

/// Telegram channel configuration.
#[derive(Debug, Clone)]
pub struct TelegramConfig {
    /// Telegram Bot API token.
    pub bot_token: String,
    /// Target chat ID (user, group, or channel).
    pub chat_id: String,
    /// API base URL.
    pub api_base: String,
}

impl TelegramConfig {
    /// Create config from environment variables. Token and chat ID are
    /// required.
    pub fn from_env() -> NotifyResult<Self> {
        Ok(Self {
            bot_token: std::env::var("TELEGRAM_BOT_TOKEN")
                .map_err(|_| NotifyError::config_error("TELEGRAM_BOT_TOKEN not set"))?,
            chat_id: std::env::var("TELEGRAM_CHAT_ID")
                .map_err(|_| NotifyError::config_error("TELEGRAM_CHAT_ID not set"))?,
            api_base: std::env::var("TELEGRAM_API_URL")
                .unwrap_or_else(|_| DEFAULT_TELEGRAM_API.to_string()),
        })
    }
}

/// Telegram delivery channel.
pub struct TelegramNotifier {
    config: TelegramConfig,
    client: Client,
}

impl TelegramNotifier {
    pub fn new(config: TelegramConfig) -> NotifyResult<Self> {
        let client = Client::builder().timeout(REQUEST_TIMEOUT).build()?;

        Ok(Self { config, client })
    }

    /// Create from environment variables.
    pub fn from_env() -> NotifyResult<Self> {
        Self::new(TelegramConfig::from_env()?)
    }

    fn send_message_url(&self) -> String {
        format!("{}/bot{}/sendMessage", self.config.api_base, self.config.bot_token)
    }

    /// Send request with rate limit handling.
    async fn send_with_retry(&self, payload: &serde_json::Value) -> NotifyResult<()> {
        let url = self.send_message_url();
        let mut attempts = 0;

        loop {
            attempts += 1;

            let response = self.client.post(&url).json(payload).send().await?;
            let status = response.status();

            if status.is_success() {
                return Ok(());
            }

            if status.as_u16() == 429 {
                let body: serde_json::Value = response.json().await.unwrap_or_default();
                let retry_after = body
                    .get("parameters")
                    .and_then(|p| p.get("retry_after"))
                    .and_then(|v| v.as_u64())
                    .map(Duration::from_secs);

                if attempts >= MAX_RATE_LIMIT_RETRIES {
                    warn!(
                        attempts,
                        ?retry_after,
                        "telegram rate limit retries exhausted"
                    );
                    return Err(NotifyError::RateLimited { attempts });
                }

                let wait = retry_after.unwrap_or(Duration::from_secs(1));
                debug!(?wait, attempts, "telegram rate limited, waiting");
                tokio::time::sleep(wait).await;
                continue;
            }

            let body = response.text().await.unwrap_or_default();
            warn!(%status, body = %body, "telegram sendMessage failed");
            return Err(NotifyError::Delivery { status, body });
        }
    }
}

#[async_trait]
impl Notifier for TelegramNotifier {
    fn name(&self) -> &'static str {
        "telegram"
    }

    async fn notify(&self, url: &str, summary: &str) -> NotifyResult<()> {
        let text = truncate_message(&format!("{url}\n\n{summary}"), TELEGRAM_MESSAGE_LIMIT);
        let payload = json!({
            "chat_id": self.config.chat_id,
            "text": text,
        });

        self.send_with_retry(&payload).await?;
        debug!(url = %url, "summary delivered");
        Ok(())
    }
}

/// Truncate a message to fit within the Telegram character limit.
fn truncate_message(text: &str, limit: usize) -> String {
    if text.chars().count() <= limit {
        return text.to_string();
    }
    let suffix = "\n\n[truncated]";
    let budget = limit - suffix.len();
    let truncated: String = text.chars().take(budget).collect();
    format!("{truncated}{suffix}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_partial_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn notifier_for(server: &MockServer) -> TelegramNotifier {
        TelegramNotifier::new(TelegramConfig {
            bot_token: "123:ABC".to_string(),
            chat_id: "42".to_string(),
            api_base: server.uri(),
        })
        .unwrap()
    }

    #[test]
    fn test_truncate_message() {
        assert_eq!(truncate_message("hello", 100), "hello");

        let long: String = "a".repeat(5000);
        let truncated = truncate_message(&long, TELEGRAM_MESSAGE_LIMIT);
        assert!(truncated.chars().count() <= TELEGRAM_MESSAGE_LIMIT);
        assert!(truncated.ends_with("[truncated]"));
    }

    #[tokio::test]
    async fn test_notify_posts_url_and_summary() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/bot123:ABC/sendMessage"))
            .and(body_partial_json(serde_json::json!({
                "chat_id": "42",
                "text": "https://youtu.be/dQw4w9WgXcQ\n\na fine summary",
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"ok": true})))
            .expect(1)
            .mount(&server)
            .await;

        notifier_for(&server)
            .notify("https://youtu.be/dQw4w9WgXcQ", "a fine summary")
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_notify_waits_out_a_rate_limit() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(429).set_body_json(serde_json::json!({
                "ok": false,
                "parameters": { "retry_after": 0 }
            })))
            .up_to_n_times(1)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"ok": true})))
            .expect(1)
            .mount(&server)
            .await;

        notifier_for(&server).notify("https://u", "s").await.unwrap();
    }

    #[tokio::test]
    async fn test_notify_gives_up_after_repeated_rate_limits() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(429).set_body_json(serde_json::json!({
                "ok": false,
                "parameters": { "retry_after": 0 }
            })))
            .mount(&server)
            .await;

        let err = notifier_for(&server).notify("https://u", "s").await.unwrap_err();
        assert!(matches!(err, NotifyError::RateLimited { .. }));
    }

    #[tokio::test]
    async fn test_api_rejection_is_delivery_failure() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(400).set_body_string("bad chat id"))
            .expect(1)
            .mount(&server)
            .await;

        let err = notifier_for(&server).notify("https://u", "s").await.unwrap_err();
        match err {
            NotifyError::Delivery { status, body } => {
                assert_eq!(status.as_u16(), 400);
                assert_eq!(body, "bad chat id");
            }
            other => panic!("expected Delivery error, got {other:?}"),
        }
    }
}
