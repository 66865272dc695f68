//! Telegram message listener.
//!
//! Long-polls `getUpdates` and enqueues every URL found in incoming
//! messages. The queue file is the only hand-off to the worker; the bot
//! never looks at a URL beyond finding its scheme.

use std::time::Duration;

use reqwest::Client;
use serde::Deserialize;
use serde_json::json;
use tracing::{debug, error, info, warn};

use vbrief_queue::JobQueue;

use crate::config::BotConfig;
use crate::error::{BotError, BotResult};

/// One element of a `getUpdates` response.
#[derive(Debug, Deserialize)]
pub struct Update {
    pub update_id: i64,
    #[serde(default)]
    pub message: Option<Message>,
}

#[derive(Debug, Deserialize)]
pub struct Message {
    #[serde(default)]
    pub text: Option<String>,
    pub chat: Chat,
}

#[derive(Debug, Deserialize)]
pub struct Chat {
    pub id: i64,
}

#[derive(Debug, Deserialize)]
struct UpdatesResponse {
    ok: bool,
    #[serde(default)]
    result: Vec<Update>,
    #[serde(default)]
    description: Option<String>,
}

/// Extract `http(s)://…` runs from message text.
///
/// A URL starts at the first scheme occurrence inside a
/// whitespace-delimited token and runs to the token's end; a scheme with
/// nothing after it does not count.
pub fn scan_urls(text: &str) -> Vec<&str> {
    text.split_whitespace()
        .filter_map(|token| {
            let idx = match (token.find("http://"), token.find("https://")) {
                (Some(a), Some(b)) => Some(a.min(b)),
                (a, b) => a.or(b),
            }?;
            let url = &token[idx..];
            match url.split_once("://") {
                Some((_, rest)) if !rest.is_empty() => Some(url),
                _ => None,
            }
        })
        .collect()
}

/// Long-polling Telegram listener.
pub struct BotListener {
    config: BotConfig,
    client: Client,
    queue: JobQueue,
}

impl BotListener {
    /// Create a listener over `queue`.
    pub fn new(config: BotConfig, queue: JobQueue) -> BotResult<Self> {
        // The client timeout must outlast the long poll.
        let client = Client::builder()
            .timeout(config.poll_timeout + Duration::from_secs(10))
            .build()?;

        Ok(Self {
            config,
            client,
            queue,
        })
    }

    /// Poll for updates until the process is stopped.
    pub async fn run(&self) -> BotResult<()> {
        info!(
            poll_timeout_secs = self.config.poll_timeout.as_secs(),
            "telegram listener started"
        );

        let mut offset: i64 = 0;
        loop {
            let updates = match self.get_updates(offset).await {
                Ok(updates) => updates,
                Err(e) => {
                    warn!(error = %e, "getUpdates failed, backing off");
                    tokio::time::sleep(Duration::from_secs(5)).await;
                    continue;
                }
            };

            for update in updates {
                offset = offset.max(update.update_id + 1);
                self.handle_update(update).await;
            }
        }
    }

    /// Fetch the next batch of updates after `offset`.
    async fn get_updates(&self, offset: i64) -> BotResult<Vec<Update>> {
        let url = format!(
            "{}/bot{}/getUpdates",
            self.config.api_base, self.config.bot_token
        );
        let query = [
            ("timeout", self.config.poll_timeout.as_secs().to_string()),
            ("offset", offset.to_string()),
        ];

        let response = self.client.get(&url).query(&query).send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(BotError::Api { status, body });
        }

        let payload: UpdatesResponse = response
            .json()
            .await
            .map_err(|e| BotError::malformed(format!("undecodable getUpdates response: {e}")))?;
        if !payload.ok {
            return Err(BotError::Api {
                status,
                body: payload.description.unwrap_or_default(),
            });
        }

        Ok(payload.result)
    }

    /// Process one update: enqueue every URL in the text and answer in the
    /// originating chat.
    pub async fn handle_update(&self, update: Update) {
        let Some(message) = update.message else {
            return;
        };
        let Some(text) = message.text else {
            return;
        };
        let chat_id = message.chat.id;

        // Bot commands are for other bots.
        if text.starts_with('/') {
            return;
        }

        debug!(chat_id, text = %text, "message received");

        let urls = scan_urls(&text);
        if urls.is_empty() {
            self.reply(chat_id, "⚠️ No URL detected.").await;
            return;
        }

        for url in urls {
            info!(chat_id, url = %url, "url received");
            match self.queue.enqueue(url) {
                Ok(true) => self.reply(chat_id, "✅ Queued for summarization.").await,
                Ok(false) => self.reply(chat_id, "ℹ️ Already in queue.").await,
                Err(e) => error!(url = %url, error = %e, "enqueue failed"),
            }
        }
    }

    /// Best-effort `sendMessage` back into the chat.
    async fn reply(&self, chat_id: i64, text: &str) {
        let url = format!(
            "{}/bot{}/sendMessage",
            self.config.api_base, self.config.bot_token
        );
        let payload = json!({ "chat_id": chat_id, "text": text });

        match self.client.post(&url).json(&payload).send().await {
            Ok(response) if !response.status().is_success() => {
                warn!(chat_id, status = %response.status(), "reply rejected");
            }
            Ok(_) => {}
            Err(e) => warn!(chat_id, error = %e, "reply failed"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;
    use wiremock::matchers::{body_partial_json, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use vbrief_queue::QueueConfig;

    fn listener_in(dir: &TempDir, server_uri: &str) -> (BotListener, JobQueue) {
        let queue = JobQueue::new(QueueConfig {
            queue_path: dir.path().join("queue.json"),
            dead_letter_path: dir.path().join("dead_letter.json"),
        })
        .unwrap();

        let config = BotConfig {
            bot_token: "123:ABC".to_string(),
            api_base: server_uri.to_string(),
            poll_timeout: Duration::from_secs(1),
        };
        let listener = BotListener::new(config, queue.clone()).unwrap();
        (listener, queue)
    }

    fn text_update(id: i64, chat_id: i64, text: &str) -> Update {
        Update {
            update_id: id,
            message: Some(Message {
                text: Some(text.to_string()),
                chat: Chat { id: chat_id },
            }),
        }
    }

    #[test]
    fn test_scan_finds_urls_anywhere_in_the_text() {
        let urls = scan_urls(
            "check https://youtu.be/dQw4w9WgXcQ and also http://example.com/v please",
        );
        assert_eq!(
            urls,
            vec!["https://youtu.be/dQw4w9WgXcQ", "http://example.com/v"]
        );
    }

    #[test]
    fn test_scan_starts_at_the_scheme_inside_a_token() {
        assert_eq!(
            scan_urls("link:https://youtu.be/dQw4w9WgXcQ"),
            vec!["https://youtu.be/dQw4w9WgXcQ"]
        );
    }

    #[test]
    fn test_scan_ignores_bare_schemes_and_plain_text() {
        assert!(scan_urls("nothing to see here").is_empty());
        assert!(scan_urls("https://").is_empty());
        assert!(scan_urls("httpx://not-a-url").is_empty());
    }

    #[tokio::test]
    async fn test_message_with_url_is_queued_and_confirmed() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/bot123:ABC/sendMessage"))
            .and(body_partial_json(serde_json::json!({
                "chat_id": 42,
                "text": "✅ Queued for summarization."
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"ok": true})))
            .expect(1)
            .mount(&server)
            .await;

        let dir = TempDir::new().unwrap();
        let (listener, queue) = listener_in(&dir, &server.uri());

        listener
            .handle_update(text_update(1, 42, "https://youtu.be/dQw4w9WgXcQ"))
            .await;

        let jobs = queue.load().unwrap();
        assert_eq!(jobs.len(), 1);
        assert_eq!(jobs[0].url, "https://youtu.be/dQw4w9WgXcQ");
    }

    #[tokio::test]
    async fn test_duplicate_url_gets_already_queued_reply() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/bot123:ABC/sendMessage"))
            .and(body_partial_json(
                serde_json::json!({"text": "✅ Queued for summarization."}),
            ))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"ok": true})))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/bot123:ABC/sendMessage"))
            .and(body_partial_json(
                serde_json::json!({"text": "ℹ️ Already in queue."}),
            ))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"ok": true})))
            .expect(1)
            .mount(&server)
            .await;

        let dir = TempDir::new().unwrap();
        let (listener, queue) = listener_in(&dir, &server.uri());

        listener
            .handle_update(text_update(1, 42, "https://youtu.be/dQw4w9WgXcQ"))
            .await;
        listener
            .handle_update(text_update(2, 42, "https://youtu.be/dQw4w9WgXcQ"))
            .await;

        assert_eq!(queue.len().unwrap(), 1);
    }

    #[tokio::test]
    async fn test_message_without_url_gets_no_url_reply() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/bot123:ABC/sendMessage"))
            .and(body_partial_json(
                serde_json::json!({"text": "⚠️ No URL detected."}),
            ))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"ok": true})))
            .expect(1)
            .mount(&server)
            .await;

        let dir = TempDir::new().unwrap();
        let (listener, queue) = listener_in(&dir, &server.uri());

        listener.handle_update(text_update(1, 42, "hello bot")).await;

        assert!(queue.is_empty().unwrap());
    }

    #[tokio::test]
    async fn test_commands_are_ignored() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/bot123:ABC/sendMessage"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"ok": true})))
            .expect(0)
            .mount(&server)
            .await;

        let dir = TempDir::new().unwrap();
        let (listener, queue) = listener_in(&dir, &server.uri());

        listener.handle_update(text_update(1, 42, "/start")).await;

        assert!(queue.is_empty().unwrap());
    }

    #[tokio::test]
    async fn test_get_updates_decodes_and_reports_api_errors() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/bot123:ABC/getUpdates"))
            .and(query_param("offset", "7"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "ok": true,
                "result": [
                    {"update_id": 7, "message": {"text": "hi", "chat": {"id": 1}}},
                    {"update_id": 8}
                ]
            })))
            .mount(&server)
            .await;

        let dir = TempDir::new().unwrap();
        let (listener, _) = listener_in(&dir, &server.uri());

        let updates = listener.get_updates(7).await.unwrap();
        assert_eq!(updates.len(), 2);
        assert_eq!(updates[0].update_id, 7);
        assert!(updates[1].message.is_none());

        // No mock matches offset 0, so the API answers 404.
        let err = listener.get_updates(0).await.unwrap_err();
        assert!(matches!(err, BotError::Api { .. }));
    }
}
