//! Chat-completions client.
//!
//! Talks to an OpenRouter-compatible `/chat/completions` endpoint. The
//! completion text of the first choice is the whole result; anything else
//! about the response is ignored.

use std::time::Duration;

use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{SummarizeError, SummarizeResult};

/// Production chat-completions endpoint.
pub const DEFAULT_COMPLETIONS_URL: &str = "https://openrouter.ai/api/v1/chat/completions";

/// Default model.
pub const DEFAULT_MODEL: &str = "openai/gpt-4o";

/// Default completion budget.
pub const DEFAULT_MAX_TOKENS: u32 = 500;

/// Upper bound on one completions call.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(120);

/// Summarizer configuration.
#[derive(Debug, Clone)]
pub struct SummarizerConfig {
    /// Completions endpoint URL.
    pub base_url: String,
    /// Bearer token.
    pub api_key: String,
    /// Model identifier.
    pub model: String,
    /// Completion token budget.
    pub max_tokens: u32,
}

impl SummarizerConfig {
    /// Create config from environment variables. The API key is the one
    /// setting with no usable default.
    pub fn from_env() -> SummarizeResult<Self> {
        let api_key = std::env::var("OPENROUTER_API_KEY")
            .map_err(|_| SummarizeError::config_error("OPENROUTER_API_KEY not set"))?;

        Ok(Self {
            base_url: std::env::var("OPENROUTER_URL")
                .unwrap_or_else(|_| DEFAULT_COMPLETIONS_URL.to_string()),
            api_key,
            model: std::env::var("SUMMARIZER_MODEL").unwrap_or_else(|_| DEFAULT_MODEL.to_string()),
            max_tokens: std::env::var("SUMMARIZER_MAX_TOKENS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(DEFAULT_MAX_TOKENS),
        })
    }
}

/// Chat-completions API request.
#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    max_tokens: u32,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

/// Chat-completions API response, reduced to the fields we read.
#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChatChoiceMessage {
    #[serde(default)]
    content: String,
}

/// Chat-completions summarization client.
pub struct SummaryClient {
    client: Client,
    config: SummarizerConfig,
}

impl SummaryClient {
    pub fn new(config: SummarizerConfig) -> SummarizeResult<Self> {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .connect_timeout(Duration::from_secs(10))
            .build()?;

        Ok(Self { client, config })
    }

    /// Create from environment variables.
    pub fn from_env() -> SummarizeResult<Self> {
        Self::new(SummarizerConfig::from_env()?)
    }

    /// Run one prompt through the model and return the completion text.
    pub async fn summarize(&self, prompt: &str) -> SummarizeResult<String> {
        let request = ChatRequest {
            model: &self.config.model,
            messages: vec![ChatMessage {
                role: "user",
                content: prompt,
            }],
            max_tokens: self.config.max_tokens,
        };

        debug!(model = %self.config.model, prompt_chars = prompt.chars().count(), "requesting completion");

        let response = self
            .client
            .post(&self.config.base_url)
            .bearer_auth(&self.config.api_key)
            .json(&request)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(SummarizeError::Api { status, body });
        }

        let chat: ChatResponse = response
            .json()
            .await
            .map_err(|e| SummarizeError::malformed(format!("undecodable response: {e}")))?;

        let content = chat
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content)
            .ok_or_else(|| SummarizeError::malformed("no choices in response"))?;

        let content = content.trim();
        if content.is_empty() {
            return Err(SummarizeError::EmptyCompletion);
        }

        Ok(content.to_string())
    }
}
