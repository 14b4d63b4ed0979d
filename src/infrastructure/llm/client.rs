/// Chat-completion HTTP client implementation
use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client as ReqwestClient;
use std::time::Duration;
use tracing::{debug, info, instrument, warn};

use super::types::{ApiErrorBody, ChatCompletionRequest, ChatCompletionResponse};
use crate::domain::errors::ChatApiError;
use crate::domain::models::config::{LlmConfig, OpenAiConfig};
use crate::domain::ports::{ChatClient, ChatCompletion, ChatMessage};
use crate::infrastructure::logging::SecretScrubber;
use crate::infrastructure::retry::RetryPolicy;

/// Configuration for the chat-completion client
#[derive(Debug, Clone)]
pub struct OpenAiChatConfig {
    /// API key; `None` or blank disables the client without failing construction
    pub api_key: Option<String>,

    /// API root, e.g. `https://api.openai.com/v1`
    pub base_url: String,

    pub model: String,

    pub temperature: f32,

    pub max_tokens: Option<u32>,

    /// Per-attempt timeout
    pub timeout: Duration,

    /// Total attempts for transient failures
    pub max_attempts: u32,

    /// Delay before the first retry; doubles afterwards
    pub base_delay: Duration,
}

impl Default for OpenAiChatConfig {
    fn default() -> Self {
        Self::from_config(&OpenAiConfig::default(), &LlmConfig::default())
    }
}

impl OpenAiChatConfig {
    pub fn from_config(openai: &OpenAiConfig, llm: &LlmConfig) -> Self {
        Self {
            api_key: openai.credential().map(str::to_string),
            base_url: openai.base_url.clone(),
            model: llm.model.clone(),
            temperature: llm.temperature,
            max_tokens: llm.max_tokens,
            timeout: Duration::from_secs(llm.timeout_secs),
            max_attempts: llm.max_attempts,
            base_delay: Duration::from_millis(llm.base_delay_ms),
        }
    }
}

/// HTTP client for OpenAI-compatible chat-completion APIs
///
/// Features:
/// - Connection pooling and reuse (via reqwest::Client)
/// - Exponential backoff retry for timeouts and connection failures only
/// - HTTP error statuses reported immediately, upstream message scrubbed
/// - Missing credential detected before any network traffic
pub struct OpenAiChatClient {
    /// Reusable HTTP client with connection pooling
    http_client: ReqwestClient,

    /// API key for bearer authentication
    api_key: Option<String>,

    /// API root without trailing slash
    base_url: String,

    model: String,
    temperature: f32,
    max_tokens: Option<u32>,

    /// Retry policy for transient errors
    retry_policy: RetryPolicy,

    scrubber: SecretScrubber,
}

impl OpenAiChatClient {
    /// Create a client from its configuration
    ///
    /// # Returns
    /// * `Ok(OpenAiChatClient)` - Client created (possibly without a key)
    /// * `Err(anyhow::Error)` - Failed to build the HTTP client
    pub fn new(config: OpenAiChatConfig) -> Result<Self> {
        let http_client = ReqwestClient::builder()
            .timeout(config.timeout)
            .pool_max_idle_per_host(10)
            .tcp_nodelay(true)
            .build()
            .context("Failed to build HTTP client")?;

        let api_key = config
            .api_key
            .map(|key| key.trim().to_string())
            .filter(|key| !key.is_empty());

        Ok(Self {
            http_client,
            api_key,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            model: config.model,
            temperature: config.temperature,
            max_tokens: config.max_tokens,
            retry_policy: RetryPolicy::new(config.max_attempts, config.base_delay),
            scrubber: SecretScrubber::new(),
        })
    }

    /// Whether a credential is configured
    fn endpoint(&self) -> String {
        format!("{}/chat/completions", self.base_url)
    }

    /// Perform exactly one HTTP attempt
    async fn send_once(
        &self,
        api_key: &str,
        messages: &[ChatMessage],
    ) -> Result<ChatCompletionResponse, ChatApiError> {
        let request = ChatCompletionRequest {
            model: &self.model,
            messages,
            temperature: self.temperature,
            max_tokens: self.max_tokens,
        };

        let response = self
            .http_client
            .post(self.endpoint())
            .bearer_auth(api_key)
            .json(&request)
            .send()
            .await
            .map_err(classify_send_error)?;

        let status = response.status();
        if !status.is_success() {
            // The status is terminal even when the error body never arrives
            let body = response.text().await.unwrap_or_default();
            let message = self.scrubber.scrub_message(&ApiErrorBody::message_from(&body));
            warn!(status = status.as_u16(), %message, "Chat API returned error status");
            return Err(ChatApiError::Status {
                status: status.as_u16(),
                message,
            });
        }

        let body = response.text().await.map_err(classify_send_error)?;
        serde_json::from_str::<ChatCompletionResponse>(&body)
            .map_err(|e| ChatApiError::InvalidResponse(format!("Failed to parse body: {e}")))
    }
}

/// Map a reqwest failure onto the retry taxonomy
fn classify_send_error(err: reqwest::Error) -> ChatApiError {
    if err.is_timeout() {
        ChatApiError::Timeout
    } else if err.is_builder() {
        ChatApiError::InvalidRequest(err.to_string())
    } else if err.is_decode() {
        ChatApiError::InvalidResponse(err.to_string())
    } else {
        ChatApiError::Connection(err.to_string())
    }
}

#[async_trait]
impl ChatClient for OpenAiChatClient {
    fn model(&self) -> &str {
        &self.model
    }

    #[instrument(skip(self, messages), fields(model = %self.model, messages = messages.len()))]
    async fn complete(&self, messages: &[ChatMessage]) -> Result<ChatCompletion, ChatApiError> {
        let Some(api_key) = self.api_key.as_deref() else {
            warn!("Chat completion requested without an API key");
            return Err(ChatApiError::MissingApiKey);
        };

        let result = self
            .retry_policy
            .execute(|| self.send_once(api_key, messages), ChatApiError::is_transient)
            .await;

        match result {
            Ok((response, attempts)) => {
                let content = response
                    .first_content()
                    .ok_or_else(|| {
                        ChatApiError::InvalidResponse("response contained no answer text".to_string())
                    })?
                    .to_string();
                let model = response.model.unwrap_or_else(|| self.model.clone());
                info!(attempts, answer_chars = content.chars().count(), "Chat completion received");
                Ok(ChatCompletion {
                    content,
                    model,
                    attempts,
                })
            }
            Err((err, attempts)) if err.is_transient() => {
                debug!(attempts, "Giving up on chat completion");
                Err(ChatApiError::RetriesExhausted {
                    attempts,
                    last: Box::new(err),
                })
            }
            Err((err, _)) => Err(err),
        }
    }
}
