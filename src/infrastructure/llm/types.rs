/// Request and response types for the chat-completion API
use serde::{Deserialize, Serialize};

use crate::domain::ports::ChatMessage;

/// Body of `POST /chat/completions`
#[derive(Debug, Clone, Serialize)]
pub struct ChatCompletionRequest<'a> {
    /// Model identifier (e.g., "gpt-4o-mini")
    pub model: &'a str,

    /// Conversation, system message first
    pub messages: &'a [ChatMessage],

    pub temperature: f32,

    /// Completion cap (optional)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
}

/// Successful response body
#[derive(Debug, Clone, Deserialize)]
pub struct ChatCompletionResponse {
    /// Model that served the request
    #[serde(default)]
    pub model: Option<String>,

    #[serde(default)]
    pub choices: Vec<Choice>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Choice {
    pub message: ResponseMessage,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ResponseMessage {
    /// Null when the model produced a tool call or refusal instead of text
    #[serde(default)]
    pub content: Option<String>,
}

impl ChatCompletionResponse {
    /// Text of the first choice, if it carries any
    pub fn first_content(&self) -> Option<&str> {
        self.choices
            .first()
            .and_then(|choice| choice.message.content.as_deref())
            .filter(|content| !content.trim().is_empty())
    }
}

/// Error envelope: `{"error": {"message": "..."}}`
#[derive(Debug, Clone, Deserialize)]
pub struct ApiErrorBody {
    pub error: ApiErrorDetail,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiErrorDetail {
    pub message: String,
}

impl ApiErrorBody {
    /// Best-effort human message from an error response body
    pub fn message_from(body: &str) -> String {
        serde_json::from_str::<Self>(body).map_or_else(
            |_| body.trim().to_string(),
            |parsed| parsed.error.message,
        )
    }
}
