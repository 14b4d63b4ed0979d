//! Chat-completion port
//!
//! Abstracts the hosted language model behind a single request/response call.
//! Retry and backoff are the implementation's concern; callers see either a
//! completion or a classified `ChatApiError`.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::domain::errors::ChatApiError;

/// Author of a chat message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    System,
    User,
    Assistant,
}

/// A single message in the request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::User,
            content: content.into(),
        }
    }
}

/// The generated answer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatCompletion {
    /// Answer text of the first choice
    pub content: String,

    /// Model that produced the answer, as reported by the API
    pub model: String,

    /// Number of attempts it took (1 when the first call succeeded)
    pub attempts: u32,
}

/// Trait for chat-completion backends
#[async_trait]
pub trait ChatClient: Send + Sync {
    /// Configured model name
    fn model(&self) -> &str;

    /// Send the messages and return the first choice
    async fn complete(&self, messages: &[ChatMessage]) -> Result<ChatCompletion, ChatApiError>;
}
