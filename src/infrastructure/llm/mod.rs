//! OpenAI-compatible chat-completion client
//!
//! Production HTTP client with:
//! - Bearer authentication, short-circuited when no key is configured
//! - Per-attempt timeout
//! - Exponential backoff retry for timeouts and connection failures
//! - Terminal handling of every HTTP error status (no retry on 429/5xx)

pub mod client;
pub mod types;

pub use client::{OpenAiChatClient, OpenAiChatConfig};
pub use types::{ApiErrorBody, ChatCompletionRequest, ChatCompletionResponse};
