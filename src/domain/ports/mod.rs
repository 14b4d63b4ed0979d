//! Port trait definitions (Hexagonal Architecture)
//!
//! This module defines async trait interfaces that adapters must implement:
//! - EmbeddingProvider: text to vector conversion
//! - ChatClient: chat-completion calls against a hosted model
//!
//! These traits keep the services independent of the concrete HTTP clients.

pub mod chat_client;
pub mod embedding;

pub use chat_client::{ChatClient, ChatCompletion, ChatMessage, ChatRole};
pub use embedding::{EmbeddingInput, EmbeddingOutput, EmbeddingProvider};
