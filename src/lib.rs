//! ragchat - Retrieval-augmented chatbot backend
//!
//! Ingests PDF documents into a persisted vector index and answers prompts
//! over HTTP by retrieving the closest chunks and forwarding them, with the
//! prompt and a persona, to an OpenAI-compatible chat-completion API.
//!
//! # Architecture
//!
//! This crate follows Hexagonal Architecture principles:
//!
//! - **Domain Layer** (`domain`): Models, errors and port traits
//! - **Service Layer** (`services`): Ingestion, retrieval, generation and query use cases
//! - **Infrastructure Layer** (`infrastructure`): Config, logging, PDF, vector index, LLM client
//! - **Adapters** (`adapters`): Embedding providers and the HTTP surface
//! - **CLI Layer** (`cli`): Command-line interface
//!
//! # Example
//!
//! ```ignore
//! use ragchat::infrastructure::config::ConfigLoader;
//! use ragchat::services::AppContext;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = ConfigLoader::load()?;
//!     let ctx = AppContext::from_config(config).await?;
//!     ragchat::adapters::http::serve(ctx, ragchat::adapters::http::shutdown_signal()).await
//! }
//! ```

pub mod adapters;
pub mod cli;
pub mod domain;
pub mod infrastructure;
pub mod services;

// Re-export commonly used types for convenience
pub use domain::errors::{ChatApiError, DomainError, DomainResult};
pub use domain::models::{
    Chunk, ChunkingConfig, Config, Document, QueryRequest, QueryResponse, ResultData,
    SearchResult, StatusResponse,
};
pub use infrastructure::config::{ConfigError, ConfigLoader};
pub use services::{AppContext, IngestReport, IngestionService, QueryService, Retriever};
