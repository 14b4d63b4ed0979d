//! Infrastructure layer module
//!
//! This module contains the infrastructure adapters and external integrations:
//! - Configuration management (figment)
//! - Logging infrastructure (tracing)
//! - PDF text extraction
//! - Chunking and the SQLite vector index
//! - The chat-completion HTTP client
//! - Retry with exponential backoff

pub mod config;
pub mod llm;
pub mod logging;
pub mod pdf;
pub mod retry;
pub mod vector;
