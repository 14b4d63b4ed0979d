//! Domain layer for the retrieval-augmented chatbot
//!
//! This module contains the core models, errors and port traits. It has no
//! knowledge of HTTP, SQLite or PDF parsing.

pub mod errors;
pub mod models;
pub mod ports;

pub use errors::{ChatApiError, DomainError, DomainResult};
