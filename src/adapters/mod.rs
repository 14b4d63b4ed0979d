//! Adapters for external systems: embedding APIs and the HTTP surface.

pub mod embeddings;
pub mod http;
