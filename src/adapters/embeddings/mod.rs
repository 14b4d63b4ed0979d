//! Embedding provider adapters.

pub mod hashing;
pub mod openai;

use std::sync::Arc;

pub use hashing::{HashingEmbeddingProvider, HASHING_MODEL};
pub use openai::{OpenAiEmbeddingConfig, OpenAiEmbeddingProvider};

use crate::domain::errors::DomainResult;
use crate::domain::models::config::{Config, EmbeddingProviderKind};
use crate::domain::ports::EmbeddingProvider;

/// Build the embedding provider selected in the configuration.
pub fn provider_from_config(config: &Config) -> DomainResult<Arc<dyn EmbeddingProvider>> {
    match config.embedding.provider {
        EmbeddingProviderKind::OpenAi => {
            let provider = OpenAiEmbeddingProvider::new(OpenAiEmbeddingConfig::from_config(
                &config.openai,
                &config.embedding,
            ))?;
            Ok(Arc::new(provider))
        }
        EmbeddingProviderKind::Hashing => Ok(Arc::new(HashingEmbeddingProvider::new(
            config.embedding.dimension,
        ))),
    }
}
