//! Top-k retrieval over the persisted index
//!
//! A retriever is either active (index opened, embedder usable) or inactive
//! with a reason. Inactive retrievers answer every query with no context.

use std::path::Path;
use std::sync::Arc;

use thiserror::Error;
use tracing::{debug, info, warn};

use crate::adapters::embeddings::provider_from_config;
use crate::domain::errors::DomainError;
use crate::domain::models::{Config, SearchResult};
use crate::domain::ports::EmbeddingProvider;
use crate::infrastructure::vector::{VectorStore, VectorStoreError};

#[derive(Debug, Error)]
pub enum RetrievalError {
    #[error("Failed to embed query: {0}")]
    Embedding(#[from] DomainError),

    #[error("Failed to search index: {0}")]
    Store(#[from] VectorStoreError),
}

enum State {
    Active {
        store: VectorStore,
        embedder: Arc<dyn EmbeddingProvider>,
    },
    Inactive {
        reason: String,
    },
}

pub struct Retriever {
    state: State,
    top_k: usize,
}

impl Retriever {
    /// A retriever that never returns context
    pub fn inactive(reason: impl Into<String>) -> Self {
        Self {
            state: State::Inactive {
                reason: reason.into(),
            },
            top_k: 0,
        }
    }

    /// Open the index under `index_dir`, or fall back to an inactive retriever
    ///
    /// Never fails: a missing index, a missing credential or an index built
    /// with another embedding model all leave retrieval disabled.
    pub async fn open(
        index_dir: &Path,
        embedder: Arc<dyn EmbeddingProvider>,
        top_k: usize,
    ) -> Self {
        if !VectorStore::exists(index_dir) {
            info!(index = %index_dir.display(), "No vector index found, retrieval disabled");
            return Self::inactive(format!("index not found at {}", index_dir.display()));
        }

        let store = match VectorStore::open_read_only(index_dir).await {
            Ok(store) => store,
            Err(e) => {
                warn!(index = %index_dir.display(), error = %e, "Failed to open vector index");
                return Self::inactive(e.to_string());
            }
        };

        match store.meta().await {
            Ok(Some(meta))
                if meta.model == embedder.model() && meta.dimension == embedder.dimension() =>
            {
                info!(
                    index = %index_dir.display(),
                    model = %meta.model,
                    top_k,
                    "Retrieval enabled"
                );
                Self {
                    state: State::Active { store, embedder },
                    top_k,
                }
            }
            Ok(Some(meta)) => {
                let reason = format!(
                    "index built with {} ({} dims), configured {} ({} dims)",
                    meta.model,
                    meta.dimension,
                    embedder.model(),
                    embedder.dimension()
                );
                warn!(%reason, "Embedding model mismatch, retrieval disabled");
                Self::inactive(reason)
            }
            Ok(None) => {
                warn!(index = %index_dir.display(), "Index has no metadata, retrieval disabled");
                Self::inactive("index has no metadata")
            }
            Err(e) => {
                warn!(error = %e, "Failed to read index metadata, retrieval disabled");
                Self::inactive(e.to_string())
            }
        }
    }

    /// Open the retriever described by the configuration
    pub async fn from_config(config: &Config) -> Self {
        if config.embedding.provider.requires_credential() && config.openai.credential().is_none() {
            warn!("OPENAI_API_KEY not set, retrieval disabled");
            return Self::inactive("embedding credential not configured");
        }

        match provider_from_config(config) {
            Ok(embedder) => {
                Self::open(Path::new(&config.rag.index_path), embedder, config.rag.top_k).await
            }
            Err(e) => {
                warn!(error = %e, "Failed to build embedding provider, retrieval disabled");
                Self::inactive(e.to_string())
            }
        }
    }

    pub fn is_active(&self) -> bool {
        matches!(self.state, State::Active { .. })
    }

    /// Why retrieval is disabled, if it is
    pub fn inactive_reason(&self) -> Option<&str> {
        match &self.state {
            State::Active { .. } => None,
            State::Inactive { reason } => Some(reason),
        }
    }

    /// The `top_k` chunks nearest to `query`; empty when inactive
    pub async fn retrieve(&self, query: &str) -> Result<Vec<SearchResult>, RetrievalError> {
        let State::Active { store, embedder } = &self.state else {
            return Ok(Vec::new());
        };

        let vector = embedder.embed(query).await?;
        let results = store.search_similar(&vector, self.top_k).await?;
        debug!(results = results.len(), "Retrieved context");

        Ok(results)
    }
}
