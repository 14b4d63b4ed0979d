//! OpenAI embedding provider adapter.
//!
//! Calls the `/embeddings` endpoint of any OpenAI-compatible API (OpenAI,
//! Azure OpenAI, local servers). Inputs are sent in batches of at most
//! `max_batch_size` texts and results are re-ordered by their `index`.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::models::config::{EmbeddingConfig, OpenAiConfig};
use crate::domain::ports::embedding::{EmbeddingInput, EmbeddingOutput, EmbeddingProvider};
use crate::infrastructure::logging::SecretScrubber;

/// Configuration for the OpenAI embedding provider.
#[derive(Debug, Clone)]
pub struct OpenAiEmbeddingConfig {
    /// API key; required before any request is made.
    pub api_key: Option<String>,
    /// Base URL for the API. Default: `https://api.openai.com/v1`.
    pub base_url: String,
    /// Embedding model. Default: `text-embedding-3-small`.
    pub model: String,
    /// Expected embedding dimension. Default: 1536.
    pub dimension: usize,
    /// Request timeout in seconds. Default: 30.
    pub timeout_secs: u64,
    /// Maximum texts per single API request. Default: 64.
    pub max_batch_size: usize,
}

impl Default for OpenAiEmbeddingConfig {
    fn default() -> Self {
        Self::from_config(&OpenAiConfig::default(), &EmbeddingConfig::default())
    }
}

impl OpenAiEmbeddingConfig {
    pub fn from_config(openai: &OpenAiConfig, embedding: &EmbeddingConfig) -> Self {
        Self {
            api_key: openai.credential().map(str::to_string),
            base_url: openai.base_url.trim_end_matches('/').to_string(),
            model: embedding.model.clone(),
            dimension: embedding.dimension,
            timeout_secs: 30,
            max_batch_size: embedding.batch_size.max(1),
        }
    }

    fn api_key(&self) -> DomainResult<&str> {
        self.api_key
            .as_deref()
            .map(str::trim)
            .filter(|key| !key.is_empty())
            .ok_or_else(|| {
                DomainError::MissingCredential(
                    "OpenAI API key not set. Set OPENAI_API_KEY or configure openai.api_key."
                        .to_string(),
                )
            })
    }
}

/// OpenAI embedding provider.
pub struct OpenAiEmbeddingProvider {
    config: OpenAiEmbeddingConfig,
    client: reqwest::Client,
    scrubber: SecretScrubber,
}

impl OpenAiEmbeddingProvider {
    pub fn new(config: OpenAiEmbeddingConfig) -> DomainResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| DomainError::ExecutionFailed(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self {
            config,
            client,
            scrubber: SecretScrubber::new(),
        })
    }

    async fn call_embeddings_api(&self, texts: Vec<String>) -> DomainResult<Vec<Vec<f32>>> {
        let api_key = self.config.api_key()?;
        let url = format!("{}/embeddings", self.config.base_url);
        let expected = texts.len();

        let request_body = EmbeddingsRequest {
            model: &self.config.model,
            input: texts,
        };

        let response = self
            .client
            .post(&url)
            .bearer_auth(api_key)
            .json(&request_body)
            .send()
            .await
            .map_err(|e| DomainError::ExecutionFailed(format!("Embedding API request failed: {e}")))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "unable to read response body".to_string());
            return Err(DomainError::ExecutionFailed(format!(
                "Embedding API returned {}: {}",
                status,
                self.scrubber.scrub_message(body.trim())
            )));
        }

        let result: EmbeddingsResponse = response.json().await.map_err(|e| {
            DomainError::SerializationError(format!("Failed to parse embedding response: {e}"))
        })?;

        if result.data.len() != expected {
            return Err(DomainError::ExecutionFailed(format!(
                "Embedding API returned {} vectors for {} inputs",
                result.data.len(),
                expected
            )));
        }

        // Sort by index to maintain input order
        let mut data = result.data;
        data.sort_by_key(|d| d.index);

        data.into_iter()
            .map(|d| {
                if d.embedding.len() == self.config.dimension {
                    Ok(d.embedding)
                } else {
                    Err(DomainError::DimensionMismatch {
                        expected: self.config.dimension,
                        actual: d.embedding.len(),
                    })
                }
            })
            .collect()
    }
}

#[async_trait]
impl EmbeddingProvider for OpenAiEmbeddingProvider {
    fn name(&self) -> &'static str {
        "openai"
    }

    fn model(&self) -> &str {
        &self.config.model
    }

    fn dimension(&self) -> usize {
        self.config.dimension
    }

    async fn embed(&self, text: &str) -> DomainResult<Vec<f32>> {
        let results = self.call_embeddings_api(vec![text.to_string()]).await?;
        results
            .into_iter()
            .next()
            .ok_or_else(|| DomainError::ExecutionFailed("Empty embedding response".to_string()))
    }

    async fn embed_batch(&self, inputs: &[EmbeddingInput]) -> DomainResult<Vec<EmbeddingOutput>> {
        let mut all_outputs = Vec::with_capacity(inputs.len());

        for chunk_inputs in inputs.chunks(self.config.max_batch_size) {
            let texts: Vec<String> = chunk_inputs.iter().map(|i| i.text.clone()).collect();
            debug!(batch = texts.len(), model = %self.config.model, "Requesting embeddings");

            let vectors = self.call_embeddings_api(texts).await?;

            for (input, vector) in chunk_inputs.iter().zip(vectors) {
                all_outputs.push(EmbeddingOutput {
                    id: input.id.clone(),
                    vector,
                });
            }
        }

        Ok(all_outputs)
    }

    fn max_batch_size(&self) -> usize {
        self.config.max_batch_size
    }
}

// -- OpenAI API request/response types --

#[derive(Debug, Serialize)]
struct EmbeddingsRequest<'a> {
    model: &'a str,
    input: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct EmbeddingsResponse {
    data: Vec<EmbeddingData>,
}

#[derive(Debug, Deserialize)]
struct EmbeddingData {
    embedding: Vec<f32>,
    index: usize,
}
