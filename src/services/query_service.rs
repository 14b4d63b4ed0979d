//! Query handling: retrieve, then generate

use std::sync::Arc;

use thiserror::Error;
use tracing::{info, instrument, warn};

use crate::domain::errors::ChatApiError;
use crate::domain::models::{QueryRequest, QueryResponse, ResultData, SearchResult};
use crate::services::generation_service::GenerationService;
use crate::services::retriever::{RetrievalError, Retriever};

#[derive(Debug, Error)]
pub enum QueryError {
    #[error("{0}")]
    InvalidRequest(String),

    #[error("Retrieval failed: {0}")]
    Retrieval(#[from] RetrievalError),

    #[error(transparent)]
    Generation(#[from] ChatApiError),
}

/// Answers prompts with the shared retriever and generation service
pub struct QueryService {
    retriever: Arc<Retriever>,
    generator: GenerationService,
}

impl QueryService {
    pub fn new(retriever: Arc<Retriever>, generator: GenerationService) -> Self {
        Self {
            retriever,
            generator,
        }
    }

    pub fn is_rag_active(&self) -> bool {
        self.retriever.is_active()
    }

    /// Configured chat model
    pub fn model(&self) -> &str {
        self.generator.model()
    }

    #[instrument(skip(self, request), fields(user_id = %request.user_id, prompt_chars = request.prompt_len()))]
    pub async fn process(&self, request: QueryRequest) -> Result<QueryResponse, QueryError> {
        let prompt = request.trimmed_prompt();
        if prompt.is_empty() {
            return Err(QueryError::InvalidRequest("prompt must not be empty".to_string()));
        }

        let context = self.retriever.retrieve(prompt).await.inspect_err(|e| {
            warn!(error = %e, "Retrieval failed");
        })?;

        let completion = self.generator.generate(prompt, &context).await.inspect_err(|e| {
            warn!(error = %e, "Generation failed");
        })?;

        info!(
            retrieved = context.len(),
            attempts = completion.attempts,
            "Answered query"
        );

        let result_data = ResultData {
            is_rag_active: self.retriever.is_active(),
            model: completion.model,
            user_id: request.user_id.clone(),
            retrieved_chunks: context.len(),
            sources: source_labels(&context),
        };

        Ok(QueryResponse::success(&request, completion.content, result_data))
    }
}

/// Distinct `source#pN` labels in retrieval order
fn source_labels(context: &[SearchResult]) -> Vec<String> {
    let mut labels: Vec<String> = Vec::new();
    for result in context {
        let label = result.label();
        if !labels.contains(&label) {
            labels.push(label);
        }
    }
    labels
}
