//! Application context
//!
//! Everything a request handler needs, built once at startup and shared
//! read-only across requests.

use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::{info, warn};

use crate::domain::models::Config;
use crate::domain::ports::ChatClient;
use crate::infrastructure::llm::{OpenAiChatClient, OpenAiChatConfig};
use crate::infrastructure::logging::mask_key;
use crate::services::generation_service::GenerationService;
use crate::services::persona::load_persona;
use crate::services::query_service::QueryService;
use crate::services::retriever::Retriever;

#[derive(Clone)]
pub struct AppContext {
    pub config: Arc<Config>,
    pub query: Arc<QueryService>,
}

impl AppContext {
    /// Assemble the context from explicit parts
    pub fn new(config: Config, retriever: Retriever, client: Arc<dyn ChatClient>, persona: String) -> Self {
        let generator = GenerationService::new(client, persona);
        Self {
            config: Arc::new(config),
            query: Arc::new(QueryService::new(Arc::new(retriever), generator)),
        }
    }

    /// Load the persona, open the index and build the chat client
    ///
    /// Missing credentials degrade functionality but never abort startup.
    pub async fn from_config(config: Config) -> Result<Self> {
        let persona_path = config.rag.persona_path.clone();
        let persona = tokio::task::spawn_blocking(move || load_persona(Path::new(&persona_path)))
            .await
            .context("Persona loading task failed")?;

        let retriever = Retriever::from_config(&config).await;

        match config.openai.credential() {
            Some(key) => info!(api_key = %mask_key(key), model = %config.llm.model, "Chat client configured"),
            None => warn!("OPENAI_API_KEY not set, queries will be rejected"),
        }
        if config.auth.enabled && config.auth.secret().is_none() {
            warn!("Endpoint auth is enabled but LOCAL_API_KEY is not set, queries will be rejected");
        }

        let client = OpenAiChatClient::new(OpenAiChatConfig::from_config(&config.openai, &config.llm))?;

        Ok(Self::new(config, retriever, Arc::new(client), persona))
    }

    pub fn is_rag_active(&self) -> bool {
        self.query.is_rag_active()
    }
}
