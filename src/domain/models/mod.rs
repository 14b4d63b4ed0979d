pub mod chunking;
pub mod config;
pub mod document;
pub mod query;
pub mod search;

pub use chunking::{Chunk, ChunkingConfig};
pub use config::{
    AuthConfig, Config, EmbeddingConfig, EmbeddingProviderKind, LlmConfig, LoggingConfig,
    OpenAiConfig, RagConfig, ServerConfig,
};
pub use document::Document;
pub use query::{QueryRequest, QueryResponse, ResultData, StatusResponse};
pub use search::SearchResult;
