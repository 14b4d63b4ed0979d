use serde::{Deserialize, Serialize};

/// Main configuration structure for ragchat
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Config {
    /// HTTP server configuration
    #[serde(default)]
    pub server: ServerConfig,

    /// Shared-secret authorization for the query endpoint
    #[serde(default)]
    pub auth: AuthConfig,

    /// OpenAI-compatible API credentials and endpoint
    #[serde(default)]
    pub openai: OpenAiConfig,

    /// Chat completion configuration
    #[serde(default)]
    pub llm: LlmConfig,

    /// Embedding configuration
    #[serde(default)]
    pub embedding: EmbeddingConfig,

    /// Retrieval and ingestion configuration
    #[serde(default)]
    pub rag: RagConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// HTTP server configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    /// Directory with the bundled frontend, mounted at `/` when present
    #[serde(default = "default_static_dir")]
    pub static_dir: Option<String>,

    #[serde(default = "default_true")]
    pub enable_cors: bool,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

const fn default_port() -> u16 {
    8040
}

#[allow(clippy::unnecessary_wraps)]
fn default_static_dir() -> Option<String> {
    Some("static".to_string())
}

const fn default_true() -> bool {
    true
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            static_dir: default_static_dir(),
            enable_cors: true,
        }
    }
}

/// Shared-secret authorization
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct AuthConfig {
    /// Require `X-API-Key` on the query endpoint
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// The expected secret (usually from `LOCAL_API_KEY`)
    #[serde(default)]
    pub api_key: Option<String>,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            api_key: None,
        }
    }
}

impl AuthConfig {
    /// The shared secret, if present and non-blank
    pub fn secret(&self) -> Option<&str> {
        self.api_key
            .as_deref()
            .map(str::trim)
            .filter(|key| !key.is_empty())
    }
}

/// OpenAI-compatible API settings shared by chat and embeddings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct OpenAiConfig {
    /// API credential (usually from `OPENAI_API_KEY`)
    #[serde(default)]
    pub api_key: Option<String>,

    #[serde(default = "default_base_url")]
    pub base_url: String,
}

fn default_base_url() -> String {
    "https://api.openai.com/v1".to_string()
}

impl Default for OpenAiConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: default_base_url(),
        }
    }
}

impl OpenAiConfig {
    /// The credential, if present and non-blank
    pub fn credential(&self) -> Option<&str> {
        self.api_key
            .as_deref()
            .map(str::trim)
            .filter(|key| !key.is_empty())
    }
}

/// Chat completion configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct LlmConfig {
    #[serde(default = "default_model")]
    pub model: String,

    #[serde(default = "default_temperature")]
    pub temperature: f32,

    #[serde(default)]
    pub max_tokens: Option<u32>,

    /// Per-attempt request timeout
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Total attempts for transient failures
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,

    /// Backoff base; retry n waits `base_delay_ms * 2^n`
    #[serde(default = "default_base_delay_ms")]
    pub base_delay_ms: u64,
}

fn default_model() -> String {
    "gpt-4o-mini".to_string()
}

const fn default_temperature() -> f32 {
    0.7
}

const fn default_timeout_secs() -> u64 {
    30
}

const fn default_max_attempts() -> u32 {
    3
}

const fn default_base_delay_ms() -> u64 {
    1000
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            model: default_model(),
            temperature: default_temperature(),
            max_tokens: None,
            timeout_secs: default_timeout_secs(),
            max_attempts: default_max_attempts(),
            base_delay_ms: default_base_delay_ms(),
        }
    }
}

/// Which embedding backend to use
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EmbeddingProviderKind {
    /// OpenAI-compatible `/embeddings` endpoint
    OpenAi,
    /// Offline feature-hashing embeddings (no credential needed)
    Hashing,
}

impl EmbeddingProviderKind {
    pub fn requires_credential(self) -> bool {
        matches!(self, Self::OpenAi)
    }
}

/// Embedding configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct EmbeddingConfig {
    #[serde(default = "default_embedding_provider")]
    pub provider: EmbeddingProviderKind,

    #[serde(default = "default_embedding_model")]
    pub model: String,

    #[serde(default = "default_dimension")]
    pub dimension: usize,

    /// Texts per embedding request
    #[serde(default = "default_batch_size")]
    pub batch_size: usize,
}

const fn default_embedding_provider() -> EmbeddingProviderKind {
    EmbeddingProviderKind::OpenAi
}

fn default_embedding_model() -> String {
    "text-embedding-3-small".to_string()
}

const fn default_dimension() -> usize {
    1536
}

const fn default_batch_size() -> usize {
    64
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            provider: default_embedding_provider(),
            model: default_embedding_model(),
            dimension: default_dimension(),
            batch_size: default_batch_size(),
        }
    }
}

/// Retrieval and ingestion configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct RagConfig {
    /// Persisted vector index directory
    #[serde(default = "default_index_path")]
    pub index_path: String,

    /// Directory of PDFs read by ingestion
    #[serde(default = "default_data_dir")]
    pub data_dir: String,

    /// PDF holding the persona instructions
    #[serde(default = "default_persona_path")]
    pub persona_path: String,

    /// Number of chunks retrieved per query
    #[serde(default = "default_top_k")]
    pub top_k: usize,

    #[serde(default = "default_chunk_size")]
    pub chunk_size: usize,

    #[serde(default = "default_chunk_overlap")]
    pub chunk_overlap: usize,
}

fn default_index_path() -> String {
    "chroma_db".to_string()
}

fn default_data_dir() -> String {
    "Steam".to_string()
}

fn default_persona_path() -> String {
    "persona.pdf".to_string()
}

const fn default_top_k() -> usize {
    3
}

const fn default_chunk_size() -> usize {
    1000
}

const fn default_chunk_overlap() -> usize {
    200
}

impl Default for RagConfig {
    fn default() -> Self {
        Self {
            index_path: default_index_path(),
            data_dir: default_data_dir(),
            persona_path: default_persona_path(),
            top_k: default_top_k(),
            chunk_size: default_chunk_size(),
            chunk_overlap: default_chunk_overlap(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct LoggingConfig {
    /// Log level: trace, debug, info, warn, error
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Log format: json or pretty
    #[serde(default = "default_log_format")]
    pub format: String,

    /// Directory for rolling log files (stdout only when unset)
    #[serde(default)]
    pub log_dir: Option<String>,

    /// Rotation: daily, hourly or never
    #[serde(default = "default_rotation")]
    pub rotation: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

fn default_rotation() -> String {
    "daily".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
            log_dir: None,
            rotation: default_rotation(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_deployment() {
        let config = Config::default();
        assert_eq!(config.server.port, 8040);
        assert_eq!(config.rag.index_path, "chroma_db");
        assert_eq!(config.rag.top_k, 3);
        assert_eq!(config.rag.chunk_size, 1000);
        assert_eq!(config.rag.chunk_overlap, 200);
        assert_eq!(config.llm.max_attempts, 3);
        assert_eq!(config.llm.timeout_secs, 30);
        assert_eq!(config.embedding.model, "text-embedding-3-small");
    }

    #[test]
    fn test_partial_yaml_keeps_defaults() {
        let yaml = r"
llm:
  model: gpt-4o
embedding:
  provider: hashing
";
        let config: Config = serde_yaml::from_str(yaml).expect("YAML should parse");
        assert_eq!(config.llm.model, "gpt-4o");
        assert_eq!(config.llm.max_attempts, 3);
        assert_eq!(config.embedding.provider, EmbeddingProviderKind::Hashing);
        assert_eq!(config.server.port, 8040);
    }

    #[test]
    fn test_blank_credential_is_absent() {
        let openai = OpenAiConfig {
            api_key: Some("   ".to_string()),
            ..Default::default()
        };
        assert!(openai.credential().is_none());

        let openai = OpenAiConfig {
            api_key: Some("sk-test".to_string()),
            ..Default::default()
        };
        assert_eq!(openai.credential(), Some("sk-test"));
    }
}
