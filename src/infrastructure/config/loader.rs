use anyhow::{Context, Result};
use figment::providers::{Env, Format, Serialized, Yaml};
use figment::Figment;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::domain::models::config::Config;

/// Default project config file, looked up in the working directory
pub const DEFAULT_CONFIG_FILE: &str = "ragchat.yaml";

/// Optional local overrides next to the project config
pub const LOCAL_CONFIG_FILE: &str = "ragchat.local.yaml";

/// Configuration error types
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid port: {0}. Must be between 1 and 65535")]
    InvalidPort(u16),

    #[error("Invalid log level: {0}. Must be one of: trace, debug, info, warn, error")]
    InvalidLogLevel(String),

    #[error("Invalid log format: {0}. Must be one of: json, pretty")]
    InvalidLogFormat(String),

    #[error("Invalid log rotation: {0}. Must be one of: daily, hourly, never")]
    InvalidRotation(String),

    #[error("Invalid chunking: {0}")]
    InvalidChunking(String),

    #[error("Invalid top_k: {0}. Must be at least 1")]
    InvalidTopK(usize),

    #[error("Invalid max_attempts: {0}. Must be at least 1")]
    InvalidMaxAttempts(u32),

    #[error("Invalid timeout_secs: {0}. Must be at least 1")]
    InvalidTimeout(u64),

    #[error("Invalid embedding {field}: {value}. Must be at least 1")]
    InvalidEmbedding { field: &'static str, value: usize },

    #[error("Index path cannot be empty")]
    EmptyIndexPath,
}

/// Configuration loader with hierarchical merging
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration from the working directory
    ///
    /// Precedence (lowest to highest):
    /// 1. Programmatic defaults (Serialized)
    /// 2. ragchat.yaml (project config)
    /// 3. ragchat.local.yaml (local overrides, optional)
    /// 4. Environment variables (RAGCHAT_* prefix, `__` for nesting)
    /// 5. Deployment variables: OPENAI_API_KEY, LOCAL_API_KEY, PORT
    pub fn load() -> Result<Config> {
        Self::load_from(None)
    }

    /// Load configuration, reading `path` instead of the default project file
    ///
    /// Relative paths inside the configuration are resolved against the
    /// directory holding `path`.
    pub fn load_from(path: Option<&Path>) -> Result<Config> {
        let mut config: Config = Self::figment(path)
            .extract()
            .context("Failed to extract configuration from figment")?;

        Self::validate(&config)?;

        if let Some(base) = path.and_then(Path::parent) {
            Self::resolve_paths(&mut config, base);
        }

        Ok(config)
    }

    /// Build the provider stack without extracting it
    pub fn figment(path: Option<&Path>) -> Figment {
        let (primary, local) = match path {
            Some(path) => (
                path.to_path_buf(),
                path.with_file_name(LOCAL_CONFIG_FILE),
            ),
            None => (
                PathBuf::from(DEFAULT_CONFIG_FILE),
                PathBuf::from(LOCAL_CONFIG_FILE),
            ),
        };

        Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Yaml::file(primary))
            .merge(Yaml::file(local))
            .merge(Env::prefixed("RAGCHAT_").split("__"))
            .merge(
                Env::raw()
                    .only(&["OPENAI_API_KEY"])
                    .map(|_| "openai.api_key".into()),
            )
            .merge(
                Env::raw()
                    .only(&["LOCAL_API_KEY"])
                    .map(|_| "auth.api_key".into()),
            )
            .merge(Env::raw().only(&["PORT"]).map(|_| "server.port".into()))
    }

    /// Validate configuration after loading
    pub fn validate(config: &Config) -> Result<(), ConfigError> {
        if config.server.port == 0 {
            return Err(ConfigError::InvalidPort(config.server.port));
        }

        let valid_log_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_log_levels.contains(&config.logging.level.to_lowercase().as_str()) {
            return Err(ConfigError::InvalidLogLevel(config.logging.level.clone()));
        }

        let valid_log_formats = ["json", "pretty"];
        if !valid_log_formats.contains(&config.logging.format.to_lowercase().as_str()) {
            return Err(ConfigError::InvalidLogFormat(config.logging.format.clone()));
        }

        let valid_rotations = ["daily", "hourly", "never"];
        if !valid_rotations.contains(&config.logging.rotation.to_lowercase().as_str()) {
            return Err(ConfigError::InvalidRotation(config.logging.rotation.clone()));
        }

        if config.rag.chunk_size == 0 {
            return Err(ConfigError::InvalidChunking(
                "chunk_size must be greater than 0".to_string(),
            ));
        }

        if config.rag.chunk_overlap >= config.rag.chunk_size {
            return Err(ConfigError::InvalidChunking(format!(
                "chunk_overlap ({}) must be less than chunk_size ({})",
                config.rag.chunk_overlap, config.rag.chunk_size
            )));
        }

        if config.rag.top_k == 0 {
            return Err(ConfigError::InvalidTopK(config.rag.top_k));
        }

        if config.rag.index_path.trim().is_empty() {
            return Err(ConfigError::EmptyIndexPath);
        }

        if config.llm.max_attempts == 0 {
            return Err(ConfigError::InvalidMaxAttempts(config.llm.max_attempts));
        }

        if config.llm.timeout_secs == 0 {
            return Err(ConfigError::InvalidTimeout(config.llm.timeout_secs));
        }

        if config.embedding.dimension == 0 {
            return Err(ConfigError::InvalidEmbedding {
                field: "dimension",
                value: config.embedding.dimension,
            });
        }

        if config.embedding.batch_size == 0 {
            return Err(ConfigError::InvalidEmbedding {
                field: "batch_size",
                value: config.embedding.batch_size,
            });
        }

        Ok(())
    }

    /// Make every relative path in the configuration relative to `base`
    pub fn resolve_paths(config: &mut Config, base: &Path) {
        let resolve = |value: &mut String| {
            let path = Path::new(value.as_str());
            if path.is_relative() {
                *value = base.join(path).to_string_lossy().into_owned();
            }
        };

        resolve(&mut config.rag.index_path);
        resolve(&mut config.rag.data_dir);
        resolve(&mut config.rag.persona_path);
        if let Some(dir) = config.server.static_dir.as_mut() {
            resolve(dir);
        }
        if let Some(dir) = config.logging.log_dir.as_mut() {
            resolve(dir);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::config::EmbeddingProviderKind;
    use std::io::Write;

    fn write_config(dir: &Path, contents: &str) -> PathBuf {
        let path = dir.join("ragchat.yaml");
        let mut file = std::fs::File::create(&path).unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        path
    }

    #[test]
    fn test_default_config_is_valid() {
        let config = Config::default();
        ConfigLoader::validate(&config).expect("Default config should be valid");
    }

    #[test]
    fn test_validate_zero_port() {
        let mut config = Config::default();
        config.server.port = 0;

        assert!(matches!(
            ConfigLoader::validate(&config),
            Err(ConfigError::InvalidPort(0))
        ));
    }

    #[test]
    fn test_validate_invalid_log_level() {
        let mut config = Config::default();
        config.logging.level = "invalid".to_string();

        match ConfigLoader::validate(&config) {
            Err(ConfigError::InvalidLogLevel(level)) => assert_eq!(level, "invalid"),
            other => panic!("Expected InvalidLogLevel error, got {other:?}"),
        }
    }

    #[test]
    fn test_validate_invalid_log_format() {
        let mut config = Config::default();
        config.logging.format = "xml".to_string();

        assert!(matches!(
            ConfigLoader::validate(&config),
            Err(ConfigError::InvalidLogFormat(_))
        ));
    }

    #[test]
    fn test_validate_overlap_not_smaller_than_size() {
        let mut config = Config::default();
        config.rag.chunk_size = 200;
        config.rag.chunk_overlap = 200;

        assert!(matches!(
            ConfigLoader::validate(&config),
            Err(ConfigError::InvalidChunking(_))
        ));
    }

    #[test]
    fn test_validate_zero_top_k() {
        let mut config = Config::default();
        config.rag.top_k = 0;

        assert!(matches!(
            ConfigLoader::validate(&config),
            Err(ConfigError::InvalidTopK(0))
        ));
    }

    #[test]
    fn test_validate_zero_attempts() {
        let mut config = Config::default();
        config.llm.max_attempts = 0;

        assert!(matches!(
            ConfigLoader::validate(&config),
            Err(ConfigError::InvalidMaxAttempts(0))
        ));
    }

    #[test]
    fn test_validate_zero_batch_size() {
        let mut config = Config::default();
        config.embedding.batch_size = 0;

        assert!(matches!(
            ConfigLoader::validate(&config),
            Err(ConfigError::InvalidEmbedding {
                field: "batch_size",
                ..
            })
        ));
    }

    #[test]
    fn test_yaml_file_and_relative_paths() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_config(
            dir.path(),
            "llm:\n  model: gpt-4o\nrag:\n  top_k: 5\n  index_path: idx\nembedding:\n  provider: hashing\n",
        );

        let config = temp_env::with_vars_unset(
            ["OPENAI_API_KEY", "LOCAL_API_KEY", "PORT"],
            || ConfigLoader::load_from(Some(&path)).unwrap(),
        );

        assert_eq!(config.llm.model, "gpt-4o");
        assert_eq!(config.rag.top_k, 5);
        assert_eq!(config.embedding.provider, EmbeddingProviderKind::Hashing);
        assert_eq!(
            PathBuf::from(&config.rag.index_path),
            dir.path().join("idx")
        );
        assert_eq!(
            PathBuf::from(&config.rag.persona_path),
            dir.path().join("persona.pdf")
        );
    }

    #[test]
    fn test_local_file_overrides_project_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_config(dir.path(), "llm:\n  model: gpt-4o\n  temperature: 0.2\n");
        std::fs::write(dir.path().join(LOCAL_CONFIG_FILE), "llm:\n  model: gpt-4.1\n").unwrap();

        let config = ConfigLoader::load_from(Some(&path)).unwrap();

        assert_eq!(config.llm.model, "gpt-4.1", "Override should win");
        assert!((config.llm.temperature - 0.2).abs() < f32::EPSILON);
    }

    #[test]
    fn test_env_overrides() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_config(dir.path(), "server:\n  port: 9000\n");

        let config = temp_env::with_vars(
            [
                ("RAGCHAT_LLM__MODEL", Some("gpt-4o")),
                ("RAGCHAT_RAG__TOP_K", Some("7")),
                ("OPENAI_API_KEY", Some("sk-from-env")),
                ("LOCAL_API_KEY", Some("local-secret")),
                ("PORT", Some("8000")),
            ],
            || ConfigLoader::load_from(Some(&path)).unwrap(),
        );

        assert_eq!(config.llm.model, "gpt-4o");
        assert_eq!(config.rag.top_k, 7);
        assert_eq!(config.openai.api_key.as_deref(), Some("sk-from-env"));
        assert_eq!(config.auth.api_key.as_deref(), Some("local-secret"));
        assert_eq!(config.server.port, 8000, "PORT beats the config file");
    }

    #[test]
    fn test_invalid_file_values_are_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_config(dir.path(), "rag:\n  chunk_size: 100\n  chunk_overlap: 150\n");

        assert!(ConfigLoader::load_from(Some(&path)).is_err());
    }
}
