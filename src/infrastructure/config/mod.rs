//! Configuration management infrastructure
//!
//! Hierarchical configuration using figment:
//! - YAML file loading
//! - Environment variable overrides
//! - Configuration validation
//! - Path resolution relative to the config file

pub mod loader;

pub use loader::{ConfigError, ConfigLoader};
