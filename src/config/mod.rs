//! Configuration.
//!
//! Supports YAML file and environment variable overrides.

mod recovery;
mod storage;

pub use recovery::RecoveryConfig;
pub use storage::{SnapshotConfig, StorageBackend, StorageConfig};

use std::path::Path;

use serde::Deserialize;

/// Environment variable overriding the configuration file path.
pub const CONFIG_ENV_VAR: &str = "MEMOIR_CONFIG";
/// Default configuration file name.
pub const DEFAULT_CONFIG_FILE: &str = "memoir.yaml";
/// Environment variable overriding the storage path.
pub const STORAGE_PATH_ENV_VAR: &str = "MEMOIR_STORAGE_PATH";
/// Environment variable overriding the storage backend.
pub const STORAGE_BACKEND_ENV_VAR: &str = "MEMOIR_STORAGE_BACKEND";

/// Main configuration.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Storage configuration.
    pub storage: StorageConfig,
    /// Snapshot read/write flags.
    pub snapshots: SnapshotConfig,
    /// Recovery configuration.
    pub recovery: RecoveryConfig,
}

impl Config {
    /// Load configuration from file and environment.
    ///
    /// Priority (highest to lowest):
    /// 1. Environment variables
    /// 2. Config file
    /// 3. Defaults
    pub fn load() -> Result<Self, ConfigError> {
        let config_path =
            std::env::var(CONFIG_ENV_VAR).unwrap_or_else(|_| DEFAULT_CONFIG_FILE.to_string());

        let mut config = if Path::new(&config_path).exists() {
            Self::from_file(&config_path)?
        } else {
            Self::default()
        };

        config.apply_env_overrides();

        Ok(config)
    }

    /// Load configuration from a YAML file.
    pub fn from_file(path: &str) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::FileRead(path.to_string(), e.to_string()))?;

        serde_yaml::from_str(&content).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Apply environment variable overrides.
    fn apply_env_overrides(&mut self) {
        if let Ok(path) = std::env::var(STORAGE_PATH_ENV_VAR) {
            self.storage.path = path;
        }

        if let Ok(backend) = std::env::var(STORAGE_BACKEND_ENV_VAR) {
            match backend.as_str() {
                "memory" => self.storage.backend = StorageBackend::Memory,
                "sqlite" => self.storage.backend = StorageBackend::Sqlite,
                _ => {}
            }
        }
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file '{0}': {1}")]
    FileRead(String, String),

    #[error("Failed to parse config: {0}")]
    Parse(String),
}
