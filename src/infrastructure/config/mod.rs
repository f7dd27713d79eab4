use std::path::{Path, PathBuf};

use figment::providers::{Env, Format, Serialized, Toml};
use figment::Figment;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::domain::csv::ImportConfig;
use crate::domain::error::{AppError, Result};

pub const DEFAULT_CONFIG_FILE: &str = "leadflow.toml";
pub const ENV_PREFIX: &str = "LEADFLOW_";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Start the in-memory lead store with demo leads
    pub seed_fixtures: bool,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            seed_fixtures: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Default tracing filter when RUST_LOG is unset
    pub log_level: String,
    pub import: ImportConfig,
    pub store: StoreConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            import: ImportConfig::default(),
            store: StoreConfig::default(),
        }
    }
}

/// Layered configuration: defaults, then a TOML file, then LEADFLOW_* env vars.
pub struct ConfigService {
    config_file: PathBuf,
}

impl ConfigService {
    pub fn new() -> Self {
        Self {
            config_file: PathBuf::from(DEFAULT_CONFIG_FILE),
        }
    }

    pub fn with_file(path: impl AsRef<Path>) -> Self {
        Self {
            config_file: path.as_ref().to_path_buf(),
        }
    }

    pub fn load(&self) -> Result<AppConfig> {
        // A missing .env is the normal case
        if let Ok(path) = dotenvy::dotenv() {
            debug!(path = %path.display(), "Loaded .env file");
        }

        let figment = self
            .file_figment()
            .merge(Env::prefixed(ENV_PREFIX).split("__"));
        Self::extract(figment)
    }

    /// Defaults plus the TOML file only; environment is ignored.
    pub fn load_file_only(&self) -> Result<AppConfig> {
        Self::extract(self.file_figment())
    }

    fn file_figment(&self) -> Figment {
        Figment::from(Serialized::defaults(AppConfig::default()))
            .merge(Toml::file(&self.config_file))
    }

    fn extract(figment: Figment) -> Result<AppConfig> {
        let config: AppConfig = figment.extract()?;
        config
            .import
            .validate()
            .map_err(|e| AppError::ConfigError(format!("Invalid import config: {}", e)))?;
        Ok(config)
    }
}

impl Default for ConfigService {
    fn default() -> Self {
        Self::new()
    }
}
