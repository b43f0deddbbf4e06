//! Configuration management
//!
//! Sources, later ones winning: built-in defaults, `config/<env>.toml`,
//! then environment variables (`HOST`, `PORT`, `LOG_LEVEL`, `MODEL_DIR`,
//! `CACHE_CAPACITY`, `HISTORY_CAPACITY`).

use crate::{PriceServiceConfig, PriceServiceError};
use amazeworth_price_core::ArtifactFiles;
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::{info, warn};

/// Configuration manager for the service binary
#[derive(Debug, Clone)]
pub struct ConfigManager {
    config: PriceServiceConfig,
    environment: Environment,
}

/// Environment type
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    Development,
    Staging,
    Production,
    Testing,
}

impl Environment {
    fn file_name(&self) -> &'static str {
        match self {
            Environment::Production => "production.toml",
            Environment::Staging => "staging.toml",
            Environment::Testing => "testing.toml",
            Environment::Development => "development.toml",
        }
    }
}

impl FromStr for Environment {
    type Err = PriceServiceError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_lowercase().as_str() {
            "production" | "prod" => Ok(Environment::Production),
            "staging" | "stage" => Ok(Environment::Staging),
            "testing" | "test" => Ok(Environment::Testing),
            "development" | "dev" => Ok(Environment::Development),
            _ => Err(PriceServiceError::Config(format!(
                "Unknown environment: {value}"
            ))),
        }
    }
}

impl ConfigManager {
    /// Load from `./config` and the process environment.
    pub fn new() -> Result<Self, PriceServiceError> {
        Self::load(Path::new("config"), |key| env::var(key).ok())
    }

    /// Load from `config_dir`, resolving variables through `lookup`.
    pub fn load<F>(config_dir: &Path, lookup: F) -> Result<Self, PriceServiceError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let environment = lookup("AMAZEWORTH_ENV")
            .or_else(|| lookup("ENVIRONMENT"))
            .map(|value| value.parse::<Environment>())
            .transpose()?
            .unwrap_or(Environment::Development);

        let path = config_dir.join(environment.file_name());
        let mut config = if path.exists() {
            info!("Loading configuration from {}", path.display());
            Self::load_config_from_file(&path)?
        } else {
            info!("No configuration file at {}; using defaults", path.display());
            PriceServiceConfig::default()
        };

        Self::apply_env_overrides(&mut config, &lookup);

        Ok(Self {
            config,
            environment,
        })
    }

    /// Get the current configuration
    pub fn get_config(&self) -> &PriceServiceConfig {
        &self.config
    }

    /// Get the current environment
    pub fn get_environment(&self) -> Environment {
        self.environment
    }

    fn load_config_from_file(path: &Path) -> Result<PriceServiceConfig, PriceServiceError> {
        let content = fs::read_to_string(path)?;
        let file: ConfigFile = toml::from_str(&content)?;
        Ok(file.into())
    }

    fn apply_env_overrides<F>(config: &mut PriceServiceConfig, lookup: &F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(value) = lookup("HOST") {
            let trimmed = value.trim();
            if !trimmed.is_empty() {
                config.host = trimmed.to_string();
            }
        }

        if let Some(value) = lookup("LOG_LEVEL") {
            let trimmed = value.trim();
            if !trimmed.is_empty() {
                config.log_level = trimmed.to_lowercase();
            }
        }

        if let Some(value) = lookup("MODEL_DIR") {
            let trimmed = value.trim();
            if !trimmed.is_empty() {
                config.model_dir = PathBuf::from(trimmed);
            }
        }

        if let Some(port) = Self::parse_override::<u16, F>(lookup, "PORT") {
            config.port = port;
        }

        if let Some(capacity) = Self::parse_override::<usize, F>(lookup, "CACHE_CAPACITY") {
            config.cache_capacity = capacity;
        }

        if let Some(capacity) = Self::parse_override::<usize, F>(lookup, "HISTORY_CAPACITY") {
            config.history_capacity = capacity;
        }
    }

    fn parse_override<T, F>(lookup: &F, key: &str) -> Option<T>
    where
        T: FromStr,
        F: Fn(&str) -> Option<String>,
    {
        let value = lookup(key)?;
        match value.trim().parse::<T>() {
            Ok(parsed) => Some(parsed),
            Err(_) => {
                warn!("Ignoring invalid {} override: {:?}", key, value);
                None
            }
        }
    }
}

/// Configuration file structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct ConfigFile {
    #[serde(default)]
    server: ServerConfig,
    #[serde(default)]
    logging: LoggingConfig,
    #[serde(default)]
    model: ModelConfig,
    #[serde(default)]
    service: ServiceConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
struct ServerConfig {
    host: String,
    port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        let defaults = PriceServiceConfig::default();
        Self {
            host: defaults.host,
            port: defaults.port,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
struct LoggingConfig {
    level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
struct ModelConfig {
    dir: PathBuf,
    files: ArtifactFiles,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("models"),
            files: ArtifactFiles::default(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
struct ServiceConfig {
    cache_capacity: usize,
    history_capacity: usize,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        let defaults = PriceServiceConfig::default();
        Self {
            cache_capacity: defaults.cache_capacity,
            history_capacity: defaults.history_capacity,
        }
    }
}

impl From<ConfigFile> for PriceServiceConfig {
    fn from(file: ConfigFile) -> Self {
        PriceServiceConfig {
            host: file.server.host,
            port: file.server.port,
            log_level: file.logging.level,
            model_dir: file.model.dir,
            artifact_files: file.model.files,
            cache_capacity: file.service.cache_capacity,
            history_capacity: file.service.history_capacity,
        }
    }
}
