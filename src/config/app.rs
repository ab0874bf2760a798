//! Main application configuration
//!
//! This module defines the primary configuration structures for league-ranker,
//! including environment variable and TOML file loading and validation.

use crate::rating::EngineConfig;
use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

/// Main application configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub service: ServiceSettings,
    pub engine: EngineSettings,
    pub storage: StorageSettings,
    pub output: OutputSettings,
}

/// Service-level settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceSettings {
    /// Service name for logging and metrics
    pub name: String,
    /// Log level (trace, debug, info, warn, error)
    pub log_level: String,
}

/// Rating engine settings
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineSettings {
    /// Stop with an error after this many sweeps (unbounded when unset)
    pub max_sweeps: Option<usize>,
}

/// Rating storage settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageSettings {
    /// JSON document holding every stored rating
    pub ratings_db_path: PathBuf,
}

/// Published output settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputSettings {
    /// Directory receiving ranking snapshots and index.json
    pub rankings_dir: PathBuf,
    /// Prometheus text-format file written after each run
    pub metrics_textfile: Option<PathBuf>,
}

impl Default for ServiceSettings {
    fn default() -> Self {
        Self {
            name: "league-ranker".to_string(),
            log_level: "info".to_string(),
        }
    }
}

impl Default for StorageSettings {
    fn default() -> Self {
        Self {
            ratings_db_path: PathBuf::from("data/ratings.json"),
        }
    }
}

impl Default for OutputSettings {
    fn default() -> Self {
        Self {
            rankings_dir: PathBuf::from("public/rankings"),
            metrics_textfile: None,
        }
    }
}

impl AppConfig {
    /// Load configuration from environment variables with fallback to defaults
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();
        config.apply_env()?;
        validate_config(&config)?;
        Ok(config)
    }

    /// Load configuration from a TOML file, then apply environment overrides
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let mut config: Self = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file {}", path.display()))?;

        config.apply_env()?;
        validate_config(&config)?;
        Ok(config)
    }

    fn apply_env(&mut self) -> Result<()> {
        // Service settings
        if let Ok(name) = env::var("SERVICE_NAME") {
            self.service.name = name;
        }
        if let Ok(log_level) = env::var("LOG_LEVEL") {
            self.service.log_level = log_level;
        }

        // Engine settings
        if let Ok(max_sweeps) = env::var("MAX_SWEEPS") {
            self.engine.max_sweeps = Some(
                max_sweeps
                    .parse()
                    .map_err(|_| anyhow!("Invalid MAX_SWEEPS value: {}", max_sweeps))?,
            );
        }

        // Storage and output settings
        if let Ok(path) = env::var("RATINGS_DB_PATH") {
            self.storage.ratings_db_path = PathBuf::from(path);
        }
        if let Ok(dir) = env::var("RANKINGS_DIR") {
            self.output.rankings_dir = PathBuf::from(dir);
        }
        if let Ok(path) = env::var("METRICS_TEXTFILE") {
            self.output.metrics_textfile = Some(PathBuf::from(path));
        }

        Ok(())
    }

    /// Engine configuration derived from these settings
    pub fn engine_config(&self) -> EngineConfig {
        EngineConfig {
            max_sweeps: self.engine.max_sweeps,
        }
    }
}

/// Validate configuration values
pub fn validate_config(config: &AppConfig) -> Result<()> {
    // Validate log level
    match config.service.log_level.to_lowercase().as_str() {
        "trace" | "debug" | "info" | "warn" | "error" => {}
        _ => return Err(anyhow!("Invalid log level: {}", config.service.log_level)),
    }

    if config.service.name.is_empty() {
        return Err(anyhow!("Service name cannot be empty"));
    }

    if config.engine.max_sweeps == Some(0) {
        return Err(anyhow!("Max sweeps must be greater than 0"));
    }

    if config.storage.ratings_db_path.as_os_str().is_empty() {
        return Err(anyhow!("Ratings database path cannot be empty"));
    }
    if config.output.rankings_dir.as_os_str().is_empty() {
        return Err(anyhow!("Rankings directory cannot be empty"));
    }

    Ok(())
}
