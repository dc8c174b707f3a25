//! Configuration loading and validation.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::models::PhaseClass;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("Invalid configuration: {0}")]
    ValidationError(String),
}

/// Statistics engine configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Prefix that marks a phase label as a pool phase
    #[serde(default = "default_pool_marker")]
    pub pool_marker: String,

    /// Minimum pool bouts to be ranked in pool metrics
    #[serde(default = "default_pool_min_matches")]
    pub pool_min_matches: u32,

    /// Minimum bracket bouts to be ranked in bracket metrics
    #[serde(default = "default_bracket_min_matches")]
    pub bracket_min_matches: u32,

    /// Minimum bouts (any phase) to appear in a leaderboard
    #[serde(default = "default_leaderboard_min_matches")]
    pub leaderboard_min_matches: u32,
}

fn default_pool_marker() -> String {
    "Poule".to_string()
}

fn default_pool_min_matches() -> u32 {
    5
}

fn default_bracket_min_matches() -> u32 {
    1
}

fn default_leaderboard_min_matches() -> u32 {
    10
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            pool_marker: default_pool_marker(),
            pool_min_matches: default_pool_min_matches(),
            bracket_min_matches: default_bracket_min_matches(),
            leaderboard_min_matches: default_leaderboard_min_matches(),
        }
    }
}

impl EngineConfig {
    /// Sample-size threshold for per-phase rankings.
    pub fn min_matches_for(&self, class: PhaseClass) -> u32 {
        match class {
            PhaseClass::Pool => self.pool_min_matches,
            PhaseClass::Bracket => self.bracket_min_matches,
        }
    }
}

/// Server configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8080
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

/// Main application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    #[serde(default = "default_log_level")]
    pub log_level: String,

    #[serde(default)]
    pub engine: EngineConfig,

    #[serde(default)]
    pub server: ServerConfig,
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("./data")
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            log_level: default_log_level(),
            engine: EngineConfig::default(),
            server: ServerConfig::default(),
        }
    }
}

impl AppConfig {
    /// Load configuration from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        let config: AppConfig = toml::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Load the file when present, otherwise fall back to defaults.
    pub fn load_or_default(path: &Path) -> Result<Self, ConfigError> {
        if path.exists() {
            Self::from_file(path)
        } else {
            tracing::debug!("No config file at {:?}, using defaults", path);
            Ok(Self::default())
        }
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.engine.pool_marker.trim().is_empty() {
            return Err(ConfigError::ValidationError(
                "Pool marker must not be empty".to_string(),
            ));
        }

        if self.engine.bracket_min_matches == 0 {
            return Err(ConfigError::ValidationError(
                "Bracket threshold must be at least 1".to_string(),
            ));
        }

        if self.server.port == 0 {
            return Err(ConfigError::ValidationError(
                "Server port must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }
}
