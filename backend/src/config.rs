//! # Configuration
//!
//! The kiosk reads a single YAML file. Every field has a default, so a missing
//! file or a partial one is fine; only the values present override the
//! defaults.
//!
//! ```yaml
//! server:
//!   bind_address: 0.0.0.0:3000
//! breeding:
//!   dry_off_days: 230
//! forecast:
//!   ideal: 55
//! ```

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::info;

use crate::domain::{BreedingConstants, ForecastSettings, ParlorSettings};

/// Environment variable naming the configuration file
pub const CONFIG_ENV: &str = "HERD_KIOSK_CONFIG";
pub const DEFAULT_CONFIG_FILE: &str = "herd_kiosk.yaml";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub bind_address: String,
    /// Origin of the kiosk front-end allowed by CORS
    pub cors_origin: String,
    /// Directory with the built front-end, served for non-API paths
    pub static_dir: Option<PathBuf>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: "127.0.0.1:3000".to_string(),
            cors_origin: "http://localhost:8080".to_string(),
            static_dir: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    pub url: String,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self { url: "sqlite:herd_kiosk.db".to_string() }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub breeding: BreedingConstants,
    pub parlor: ParlorSettings,
    pub forecast: ForecastSettings,
}

impl AppConfig {
    /// Load from `$HERD_KIOSK_CONFIG`, falling back to `herd_kiosk.yaml`
    pub fn load() -> Result<Self> {
        let path = std::env::var_os(CONFIG_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE));
        Self::load_from(&path)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            info!("No configuration file at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read configuration file {}", path.display()))?;
        let config = Self::from_yaml(&contents)
            .with_context(|| format!("Failed to parse configuration file {}", path.display()))?;

        info!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    pub fn from_yaml(contents: &str) -> Result<Self> {
        if contents.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(contents)?)
    }
}
