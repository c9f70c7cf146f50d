//! Configuration management for cartable.
//!
//! This module provides configuration loading and validation using figment,
//! supporting TOML config files, environment variables, and defaults.

use std::path::PathBuf;
use std::time::Duration;

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use reqwest::Url;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::pagination::DEFAULT_PAGE_SIZE;
use crate::store::DEFAULT_SNAPSHOT_KEY;

/// Default configuration file name.
const CONFIG_FILE_NAME: &str = "config.toml";

/// Default data directory name.
const DATA_DIR_NAME: &str = "cartable";

/// Default database file name.
const DATABASE_FILE_NAME: &str = "cartable.db";

/// Default seed endpoint.
pub const DEFAULT_SEED_URL: &str = "https://myfakeapi.com/api/cars";

/// Application configuration.
///
/// Configuration is loaded from (in order of precedence, highest first):
/// 1. Environment variables (prefixed with `CARTABLE_`, `__` between sections)
/// 2. TOML config file at `~/.config/cartable/config.toml`
/// 3. Default values
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Storage configuration.
    pub storage: StorageConfig,
    /// Seed source configuration.
    pub seed: SeedConfig,
    /// Table view configuration.
    pub table: TableConfig,
}

/// Storage-related configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Path to the database file.
    /// Defaults to `~/.local/share/cartable/cartable.db`
    pub database_path: Option<PathBuf>,
    /// Key the car collection is stored under.
    pub snapshot_key: String,
}

/// Seed-related configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SeedConfig {
    /// Endpoint returning `{ "cars": [...] }`.
    pub url: String,
    /// Request timeout in seconds.
    /// Set to 0 to wait indefinitely.
    pub timeout_secs: u64,
}

/// Table view configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TableConfig {
    /// Rows per page.
    pub page_size: usize,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            database_path: None, // Will be resolved to default at runtime
            snapshot_key: DEFAULT_SNAPSHOT_KEY.to_string(),
        }
    }
}

impl Default for SeedConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_SEED_URL.to_string(),
            timeout_secs: 30,
        }
    }
}

impl Default for TableConfig {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl Config {
    /// Load configuration from all sources.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration loading or parsing fails.
    pub fn load() -> Result<Self> {
        Self::load_from(None)
    }

    /// Load configuration with an optional custom config path.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration loading or parsing fails.
    pub fn load_from(config_path: Option<PathBuf>) -> Result<Self> {
        let config_file = config_path.unwrap_or_else(Self::default_config_path);

        let figment = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Toml::file(&config_file))
            .merge(Env::prefixed("CARTABLE_").split("__"));

        let config: Config = figment.extract()?;
        config.validate()?;
        Ok(config)
    }

    /// Get the default configuration file path.
    #[must_use]
    pub fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from(".config"))
            .join(DATA_DIR_NAME)
            .join(CONFIG_FILE_NAME)
    }

    /// Get the default data directory path.
    #[must_use]
    pub fn default_data_dir() -> PathBuf {
        dirs::data_local_dir()
            .unwrap_or_else(|| PathBuf::from(".local/share"))
            .join(DATA_DIR_NAME)
    }

    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if any configuration values are invalid.
    pub fn validate(&self) -> Result<()> {
        if self.table.page_size == 0 {
            return Err(Error::ConfigValidation {
                message: "page_size must be greater than 0".to_string(),
            });
        }

        if self.storage.snapshot_key.trim().is_empty() {
            return Err(Error::ConfigValidation {
                message: "snapshot_key must not be empty".to_string(),
            });
        }

        self.seed_url()?;
        Ok(())
    }

    /// Get the database path, resolving defaults if not set.
    #[must_use]
    pub fn database_path(&self) -> PathBuf {
        self.storage
            .database_path
            .clone()
            .unwrap_or_else(|| Self::default_data_dir().join(DATABASE_FILE_NAME))
    }

    /// Get the parsed seed URL.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL is not an absolute http(s) URL.
    pub fn seed_url(&self) -> Result<Url> {
        let url = Url::parse(&self.seed.url).map_err(|e| Error::ConfigValidation {
            message: format!("invalid seed url '{}': {e}", self.seed.url),
        })?;
        match url.scheme() {
            "http" | "https" => Ok(url),
            other => Err(Error::ConfigValidation {
                message: format!("seed url must use http or https, not '{other}'"),
            }),
        }
    }

    /// Get the seed request timeout, if any.
    #[must_use]
    pub fn seed_timeout(&self) -> Option<Duration> {
        if self.seed.timeout_secs == 0 {
            None
        } else {
            Some(Duration::from_secs(self.seed.timeout_secs))
        }
    }
}
