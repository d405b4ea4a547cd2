//! Dashboard configuration
//!
//! The dashboard only needs to know:
//! - Where the records API lives
//! - Which wallet address, if any, to filter transactions by
//! - How long to wait on the API

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use std::time::Duration;

/// Environment variable that overrides `api_url`.
pub const API_URL_ENV: &str = "MEDLEDGER_API_URL";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Base URL of the records API, e.g. `http://localhost:3001/api`.
    #[serde(default = "default_api_url")]
    pub api_url: String,

    /// Wallet address used as the initial transaction-history filter.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub account: Option<String>,

    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,

    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_secs: u64,
}

fn default_api_url() -> String {
    "http://localhost:3001/api".to_string()
}

fn default_request_timeout() -> u64 {
    30
}

fn default_connect_timeout() -> u64 {
    10
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_url: default_api_url(),
            account: None,
            request_timeout_secs: default_request_timeout(),
            connect_timeout_secs: default_connect_timeout(),
        }
    }
}

impl Config {
    /// Load configuration from disk, writing defaults on first run, then apply
    /// the environment override and validate.
    pub fn load() -> Result<Self, ConfigError> {
        let config_path = Self::config_path()?;

        let mut config = if config_path.exists() {
            log::info!("📁 Loading config from: {}", config_path.display());
            let contents = fs::read_to_string(&config_path)?;
            Self::from_toml(&contents)?
        } else {
            log::info!("📝 Creating default config");
            let config = Config::default();
            config.save()?;
            config
        };

        if let Ok(url) = std::env::var(API_URL_ENV) {
            config.apply_api_url_override(&url);
        }

        config.validate()?;
        log::info!(
            "✅ Config loaded: api_url={}, account={}",
            config.api_url,
            config.account.as_deref().unwrap_or("none")
        );
        Ok(config)
    }

    /// [`Config::load`], falling back to defaults (plus a usable environment
    /// override) when the file is unreadable or invalid.
    pub fn load_or_default() -> Self {
        Self::load().unwrap_or_else(|e| {
            log::warn!("⚠️ Config unusable ({}), using defaults", e);
            let mut config = Config::default();
            if let Ok(url) = std::env::var(API_URL_ENV) {
                config.apply_api_url_override(&url);
            }
            if config.validate().is_err() {
                log::warn!("⚠️ Ignoring invalid {}", API_URL_ENV);
                config = Config::default();
            }
            config
        })
    }

    /// Parse a config file body.
    pub fn from_toml(contents: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(contents)?)
    }

    /// Save configuration to disk
    pub fn save(&self) -> Result<(), ConfigError> {
        let config_path = Self::config_path()?;
        if let Some(parent) = config_path.parent() {
            fs::create_dir_all(parent)?;
        }

        let contents = toml::to_string_pretty(self)?;
        fs::write(&config_path, contents)?;
        log::info!("💾 Config saved to: {}", config_path.display());
        Ok(())
    }

    /// Replace `api_url` unless the override is blank.
    pub fn apply_api_url_override(&mut self, url: &str) {
        let url = url.trim();
        if !url.is_empty() {
            log::info!("🔧 {} overrides api_url: {}", API_URL_ENV, url);
            self.api_url = url.to_string();
        }
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }

    /// Get config file path
    fn config_path() -> Result<PathBuf, ConfigError> {
        let mut path = Self::data_dir()?;
        path.push("config.toml");
        Ok(path)
    }

    /// Get base data directory
    pub fn data_dir() -> Result<PathBuf, ConfigError> {
        let home = dirs::home_dir().ok_or(ConfigError::NoHomeDir)?;
        let mut path = home;
        path.push(".medledger");
        Ok(path)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.api_url.starts_with("http://") && !self.api_url.starts_with("https://") {
            return Err(ConfigError::InvalidEndpoint(self.api_url.clone()));
        }

        if self.request_timeout_secs == 0 {
            return Err(ConfigError::InvalidTimeout("request_timeout_secs"));
        }
        if self.connect_timeout_secs == 0 {
            return Err(ConfigError::InvalidTimeout("connect_timeout_secs"));
        }

        if let Some(account) = &self.account {
            if account.trim().is_empty() {
                return Err(ConfigError::InvalidAccount);
            }
        }

        Ok(())
    }
}

// ============================================================================
// Error Handling
// ============================================================================

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("TOML serialize error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),

    #[error("Home directory not found")]
    NoHomeDir,

    #[error("Invalid endpoint: {0} (must start with http:// or https://)")]
    InvalidEndpoint(String),

    #[error("Invalid {0}: must be greater than zero")]
    InvalidTimeout(&'static str),

    #[error("Invalid account: must not be empty")]
    InvalidAccount,
}
