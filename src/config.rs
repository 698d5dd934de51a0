//! Client configuration
//!
//! Loaded from `config.toml` in the platform config directory
//! (e.g. `~/.config/phrasebook/config.toml`), then overridden by
//! `PHRASEBOOK_API_URL` / `PHRASEBOOK_TOKEN` from the environment.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::audio::AudioUrlCache;

pub const API_URL_ENV: &str = "PHRASEBOOK_API_URL";
pub const TOKEN_ENV: &str = "PHRASEBOOK_TOKEN";

// Largest whole-second span chrono can represent
const MAX_AUDIO_CACHE_SECS: i64 = i64::MAX / 1000;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Config directory not found")]
    ConfigDirNotFound,

    #[error("Invalid config value: {0}")]
    Invalid(String),
}

pub type Result<T> = std::result::Result<T, ConfigError>;

/// Settings for talking to the vocabulary backend
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Backend base URL, without the `/vocabulary` suffix
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,
    /// Bearer token sent with every request
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
    /// Whole-request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// How long a signed audio URL is reused
    #[serde(default = "default_audio_cache_secs")]
    pub audio_cache_secs: i64,
}

fn default_api_base_url() -> String {
    "http://localhost:3000/api".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

// Signed URLs expire after 60s on the backend
fn default_audio_cache_secs() -> i64 {
    55
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_base_url: default_api_base_url(),
            token: None,
            timeout_secs: default_timeout_secs(),
            audio_cache_secs: default_audio_cache_secs(),
        }
    }
}

impl ClientConfig {
    /// Default location of the config file
    pub fn default_path() -> Result<PathBuf> {
        dirs::config_dir()
            .map(|p| p.join("phrasebook").join("config.toml"))
            .ok_or(ConfigError::ConfigDirNotFound)
    }

    /// Read a config file; a missing file yields the defaults
    pub fn from_file(path: &Path) -> Result<Self> {
        if !path.exists() {
            log::debug!("No config at {:?}, using defaults", path);
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)?;
        let config: ClientConfig = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values the client cannot be built with
    pub fn validate(&self) -> Result<()> {
        if AudioUrlCache::with_ttl_secs(self.audio_cache_secs).is_none() {
            return Err(ConfigError::Invalid(format!(
                "audio_cache_secs must be between 0 and {}, got {}",
                MAX_AUDIO_CACHE_SECS, self.audio_cache_secs
            )));
        }
        Ok(())
    }

    /// Load from `path` (or the default location) and apply environment overrides
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let path = match path {
            Some(p) => p.to_path_buf(),
            None => Self::default_path()?,
        };
        let mut config = Self::from_file(&path)?;
        config.apply_overrides(
            std::env::var(API_URL_ENV).ok(),
            std::env::var(TOKEN_ENV).ok(),
        );
        Ok(config)
    }

    /// Replace URL and token with non-empty overrides
    pub fn apply_overrides(&mut self, api_base_url: Option<String>, token: Option<String>) {
        if let Some(url) = api_base_url.filter(|u| !u.trim().is_empty()) {
            self.api_base_url = url;
        }
        if let Some(token) = token.filter(|t| !t.trim().is_empty()) {
            self.token = Some(token);
        }
    }

    /// Write the config back, e.g. after login stored a token
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;
        fs::write(path, content)?;
        Ok(())
    }
}
