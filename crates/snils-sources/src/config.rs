//! Configuration for SNILS text sources
//!
//! Settings for fetching web pages and decoding files. Loaded from TOML;
//! every field has a default, so a partial file (or none at all) is fine.

use std::path::{Path, PathBuf};
use std::time::Duration;

use encoding_rs::Encoding;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Environment variable pointing at a config file
pub const CONFIG_ENV: &str = "SNILS_CONFIG";

/// Source configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SnilsConfig {
    /// Web page fetching
    pub fetch: FetchConfig,
    /// File decoding
    pub file: FileConfig,
}

/// Web fetch configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FetchConfig {
    /// Request timeout in seconds
    pub timeout_secs: u64,
    /// User-Agent header sent with every request
    pub user_agent: String,
    /// Remove markup from HTML responses before extraction
    pub strip_html: bool,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            timeout_secs: 10,
            user_agent: format!("snils/{}", env!("CARGO_PKG_VERSION")),
            strip_html: true,
        }
    }
}

impl FetchConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// File decoding configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    /// Encoding tried first
    pub encoding: String,
    /// Encodings tried in order when the first one fails
    pub fallback_encodings: Vec<String>,
}

impl Default for FileConfig {
    fn default() -> Self {
        Self {
            encoding: "utf-8".to_string(),
            fallback_encodings: vec!["windows-1251".to_string(), "koi8-r".to_string()],
        }
    }
}

impl SnilsConfig {
    /// Load configuration from a TOML string
    pub fn from_toml(toml_str: &str) -> Result<Self, ConfigError> {
        toml::from_str(toml_str).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Serialize configuration to TOML
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Default config file location: `<config dir>/snils/config.toml`
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("snils").join("config.toml"))
    }

    /// Load configuration from the first location that applies.
    ///
    /// Order: `explicit`, then `$SNILS_CONFIG`, then [`Self::default_path`]
    /// if that file exists, else built-in defaults. An explicitly named file
    /// that cannot be read is an error.
    pub fn load(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        let path = match explicit {
            Some(path) => Some(path.to_path_buf()),
            None => std::env::var_os(CONFIG_ENV)
                .map(PathBuf::from)
                .or_else(|| Self::default_path().filter(|p| p.exists())),
        };

        let config = match path {
            Some(path) => {
                let content =
                    std::fs::read_to_string(&path).map_err(|source| ConfigError::Read {
                        path: path.clone(),
                        source,
                    })?;
                tracing::debug!("Loaded configuration from {}", path.display());
                Self::from_toml(&content)?
            }
            None => Self::default(),
        };

        config.validate()?;
        Ok(config)
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.fetch.timeout_secs == 0 {
            return Err(ConfigError::OutOfRange(
                "fetch.timeout_secs must be positive".to_string(),
            ));
        }

        let labels =
            std::iter::once(&self.file.encoding).chain(self.file.fallback_encodings.iter());
        for label in labels {
            if Encoding::for_label(label.as_bytes()).is_none() {
                return Err(ConfigError::UnsupportedEncoding(label.clone()));
            }
        }

        Ok(())
    }
}

/// Configuration loading or validation error
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Invalid config: {0}")]
    Parse(String),
    #[error("Value out of range: {0}")]
    OutOfRange(String),
    #[error("Unsupported encoding: {0}")]
    UnsupportedEncoding(String),
}
