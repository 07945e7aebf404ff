//! Application configuration module
//!
//! Provides configuration types for the application. Values come from an
//! optional TOML file and are then overridden by `TALLYBOOK_*` environment
//! variables.
//!
//! ```toml
//! server_url = "https://books.example.com"
//! book_id = "household"
//! request_timeout_secs = 30
//! ```

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

/// Remote call timeout used when none is configured
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Environment variable names
pub const ENV_SERVER_URL: &str = "TALLYBOOK_SERVER_URL";
pub const ENV_BOOK_ID: &str = "TALLYBOOK_BOOK_ID";
pub const ENV_TOKEN: &str = "TALLYBOOK_TOKEN";
pub const ENV_DB_PATH: &str = "TALLYBOOK_DB_PATH";
pub const ENV_TIMEOUT_SECS: &str = "TALLYBOOK_TIMEOUT_SECS";

/// Application configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Server URL
    pub server_url: Option<String>,
    /// Book (ledger) that synced entries are created in
    pub book_id: Option<String>,
    /// Bearer token for the remote API
    pub token: Option<String>,
    /// Local database file
    pub db_path: Option<PathBuf>,
    /// Timeout applied to every remote call
    pub request_timeout_secs: Option<u64>,
}

impl AppConfig {
    /// Create a new AppConfigBuilder
    pub fn builder() -> AppConfigBuilder {
        AppConfigBuilder::default()
    }

    /// Parse and validate a TOML document
    pub fn from_toml_str(raw: &str) -> Result<Self, ConfigError> {
        let config: AppConfig = toml::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a TOML file, returning the defaults when it does not exist
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        match std::fs::read_to_string(path) {
            Ok(raw) => Self::from_toml_str(&raw),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(source) => Err(ConfigError::Io {
                path: path.to_path_buf(),
                source,
            }),
        }
    }

    /// Default location of the configuration file
    pub fn default_path() -> PathBuf {
        let mut path = dirs::config_dir().unwrap_or_else(std::env::temp_dir);
        path.push("tallybook");
        path.push("config.toml");
        path
    }

    /// Apply `TALLYBOOK_*` environment overrides
    pub fn with_env_overrides(mut self) -> Result<Self, ConfigError> {
        if let Ok(url) = std::env::var(ENV_SERVER_URL) {
            self.server_url = Some(url);
        }
        if let Ok(book_id) = std::env::var(ENV_BOOK_ID) {
            self.book_id = Some(book_id);
        }
        if let Ok(token) = std::env::var(ENV_TOKEN) {
            self.token = Some(token);
        }
        if let Ok(path) = std::env::var(ENV_DB_PATH) {
            self.db_path = Some(PathBuf::from(path));
        }
        if let Ok(raw) = std::env::var(ENV_TIMEOUT_SECS) {
            let secs = raw.trim().parse::<u64>().map_err(|_| {
                ConfigError::invalid(ENV_TIMEOUT_SECS, format!("not a number: {raw}"))
            })?;
            self.request_timeout_secs = Some(secs);
        }
        self.validate()?;
        Ok(self)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(url) = &self.server_url {
            if !(url.starts_with("http://") || url.starts_with("https://")) {
                return Err(ConfigError::InvalidUrl(url.clone()));
            }
        }
        if let Some(book_id) = &self.book_id {
            if book_id.trim().is_empty() {
                return Err(ConfigError::invalid("book_id", "must not be empty"));
            }
        }
        if self.request_timeout_secs == Some(0) {
            return Err(ConfigError::invalid(
                "request_timeout_secs",
                "must be greater than zero",
            ));
        }
        Ok(())
    }

    /// Effective remote call timeout
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS))
    }
}

/// Builder for AppConfig
#[derive(Debug, Default)]
pub struct AppConfigBuilder {
    config: AppConfig,
}

impl AppConfigBuilder {
    /// Set the server URL
    pub fn server_url(mut self, url: impl Into<String>) -> Self {
        self.config.server_url = Some(url.into());
        self
    }

    /// Set the default book id
    pub fn book_id(mut self, book_id: impl Into<String>) -> Self {
        self.config.book_id = Some(book_id.into());
        self
    }

    /// Set the API token
    pub fn token(mut self, token: impl Into<String>) -> Self {
        self.config.token = Some(token.into());
        self
    }

    /// Set the local database path
    pub fn db_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.db_path = Some(path.into());
        self
    }

    /// Set the remote call timeout in seconds
    pub fn request_timeout_secs(mut self, secs: u64) -> Self {
        self.config.request_timeout_secs = Some(secs);
        self
    }

    /// Build the configuration
    pub fn build(self) -> Result<AppConfig, ConfigError> {
        self.config.validate()?;
        Ok(self.config)
    }
}

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid URL: {0}")]
    InvalidUrl(String),
    #[error("missing value: {0}")]
    MissingValue(&'static str),
    #[error("invalid value for {field}: {message}")]
    InvalidValue { field: String, message: String },
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
}

impl ConfigError {
    fn invalid(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidValue {
            field: field.into(),
            message: message.into(),
        }
    }
}
