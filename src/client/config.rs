use crate::client::sync::SyncTarget;
use crate::shared::config::{AppConfig, AppConfigBuilder, ConfigError};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Default server URL
const DEFAULT_SERVER_URL: &str = "http://127.0.0.1:3000";

/// Application configuration wrapper.
#[derive(Debug, Clone, Default)]
pub struct Config {
    app: AppConfig,
}

impl Config {
    /// Create a new configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Load the config file (default location unless `path` is given) and
    /// apply environment overrides
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let path = path.map(Path::to_path_buf).unwrap_or_else(AppConfig::default_path);
        let app = AppConfig::load(&path)?.with_env_overrides()?;
        Ok(Self::from_app(app))
    }

    pub fn with_builder(builder: AppConfigBuilder) -> Result<Self, ConfigError> {
        Ok(Self::from_app(builder.build()?))
    }

    fn from_app(app: AppConfig) -> Self {
        Self { app }
    }

    /// Get the API token
    pub fn get_token(&self) -> Option<&str> {
        self.app.token.as_deref()
    }

    pub fn server_url(&self) -> &str {
        self.app.server_url.as_deref().unwrap_or(DEFAULT_SERVER_URL)
    }

    pub fn request_timeout(&self) -> Duration {
        self.app.request_timeout()
    }

    /// Local database file, under the platform data directory by default
    pub fn db_path(&self) -> PathBuf {
        self.app.db_path.clone().unwrap_or_else(|| {
            let mut path = dirs::data_dir().unwrap_or_else(std::env::temp_dir);
            path.push("tallybook");
            path.push("local.db");
            path
        })
    }

    /// Sync target built from the configured server and book
    pub fn target(&self) -> Result<SyncTarget, ConfigError> {
        let book_id = self
            .app
            .book_id
            .as_deref()
            .ok_or(ConfigError::MissingValue("book_id"))?;
        Ok(SyncTarget::new(self.server_url(), book_id))
    }
}
