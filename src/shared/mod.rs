//! Shared Module
//!
//! Types shared by the staging store, the reconciler and the command line
//! front end: error types and application configuration.

/// Shared error types
pub mod error;

/// Application configuration
pub mod config;

/// Re-export commonly used types for convenience
pub use config::{AppConfig, AppConfigBuilder, ConfigError};
pub use error::{ApiError, StagingError, StoreError, SyncError};
