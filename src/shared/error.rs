//! Shared Error Types
//!
//! This module defines the error types used across the staging store, the
//! key-value backends and the sync reconciler.
//!
//! # Error Categories
//!
//! - `StoreError` - Key-value backend failures (SQLite, I/O)
//! - `StagingError` - Staging collection failures (backend or JSON)
//! - `ApiError` - Remote create-entry failures
//! - `SyncError` - Batch-level reconciliation failures
//!
//! # Usage
//!
//! ```rust
//! use tallybook::shared::error::ApiError;
//!
//! let error = ApiError::rejected(500, Some("ledger locked".to_string()));
//! assert!(error.to_string().contains("500"));
//! ```
//!
//! # Thread Safety
//!
//! All error types are `Send + Sync` and can be safely shared across thread boundaries.
use thiserror::Error;

/// Key-value backend errors
#[derive(Debug, Error)]
pub enum StoreError {
    /// SQLite error from the local database
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Filesystem error while preparing the database location
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Any other backend failure
    #[error("Storage backend error: {message}")]
    Backend {
        /// Human-readable error message
        message: String,
    },
}

impl StoreError {
    /// Create a new backend error
    pub fn backend(message: impl Into<String>) -> Self {
        Self::Backend {
            message: message.into(),
        }
    }
}

/// Staging store errors
#[derive(Debug, Error)]
pub enum StagingError {
    /// The key-value backend failed
    #[error(transparent)]
    Store(#[from] StoreError),

    /// JSON serialization or deserialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Remote create-entry errors
#[derive(Debug, Error)]
pub enum ApiError {
    /// Connection failure, timeout or other transport error
    #[error("Network error: {0}")]
    Transport(#[from] reqwest::Error),

    /// Non-success HTTP status
    #[error("Request failed: {status} - {body}")]
    Status {
        /// HTTP status code
        status: u16,
        /// Response body, if any
        body: String,
    },

    /// The server answered but did not accept the entry
    #[error("Entry rejected with code {code}: {}", .message.as_deref().unwrap_or("no message"))]
    Rejected {
        /// Response code reported by the server
        code: i64,
        /// Optional server message
        message: Option<String>,
    },

    /// Malformed request URL
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),
}

impl ApiError {
    /// Create a new rejection error
    pub fn rejected(code: i64, message: Option<String>) -> Self {
        Self::Rejected { code, message }
    }

    /// Create a new HTTP status error
    pub fn status(status: u16, body: impl Into<String>) -> Self {
        Self::Status {
            status,
            body: body.into(),
        }
    }
}

/// Batch-level reconciliation errors
///
/// Per-entry remote failures never surface here; they are counted in the
/// batch report instead.
#[derive(Debug, Error)]
pub enum SyncError {
    /// Reading the unsynced entries failed
    #[error("Failed to read unsynced entries: {0}")]
    Staging(#[from] StagingError),
}
