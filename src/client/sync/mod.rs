//! # Sync Reconciler
//!
//! Pushes unsynced entries to the remote book, one request per entry, and
//! flags each accepted entry as synced.
//!
//! ## Delivery
//!
//! - Each entry gets exactly one attempt per call; there is no retry or
//!   backoff here, retries happen when the user syncs again
//! - A batch runs sequentially in the order given and never stops on a
//!   failed entry
//! - Nothing marks an entry as "in flight". If the process dies after the
//!   server accepted an entry but before it was flagged, the entry is sent
//!   again next time and the server sees a duplicate
//!
//! ## Usage
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use std::time::Duration;
//! use tallybook::client::local_db::MemoryStore;
//! use tallybook::client::offline::StagingStore;
//! use tallybook::client::sync::{HttpEntryApi, SyncReconciler, SyncTarget};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let staging = StagingStore::new(Arc::new(MemoryStore::new()));
//! let api = HttpEntryApi::new(Duration::from_secs(30), None)?;
//! let reconciler = SyncReconciler::new(staging, Arc::new(api));
//!
//! let target = SyncTarget::new("https://books.example.com", "household");
//! let report = reconciler.sync_pending(&target).await?;
//! println!("{} synced, {} failed", report.succeeded, report.failed.len());
//! # Ok(())
//! # }
//! ```

pub mod api;

pub use api::{CreateEntryResponse, EntryApi, HttpEntryApi};

use crate::client::offline::{LocalEntry, Payload, StagingStore};
use crate::shared::error::{ApiError, SyncError};
use chrono::Utc;
use std::sync::Arc;

/// Body field carrying the destination book
pub const BOOK_ID_FIELD: &str = "bookId";

/// Where synced entries are created: a server and a book on it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncTarget {
    pub server_url: String,
    pub book_id: String,
}

impl SyncTarget {
    pub fn new(server_url: impl Into<String>, book_id: impl Into<String>) -> Self {
        Self {
            server_url: server_url.into(),
            book_id: book_id.into(),
        }
    }

    /// Entry payload with the book id added
    pub fn request_body(&self, payload: &Payload) -> Payload {
        let mut body = payload.clone();
        body.insert(
            BOOK_ID_FIELD.to_string(),
            serde_json::Value::String(self.book_id.clone()),
        );
        body
    }
}

/// Outcome of a batch
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SyncReport {
    /// Entries the server accepted
    pub succeeded: usize,
    /// Ids of entries that stayed unsynced
    pub failed: Vec<String>,
}

impl SyncReport {
    pub fn attempted(&self) -> usize {
        self.succeeded + self.failed.len()
    }

    pub fn all_succeeded(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Drives staged entries to the remote book
pub struct SyncReconciler {
    staging: StagingStore,
    api: Arc<dyn EntryApi>,
}

impl SyncReconciler {
    pub fn new(staging: StagingStore, api: Arc<dyn EntryApi>) -> Self {
        Self { staging, api }
    }

    pub fn staging(&self) -> &StagingStore {
        &self.staging
    }

    /// Submit one entry
    ///
    /// On a success code the entry is flagged synced. Any other code or a
    /// transport failure leaves the entry untouched and is returned.
    pub async fn sync_one(&self, entry: &LocalEntry, target: &SyncTarget) -> Result<(), ApiError> {
        let body = target.request_body(&entry.payload);
        let response = self.api.create_entry(target, &body).await?;

        if !response.is_success() {
            return Err(ApiError::rejected(response.code, response.message));
        }

        if self.staging.mark_synced(&entry.id).await.is_none() {
            tracing::warn!(
                entry_id = %entry.id,
                "server accepted entry but it could not be flagged locally; it will be sent again"
            );
        }

        tracing::debug!(entry_id = %entry.id, book_id = %target.book_id, "entry synced");
        Ok(())
    }

    /// Submit every entry in order, continuing past failures
    pub async fn sync_all(&self, entries: &[LocalEntry], target: &SyncTarget) -> SyncReport {
        let mut report = SyncReport::default();

        for entry in entries {
            match self.sync_one(entry, target).await {
                Ok(()) => report.succeeded += 1,
                Err(e) => {
                    tracing::warn!(entry_id = %entry.id, error = %e, "entry sync failed");
                    report.failed.push(entry.id.clone());
                }
            }
        }

        tracing::info!(
            book_id = %target.book_id,
            succeeded = report.succeeded,
            failed = report.failed.len(),
            "sync batch finished"
        );
        report
    }

    /// Sync everything currently unsynced and record the sync summary
    ///
    /// Fails only when the unsynced entries cannot be read.
    pub async fn sync_pending(&self, target: &SyncTarget) -> Result<SyncReport, SyncError> {
        let pending = self.staging.get_unsynced().await.map_err(|e| {
            tracing::error!(error = %e, "failed to read unsynced entries");
            e
        })?;

        let report = self.sync_all(&pending, target).await;
        self.staging.record_sync(Utc::now()).await;
        Ok(report)
    }
}
