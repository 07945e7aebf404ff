//! # Staging Store
//!
//! Owns the collection of locally recorded entries. The collection is one
//! JSON array under a single key; every operation reads the whole array
//! from storage, changes it, and writes the whole array back.
//!
//! ## Failure Handling
//!
//! - Corrupt stored JSON is logged and read as an empty collection
//! - Failed writes are logged and the call reports that nothing happened
//!   (`None`, `false` or `0`); `add` returns the error instead
//! - Unknown ids on update/delete are silent no-ops
//!
//! Two overlapping read-modify-write calls can lose one of the writes (the
//! last full-collection save wins). Callers are expected to drive the store
//! from one task at a time.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use tallybook::client::local_db::MemoryStore;
//! use tallybook::client::offline::{Payload, StagingStore};
//!
//! # async fn example() -> Result<(), tallybook::shared::StagingError> {
//! let store = StagingStore::new(Arc::new(MemoryStore::new()));
//! let entry = store.add(Payload::new()).await?;
//! store.mark_synced(&entry.id).await;
//! assert_eq!(store.cleanup_synced().await, 1);
//! # Ok(())
//! # }
//! ```

use crate::client::local_db::KeyValueStore;
use crate::client::offline::entry::{generate_id, EntryPatch, LocalEntry, Payload};
use crate::client::offline::stats::{SyncStatistics, SyncStatusSummary};
use crate::shared::error::StagingError;
use chrono::{DateTime, Utc};
use std::collections::HashSet;
use std::sync::Arc;

/// Key holding the JSON array of entries
pub const FLOWS_KEY: &str = "local_flows";
/// Key holding the advisory sync summary
pub const STATUS_KEY: &str = "sync_status";

/// Result type alias for staging operations
pub type Result<T> = std::result::Result<T, StagingError>;

/// Exclusive owner of the persisted entry collection
#[derive(Clone)]
pub struct StagingStore {
    kv: Arc<dyn KeyValueStore>,
}

impl std::fmt::Debug for StagingStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StagingStore").finish_non_exhaustive()
    }
}

impl StagingStore {
    pub fn new(kv: Arc<dyn KeyValueStore>) -> Self {
        Self { kv }
    }

    /// Record a new unsynced entry
    pub async fn add(&self, payload: Payload) -> Result<LocalEntry> {
        let mut entries = self.load().await?;
        let now = Utc::now();
        let id = Self::unique_id(&entries, now);
        let entry = LocalEntry::new(id, payload, now);

        entries.push(entry.clone());
        if let Err(e) = self.save(&entries).await {
            tracing::error!(entry_id = %entry.id, error = %e, "failed to persist new entry");
            return Err(e);
        }

        tracing::debug!(entry_id = %entry.id, "entry staged");
        Ok(entry)
    }

    /// All entries in insertion order, read from storage
    pub async fn get_all(&self) -> Result<Vec<LocalEntry>> {
        self.load().await
    }

    /// Look up one entry
    pub async fn get(&self, id: &str) -> Result<Option<LocalEntry>> {
        let entries = self.load().await?;
        Ok(entries.into_iter().find(|entry| entry.id == id))
    }

    /// Entries the server has not accepted yet, in insertion order
    pub async fn get_unsynced(&self) -> Result<Vec<LocalEntry>> {
        let entries = self.load().await?;
        Ok(entries.into_iter().filter(|entry| !entry.synced).collect())
    }

    /// Apply a patch to an entry
    ///
    /// Returns the updated entry, or `None` when the id is unknown or the
    /// change could not be persisted.
    pub async fn update(&self, id: &str, patch: EntryPatch) -> Option<LocalEntry> {
        match self.try_update(id, patch).await {
            Ok(updated) => updated,
            Err(e) => {
                tracing::error!(entry_id = %id, error = %e, "failed to update entry");
                None
            }
        }
    }

    async fn try_update(&self, id: &str, patch: EntryPatch) -> Result<Option<LocalEntry>> {
        let mut entries = self.load().await?;
        let Some(entry) = entries.iter_mut().find(|entry| entry.id == id) else {
            tracing::debug!(entry_id = %id, "update of unknown entry ignored");
            return Ok(None);
        };

        entry.apply(patch, Utc::now());
        let updated = entry.clone();
        self.save(&entries).await?;
        Ok(Some(updated))
    }

    /// Flag an entry as accepted by the server
    pub async fn mark_synced(&self, id: &str) -> Option<LocalEntry> {
        self.update(id, EntryPatch::new().synced()).await
    }

    /// Remove an entry
    ///
    /// Returns `true` when an entry was removed and the change persisted.
    /// Deleting an unknown id does nothing.
    pub async fn delete(&self, id: &str) -> bool {
        let result = async {
            let mut entries = self.load().await?;
            let before = entries.len();
            entries.retain(|entry| entry.id != id);
            if entries.len() == before {
                return Ok(false);
            }
            self.save(&entries).await?;
            Ok::<_, StagingError>(true)
        }
        .await;

        result.unwrap_or_else(|e| {
            tracing::error!(entry_id = %id, error = %e, "failed to delete entry");
            false
        })
    }

    /// Drop every synced entry, returning how many were removed
    pub async fn cleanup_synced(&self) -> usize {
        let result = async {
            let mut entries = self.load().await?;
            let before = entries.len();
            entries.retain(|entry| !entry.synced);
            let removed = before - entries.len();
            if removed > 0 {
                self.save(&entries).await?;
            }
            Ok::<_, StagingError>(removed)
        }
        .await;

        match result {
            Ok(removed) => {
                tracing::info!(removed, "synced entries cleaned up");
                removed
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to clean up synced entries");
                0
            }
        }
    }

    /// Wipe the collection and the sync summary
    pub async fn clear_all(&self) -> bool {
        let result = async {
            self.kv.remove(FLOWS_KEY).await?;
            self.kv.remove(STATUS_KEY).await?;
            Ok::<_, StagingError>(())
        }
        .await;

        match result {
            Ok(()) => {
                tracing::info!("local entries cleared");
                true
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to clear local entries");
                false
            }
        }
    }

    /// Counts derived from the current collection
    pub async fn statistics(&self) -> Result<SyncStatistics> {
        let entries = self.load().await?;
        Ok(SyncStatistics::from_entries(&entries))
    }

    /// Last recorded sync summary, if one is stored and readable
    pub async fn sync_summary(&self) -> Option<SyncStatusSummary> {
        let raw = match self.kv.get(STATUS_KEY).await {
            Ok(raw) => raw?,
            Err(e) => {
                tracing::warn!(error = %e, "failed to read sync summary");
                return None;
            }
        };

        serde_json::from_str(&raw)
            .map_err(|e| tracing::warn!(error = %e, "discarding unreadable sync summary"))
            .ok()
    }

    /// Store a fresh summary stamped with `synced_at`
    pub async fn record_sync(&self, synced_at: DateTime<Utc>) -> Option<SyncStatusSummary> {
        let result = async {
            let stats = self.statistics().await?;
            let summary = SyncStatusSummary::new(stats, Some(synced_at));
            let raw = serde_json::to_string(&summary)?;
            self.kv.set(STATUS_KEY, &raw).await?;
            Ok::<_, StagingError>(summary)
        }
        .await;

        result
            .map_err(|e| tracing::warn!(error = %e, "failed to record sync summary"))
            .ok()
    }

    /// Read the collection; corrupt JSON reads as empty
    async fn load(&self) -> Result<Vec<LocalEntry>> {
        let Some(raw) = self.kv.get(FLOWS_KEY).await? else {
            return Ok(Vec::new());
        };

        match serde_json::from_str(&raw) {
            Ok(entries) => Ok(entries),
            Err(e) => {
                tracing::error!(error = %e, "stored entries are unreadable, treating as empty");
                Ok(Vec::new())
            }
        }
    }

    async fn save(&self, entries: &[LocalEntry]) -> Result<()> {
        let raw = serde_json::to_string(entries)?;
        self.kv.set(FLOWS_KEY, &raw).await?;
        Ok(())
    }

    /// Generate an id not already present in `entries`
    fn unique_id(entries: &[LocalEntry], now: DateTime<Utc>) -> String {
        let taken: HashSet<&str> = entries.iter().map(|entry| entry.id.as_str()).collect();
        loop {
            let id = generate_id(now);
            if !taken.contains(id.as_str()) {
                return id;
            }
        }
    }
}
