//! # Sync Statistics
//!
//! Counts derived from the staging collection, plus the advisory summary
//! written after each batch sync.

use crate::client::offline::LocalEntry;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Counts over the staging collection; never persisted
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SyncStatistics {
    pub total: usize,
    pub synced: usize,
    pub unsynced: usize,
}

impl SyncStatistics {
    pub fn from_entries(entries: &[LocalEntry]) -> Self {
        let total = entries.len();
        let synced = entries.iter().filter(|entry| entry.synced).count();
        Self {
            total,
            synced,
            unsynced: total - synced,
        }
    }
}

/// Cached status shown by the client between syncs
///
/// Advisory only: it can always be rebuilt from the collection, and a
/// missing or corrupt summary is not an error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncStatusSummary {
    pub last_sync_time: Option<DateTime<Utc>>,
    pub total_flows: usize,
    pub synced_flows: usize,
}

impl SyncStatusSummary {
    pub fn new(stats: SyncStatistics, last_sync_time: Option<DateTime<Utc>>) -> Self {
        Self {
            last_sync_time,
            total_flows: stats.total,
            synced_flows: stats.synced,
        }
    }
}
