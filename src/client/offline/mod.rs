//! # Offline Bookkeeping
//!
//! Transactions recorded while offline are staged locally and stay there,
//! flagged synced or unsynced, until the reconciler pushes them.
//!
//! ## Key Components
//!
//! - `entry.rs`: `LocalEntry` and the `EntryPatch` edit type
//! - `staging.rs`: `StagingStore`, the owner of the persisted collection
//! - `stats.rs`: derived counts and the advisory sync summary

pub mod entry;
pub mod staging;
pub mod stats;

// Re-export main types
pub use entry::{EntryPatch, LocalEntry, Payload};
pub use staging::StagingStore;
pub use stats::{SyncStatistics, SyncStatusSummary};
