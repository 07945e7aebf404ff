//! # Bookkeeping Client Core
//!
//! Everything the client needs to record transactions offline and push
//! them to the server later.
//!
//! ## Key Components
//!
//! - `config.rs`: resolved client configuration
//! - `local_db`: key-value persistence (SQLite or memory)
//! - `offline`: the staging store and its entries
//! - `sync`: the reconciler and the remote entry API

pub mod config;
pub mod local_db;
pub mod offline;
pub mod sync;

pub use config::Config;
pub use local_db::{KeyValueStore, LocalDatabase, MemoryStore};
pub use offline::{EntryPatch, LocalEntry, Payload, StagingStore, SyncStatistics};
pub use sync::{EntryApi, HttpEntryApi, SyncReconciler, SyncReport, SyncTarget};
