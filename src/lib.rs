//! tallybook - Main Library
//!
//! tallybook is the offline core of a personal bookkeeping client. Transactions
//! are recorded locally first and pushed to the bookkeeping server when the
//! user asks for a sync.
//!
//! # Module Structure
//!
//! - **`shared`** - Error types and application configuration
//!
//! - **`client`** - The bookkeeping client core
//!   - Key-value persistence on SQLite (`local_db`)
//!   - Staging store for local entries (`offline`)
//!   - Reconciler and remote entry API (`sync`)
//!
//! # Usage
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use tallybook::client::{Config, HttpEntryApi, LocalDatabase, StagingStore, SyncReconciler};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = Config::load(None)?;
//! let db = LocalDatabase::open(config.db_path()).await?;
//! let staging = StagingStore::new(Arc::new(db));
//! let reconciler = SyncReconciler::new(staging, Arc::new(HttpEntryApi::from_config(&config)?));
//!
//! let report = reconciler.sync_pending(&config.target()?).await?;
//! println!("synced {}", report.succeeded);
//! # Ok(())
//! # }
//! ```
//!
//! # Known Limitations
//!
//! - The staging collection is saved as a whole on every change; two
//!   overlapping writers can lose one write
//! - Delivery is at-least-once; the server may receive an entry twice if
//!   the client stops between a successful submit and the local flag

/// Shared types: errors and configuration
pub mod shared;

/// Bookkeeping client core
pub mod client;
