//! # Local Database Module
//!
//! Key-value persistence for the staging store. Everything the client keeps
//! locally is a string value under a string key; the staging store layers
//! its JSON collection on top.
//!
//! ## Key Components
//!
//! - `KeyValueStore`: the storage seam (`get`, `set`, `remove`)
//! - `LocalDatabase`: SQLite-backed store used by the application
//! - `memory.rs`: in-process store for tests and throwaway sessions
//!
//! ## Usage
//!
//! ```rust,no_run
//! use tallybook::client::local_db::{KeyValueStore, LocalDatabase};
//!
//! # async fn example() -> Result<(), tallybook::shared::StoreError> {
//! let db = LocalDatabase::open("/tmp/tallybook.db").await?;
//! db.set("greeting", "hello").await?;
//! assert_eq!(db.get("greeting").await?, Some("hello".to_string()));
//! # Ok(())
//! # }
//! ```

pub mod memory;

pub use memory::MemoryStore;

use crate::shared::error::StoreError;
use async_trait::async_trait;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous};
use sqlx::{Row, SqlitePool};
use std::path::Path;

/// Result type for local database operations
pub type Result<T> = std::result::Result<T, StoreError>;

/// Persistent string key-value storage
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Read a value, `None` when the key is absent
    async fn get(&self, key: &str) -> Result<Option<String>>;

    /// Insert or replace a value
    async fn set(&self, key: &str, value: &str) -> Result<()>;

    /// Remove a key; removing an absent key succeeds
    async fn remove(&self, key: &str) -> Result<()>;
}

/// SQLite-backed key-value store
///
/// Manages the SQLite connection pool holding the `kv_store` table.
#[derive(Debug, Clone)]
pub struct LocalDatabase {
    pool: SqlitePool,
}

impl LocalDatabase {
    /// Open or create the local database
    ///
    /// Creates the file and its parent directory if they don't exist and
    /// initializes the schema. Uses WAL mode.
    pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let options = SqliteConnectOptions::new()
            .filename(path)
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .synchronous(SqliteSynchronous::Normal);

        let pool = SqlitePoolOptions::new()
            .max_connections(4)
            .connect_with(options)
            .await?;

        let db = Self { pool };
        db.init_schema().await?;

        tracing::debug!(path = %path.display(), "local database opened");
        Ok(db)
    }

    /// Initialize database schema
    async fn init_schema(&self) -> Result<()> {
        sqlx::query(
            "CREATE TABLE IF NOT EXISTS kv_store (
                key TEXT PRIMARY KEY,
                value TEXT NOT NULL,
                updated_at TEXT NOT NULL
            )",
        )
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    /// Close the pool, waiting for in-flight queries
    pub async fn close(&self) {
        self.pool.close().await;
    }
}

#[async_trait]
impl KeyValueStore for LocalDatabase {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        let row = sqlx::query("SELECT value FROM kv_store WHERE key = ?")
            .bind(key)
            .fetch_optional(&self.pool)
            .await?;

        match row {
            Some(row) => Ok(Some(row.try_get("value")?)),
            None => Ok(None),
        }
    }

    async fn set(&self, key: &str, value: &str) -> Result<()> {
        sqlx::query(
            "INSERT OR REPLACE INTO kv_store (key, value, updated_at)
             VALUES (?, ?, ?)",
        )
        .bind(key)
        .bind(value)
        .bind(chrono::Utc::now().to_rfc3339())
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<()> {
        sqlx::query("DELETE FROM kv_store WHERE key = ?")
            .bind(key)
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}
