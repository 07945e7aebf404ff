//! Staging store fixtures

use serde_json::json;
use std::sync::Arc;
use tallybook::client::{LocalDatabase, MemoryStore, Payload, StagingStore};
use tempfile::TempDir;

/// Body field used by tests to tell entries apart
pub const LABEL_FIELD: &str = "label";

/// Transaction payload tagged with `label`
pub fn labeled(label: &str) -> Payload {
    let mut payload = Payload::new();
    payload.insert(LABEL_FIELD.to_string(), json!(label));
    payload.insert("amount".to_string(), json!(12.5));
    payload.insert("category".to_string(), json!("food"));
    payload
}

/// Staging store over a fresh memory store
pub fn memory_staging() -> StagingStore {
    StagingStore::new(Arc::new(MemoryStore::new()))
}

/// Staging store over a SQLite file inside a temporary directory
///
/// Keep the returned directory alive for as long as the store is used.
pub async fn sqlite_staging() -> (TempDir, StagingStore) {
    let dir = tempfile::tempdir().expect("temp dir");
    let db = LocalDatabase::open(dir.path().join("local.db"))
        .await
        .expect("open local database");
    (dir, StagingStore::new(Arc::new(db)))
}
