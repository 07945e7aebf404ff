//! # Local Entries
//!
//! One staged bookkeeping transaction and the patch type used to edit it.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Opaque transaction body (amount, category, note, ...)
pub type Payload = serde_json::Map<String, serde_json::Value>;

/// Length of the random part of a generated id
const ID_SUFFIX_LEN: usize = 10;

/// A transaction recorded locally, waiting for or done with remote sync
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LocalEntry {
    /// Locally generated id, never changed after creation
    pub id: String,
    /// Transaction body
    pub payload: Payload,
    /// Whether the server has accepted this entry
    pub synced: bool,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
    /// Timestamp of the last mutation
    pub updated_at: DateTime<Utc>,
}

impl LocalEntry {
    /// Create an unsynced entry stamped with `now`
    pub fn new(id: String, payload: Payload, now: DateTime<Utc>) -> Self {
        Self {
            id,
            payload,
            synced: false,
            created_at: now,
            updated_at: now,
        }
    }

    /// Apply a patch and refresh `updated_at`
    pub fn apply(&mut self, patch: EntryPatch, now: DateTime<Utc>) {
        if let Some(payload) = patch.payload {
            self.payload = payload;
        }
        if patch.mark_synced {
            self.synced = true;
        }
        self.updated_at = now;
    }
}

/// Fields to change on an existing entry
///
/// The synced flag can only be raised; there is no way to express
/// `synced = false`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EntryPatch {
    payload: Option<Payload>,
    mark_synced: bool,
}

impl EntryPatch {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the whole payload
    pub fn payload(mut self, payload: Payload) -> Self {
        self.payload = Some(payload);
        self
    }

    /// Flag the entry as accepted by the server
    pub fn synced(mut self) -> Self {
        self.mark_synced = true;
        self
    }
}

/// Timestamp (hex millis) followed by a random suffix
pub fn generate_id(now: DateTime<Utc>) -> String {
    let random = Uuid::new_v4().simple().to_string();
    format!("{:x}{}", now.timestamp_millis(), &random[..ID_SUFFIX_LEN])
}
