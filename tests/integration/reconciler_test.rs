//! Reconciler behaviour with a fake remote API

use crate::common::{labeled, memory_staging, Behavior, KeyedApi};
use assert_matches::assert_matches;
use pretty_assertions::assert_eq;
use std::sync::Arc;
use tallybook::client::{SyncReconciler, SyncTarget};
use tallybook::shared::ApiError;

fn target() -> SyncTarget {
    SyncTarget::new("http://books.test", "household")
}

#[tokio::test]
async fn test_partial_failure_scenario() {
    let api = Arc::new(KeyedApi::new());
    let reconciler = SyncReconciler::new(memory_staging(), api.clone());
    let staging = reconciler.staging();

    let a = staging.add(labeled("A")).await.unwrap();
    let b = staging.add(labeled("B")).await.unwrap();
    let c = staging.add(labeled("C")).await.unwrap();

    // A goes through on its own
    crate::assert_ok!(reconciler.sync_one(&a, &target()).await);
    let pending = staging.get_unsynced().await.unwrap();
    crate::assert_ids!(pending, [b.id, c.id]);

    // B cannot reach the server, C is accepted
    api.set("B", Behavior::Unreachable);
    let report = reconciler.sync_all(&pending, &target()).await;
    assert_eq!(report.succeeded, 1);
    assert_eq!(report.failed, vec![b.id.clone()]);
    crate::assert_ids!(staging.get_unsynced().await.unwrap(), [b.id]);

    assert_eq!(staging.cleanup_synced().await, 2);
    crate::assert_ids!(staging.get_all().await.unwrap(), [b.id]);
    assert_eq!(api.submitted_labels(), vec!["A", "B", "C"]);
}

#[tokio::test]
async fn test_failed_entry_is_retried_next_sync() {
    let api = Arc::new(KeyedApi::new());
    let reconciler = SyncReconciler::new(memory_staging(), api.clone());
    reconciler.staging().add(labeled("rent")).await.unwrap();

    api.set("rent", Behavior::Code(503));
    let first = reconciler.sync_pending(&target()).await.unwrap();
    assert_eq!(first.succeeded, 0);
    assert_eq!(first.failed.len(), 1);

    api.set("rent", Behavior::Code(200));
    let second = reconciler.sync_pending(&target()).await.unwrap();
    assert_eq!(second.succeeded, 1);
    assert!(second.all_succeeded());

    let stats = reconciler.staging().statistics().await.unwrap();
    assert_eq!(stats.unsynced, 0);
    assert_eq!(api.submitted_labels(), vec!["rent", "rent"]);
}

#[tokio::test]
async fn test_synced_flag_never_flips_back() {
    let api = Arc::new(KeyedApi::new());
    let reconciler = SyncReconciler::new(memory_staging(), api.clone());
    let entry = reconciler.staging().add(labeled("coffee")).await.unwrap();

    reconciler.sync_one(&entry, &target()).await.unwrap();

    // Resubmitting a stale copy that the server now refuses keeps the flag
    api.set("coffee", Behavior::Code(409));
    assert!(reconciler.sync_one(&entry, &target()).await.is_err());

    let stored = reconciler.staging().get(&entry.id).await.unwrap().unwrap();
    assert!(stored.synced);
}

#[tokio::test]
async fn test_unreachable_server_is_transport_failure() {
    let api = Arc::new(KeyedApi::new());
    let reconciler = SyncReconciler::new(memory_staging(), api.clone());
    let entry = reconciler.staging().add(labeled("fuel")).await.unwrap();

    api.set("fuel", Behavior::Unreachable);
    let result = reconciler.sync_one(&entry, &target()).await;

    assert_matches!(result, Err(ApiError::Transport(ref e)) if e.is_connect());
    assert!(!reconciler.staging().get(&entry.id).await.unwrap().unwrap().synced);
}
