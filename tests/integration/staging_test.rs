//! Staging store against the SQLite backend

use crate::common::{labeled, sqlite_staging};
use pretty_assertions::assert_eq;
use tallybook::client::EntryPatch;

#[tokio::test]
async fn test_lifecycle_on_sqlite() {
    let (_dir, store) = sqlite_staging().await;

    let a = crate::assert_ok!(store.add(labeled("A")).await);
    let b = crate::assert_ok!(store.add(labeled("B")).await);
    let c = crate::assert_ok!(store.add(labeled("C")).await);
    crate::assert_ids!(store.get_all().await.unwrap(), [a.id, b.id, c.id]);

    let edited = store
        .update(&b.id, EntryPatch::new().payload(labeled("B2")))
        .await
        .expect("entry exists");
    assert_eq!(edited.payload["label"], "B2");
    assert_eq!(edited.created_at, b.created_at);

    store.mark_synced(&a.id).await.expect("entry exists");
    let stats = store.statistics().await.unwrap();
    assert_eq!((stats.total, stats.synced, stats.unsynced), (3, 1, 2));

    assert!(store.delete(&c.id).await);
    assert!(!store.delete(&c.id).await);

    assert_eq!(store.cleanup_synced().await, 1);
    crate::assert_ids!(store.get_unsynced().await.unwrap(), [b.id]);

    assert!(store.clear_all().await);
    assert!(store.get_all().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_ids_stay_unique_under_rapid_adds() {
    let (_dir, store) = sqlite_staging().await;

    for i in 0..100 {
        store.add(labeled(&format!("e{i}"))).await.unwrap();
    }

    let mut ids: Vec<String> = store
        .get_all()
        .await
        .unwrap()
        .into_iter()
        .map(|entry| entry.id)
        .collect();
    ids.sort();
    ids.dedup();
    assert_eq!(ids.len(), 100);
}
