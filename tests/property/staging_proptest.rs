//! Property-based tests for the staging store

use crate::common::{labeled, memory_staging, Behavior, KeyedApi};
use proptest::prelude::*;
use std::sync::Arc;
use tallybook::client::{LocalEntry, SyncReconciler, SyncTarget};

#[derive(Debug, Clone)]
enum Op {
    Add,
    Delete(usize),
    MarkSynced(usize),
    Cleanup,
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        3 => Just(Op::Add),
        1 => any::<usize>().prop_map(Op::Delete),
        2 => any::<usize>().prop_map(Op::MarkSynced),
        1 => Just(Op::Cleanup),
    ]
}

proptest! {
    #[test]
    fn test_length_and_filter_invariants(ops in prop::collection::vec(op_strategy(), 0..40)) {
        tokio_test::block_on(async {
            let store = memory_staging();
            let mut expected_len = 0usize;
            let mut synced_ids: Vec<String> = Vec::new();

            for op in ops {
                let all = store.get_all().await.unwrap();
                match op {
                    Op::Add => {
                        store.add(labeled("x")).await.unwrap();
                        expected_len += 1;
                    }
                    Op::Delete(i) if !all.is_empty() => {
                        let id = &all[i % all.len()].id;
                        assert!(store.delete(id).await);
                        synced_ids.retain(|synced| synced != id);
                        expected_len -= 1;
                    }
                    Op::MarkSynced(i) if !all.is_empty() => {
                        let id = all[i % all.len()].id.clone();
                        store.mark_synced(&id).await.unwrap();
                        if !synced_ids.contains(&id) {
                            synced_ids.push(id);
                        }
                    }
                    Op::Cleanup => {
                        let removed = store.cleanup_synced().await;
                        assert_eq!(removed, synced_ids.len());
                        expected_len -= removed;
                        synced_ids.clear();
                    }
                    _ => {}
                }

                let all = store.get_all().await.unwrap();
                assert_eq!(all.len(), expected_len);

                // Synced entries stay synced until removed
                for id in &synced_ids {
                    let entry = all.iter().find(|entry| &entry.id == id).unwrap();
                    assert!(entry.synced);
                }

                let filtered: Vec<LocalEntry> =
                    all.iter().filter(|entry| !entry.synced).cloned().collect();
                assert_eq!(store.get_unsynced().await.unwrap(), filtered);

                let mut ids: Vec<&str> = all.iter().map(|entry| entry.id.as_str()).collect();
                ids.sort_unstable();
                ids.dedup();
                assert_eq!(ids.len(), all.len());
            }
        });
    }

    #[test]
    fn test_sync_all_marks_exactly_the_accepted(accepted in prop::collection::vec(any::<bool>(), 0..20)) {
        tokio_test::block_on(async {
            let api = Arc::new(KeyedApi::new());
            let reconciler = SyncReconciler::new(memory_staging(), api.clone());
            let target = SyncTarget::new("http://books.test", "household");

            let mut entries = Vec::new();
            for (i, ok) in accepted.iter().enumerate() {
                let label = format!("e{i}");
                if !ok {
                    api.set(&label, Behavior::Code(500));
                }
                entries.push(reconciler.staging().add(labeled(&label)).await.unwrap());
            }

            let report = reconciler.sync_all(&entries, &target).await;
            let expected_ok = accepted.iter().filter(|ok| **ok).count();
            assert_eq!(report.succeeded, expected_ok);

            let expected_failed: Vec<String> = entries
                .iter()
                .zip(&accepted)
                .filter(|(_, ok)| !**ok)
                .map(|(entry, _)| entry.id.clone())
                .collect();
            assert_eq!(report.failed, expected_failed.clone());

            let unsynced: Vec<String> = reconciler
                .staging()
                .get_unsynced()
                .await
                .unwrap()
                .into_iter()
                .map(|entry| entry.id)
                .collect();
            assert_eq!(unsynced, expected_failed);
        });
    }
}
