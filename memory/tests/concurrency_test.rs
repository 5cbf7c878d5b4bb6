//! Concurrent writers against one in-memory database.

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

use eventhub_core::prelude::*;
use eventhub_memory::InMemoryDatabase;
use std::collections::BTreeSet;
use std::sync::Arc;

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_inserts_get_distinct_ids() {
    let db = Arc::new(InMemoryDatabase::new());

    let handles: Vec<_> = (0..64)
        .map(|n| {
            let db = Arc::clone(&db);
            tokio::spawn(async move {
                let mut changes = ChangeSet::new();
                changes.add(User {
                    name: Some(format!("user {n}")),
                    ..User::default()
                });
                match db.users().save(changes).await.unwrap() {
                    SaveOutcome::Committed(stored) => stored[0].id,
                    other => panic!("insert should commit, got {other:?}"),
                }
            })
        })
        .collect();

    let mut ids = BTreeSet::new();
    for handle in handles {
        ids.insert(handle.await.expect("task should not panic"));
    }

    assert_eq!(ids.len(), 64);
    assert_eq!(ids.first(), Some(&RecordId::new(1)));
    assert_eq!(ids.last(), Some(&RecordId::new(64)));
    assert_eq!(db.users().list().await.unwrap().len(), 64);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn racing_tracked_updates_commit_exactly_once() {
    let db = Arc::new(InMemoryDatabase::new());
    let mut changes = ChangeSet::new();
    changes.add(Category::new("Tecnologia"));
    assert!(db.categories().save(changes).await.unwrap().is_committed());

    let read = db
        .categories()
        .find(RecordId::new(1))
        .await
        .unwrap()
        .expect("seeded row");

    let handles: Vec<_> = ["Esportes", "Cinema", "Teatro", "Música"]
        .into_iter()
        .map(|name| {
            let db = Arc::clone(&db);
            let version = read.version;
            tokio::spawn(async move {
                let mut changes = ChangeSet::new();
                changes.update_tracked(Category::new(name).with_id(RecordId::new(1)), version);
                db.categories().save(changes).await.unwrap()
            })
        })
        .collect();

    let mut committed = 0;
    let mut conflicts = 0;
    for handle in handles {
        match handle.await.expect("task should not panic") {
            SaveOutcome::Committed(_) => committed += 1,
            SaveOutcome::ConcurrencyConflict { .. } => conflicts += 1,
            SaveOutcome::NotFound(id) => panic!("row {id} should exist"),
        }
    }

    assert_eq!(committed, 1);
    assert_eq!(conflicts, 3);
    let current = db.categories().find(RecordId::new(1)).await.unwrap().unwrap();
    assert_eq!(current.version, read.version.next());
}
