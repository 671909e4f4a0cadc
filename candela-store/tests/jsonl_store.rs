use std::sync::Arc;

use candela_core::RawDataStore;
use candela_core::types::{CandelaError, Entry, StorageBackend, StorageConfig};
use candela_store::{JsonlStore, build_store, storage_stem};
use chrono::{DateTime, Utc};
use serde_json::json;

fn ts(minutes: i64) -> DateTime<Utc> {
    DateTime::from_timestamp(minutes * 60, 0).expect("valid timestamp")
}

fn entry(minutes: i64, tag: &str) -> Entry {
    Entry::new("kraken", "btc/usdt", ts(minutes), json!({ "tag": tag }))
}

#[tokio::test]
async fn round_trips_entries_through_files() {
    let dir = tempfile::tempdir().expect("tempdir");
    let store = JsonlStore::new(dir.path().to_path_buf());

    store
        .save_bulk("kraken", "btc/usdt", &[entry(10, "b"), entry(0, "a")])
        .await
        .expect("save");

    let got = store
        .get_range("kraken", "btc/usdt", ts(0), ts(20))
        .await
        .expect("read");
    assert_eq!(got.len(), 2);
    assert_eq!(got[0].payload["tag"], "a");
    assert_eq!(got[1].payload["tag"], "b");
}

#[tokio::test]
async fn files_land_under_the_normalized_stem() {
    let dir = tempfile::tempdir().expect("tempdir");
    let store = JsonlStore::new(dir.path().to_path_buf());

    store
        .save_bulk("Kraken", "btc/usdt", &[entry(0, "a")])
        .await
        .expect("save");

    let expected = dir
        .path()
        .join(storage_stem("Kraken", "btc/usdt"))
        .with_extension("jsonl");
    assert!(expected.is_file(), "missing {}", expected.display());
}

#[tokio::test]
async fn re_saving_overwrites_instead_of_appending() {
    let dir = tempfile::tempdir().expect("tempdir");
    let store = JsonlStore::new(dir.path().to_path_buf());

    store
        .save_bulk("kraken", "btc/usdt", &[entry(0, "original")])
        .await
        .expect("save");
    store
        .save_bulk("kraken", "btc/usdt", &[entry(0, "replacement")])
        .await
        .expect("save again");

    let got = store
        .get_range("kraken", "btc/usdt", ts(0), ts(5))
        .await
        .expect("read");
    assert_eq!(got.len(), 1);
    assert_eq!(got[0].payload["tag"], "replacement");
}

#[tokio::test]
async fn missing_files_read_as_empty() {
    let dir = tempfile::tempdir().expect("tempdir");
    let store = JsonlStore::new(dir.path().to_path_buf());

    assert!(store
        .get_range("kraken", "btc/usdt", ts(0), ts(10))
        .await
        .expect("read")
        .is_empty());
    assert!(!store.exists("kraken", "btc/usdt").await.expect("probe"));
    assert_eq!(
        store
            .latest_timestamp("kraken", "btc/usdt")
            .await
            .expect("probe"),
        None
    );
}

#[tokio::test]
async fn corrupt_lines_surface_as_storage_errors() {
    let dir = tempfile::tempdir().expect("tempdir");
    let store = JsonlStore::new(dir.path().to_path_buf());

    store
        .save_bulk("kraken", "btc/usdt", &[entry(0, "a")])
        .await
        .expect("save");
    let file = dir
        .path()
        .join(storage_stem("kraken", "btc/usdt"))
        .with_extension("jsonl");
    std::fs::write(&file, "not json\n").expect("corrupt");

    match store.get_range("kraken", "btc/usdt", ts(0), ts(10)).await {
        Err(CandelaError::Storage { op, .. }) => assert_eq!(op, "get_range"),
        other => panic!("expected Storage error, got {other:?}"),
    }
}

#[tokio::test]
async fn concurrent_overlapping_saves_converge() {
    let dir = tempfile::tempdir().expect("tempdir");
    let store = Arc::new(JsonlStore::new(dir.path().to_path_buf()));

    let mut tasks = Vec::new();
    for i in 0..4 {
        let store = Arc::clone(&store);
        tasks.push(tokio::spawn(async move {
            // Overlapping windows: [0, 10) and [5, 15).
            let offset = if i % 2 == 0 { 0 } else { 5 };
            let batch: Vec<Entry> = (offset..offset + 10).map(|m| entry(m, "x")).collect();
            store.save_bulk("kraken", "btc/usdt", &batch).await
        }));
    }
    for t in tasks {
        t.await.expect("join").expect("save");
    }

    let got = store
        .get_range("kraken", "btc/usdt", ts(0), ts(15))
        .await
        .expect("read");
    assert_eq!(got.len(), 15);
}

#[tokio::test]
async fn factory_builds_the_selected_backend() {
    let dir = tempfile::tempdir().expect("tempdir");

    let memory = build_store(&StorageConfig {
        backend: StorageBackend::Memory,
    })
    .expect("memory backend");
    memory
        .save_bulk("kraken", "BTC", &[entry(0, "a")])
        .await
        .expect("save");
    assert!(memory.exists("kraken", "BTC").await.expect("probe"));

    let file = build_store(&StorageConfig {
        backend: StorageBackend::LocalFile {
            root: dir.path().to_path_buf(),
        },
    })
    .expect("file backend");
    file.save_bulk("kraken", "BTC", &[entry(0, "a")])
        .await
        .expect("save");
    assert!(file.exists("kraken", "BTC").await.expect("probe"));
}
