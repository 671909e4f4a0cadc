use std::collections::BTreeMap;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use candela_core::RawDataStore;
use candela_core::types::{CandelaError, Entry};
use chrono::{DateTime, Utc};
use tokio::sync::Mutex;

use crate::path::storage_stem;

type Series = BTreeMap<DateTime<Utc>, Entry>;

/// File-backed store keeping one JSON-lines file per `(exchange, coin)` key
/// under a root directory (`<root>/<exchange>/<COIN>.jsonl`).
///
/// Upserts are read-merge-rewrite: the whole series is loaded, merged by
/// timestamp, and replaced through a temp-file rename. Writers are
/// serialized by an internal async mutex, which keeps concurrent
/// overlapping `save_bulk` calls within the idempotent-upsert contract.
pub struct JsonlStore {
    root: PathBuf,
    write_lock: Mutex<()>,
}

impl JsonlStore {
    /// Create a store rooted at the given directory. The directory is
    /// created lazily on first write.
    #[must_use]
    pub fn new(root: PathBuf) -> Self {
        Self {
            root,
            write_lock: Mutex::new(()),
        }
    }

    /// Root directory of this store.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn file_path(&self, exchange: &str, coin: &str) -> PathBuf {
        let mut path = self.root.join(storage_stem(exchange, coin));
        path.set_extension("jsonl");
        path
    }

    async fn load_series(path: &Path, op: &str) -> Result<Series, CandelaError> {
        let text = match tokio::fs::read_to_string(path).await {
            Ok(text) => text,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Series::new()),
            Err(e) => return Err(CandelaError::storage(op, e.to_string())),
        };
        let mut series = Series::new();
        for line in text.lines().filter(|l| !l.trim().is_empty()) {
            let entry: Entry = serde_json::from_str(line).map_err(|e| {
                CandelaError::storage(op, format!("corrupt line in {}: {e}", path.display()))
            })?;
            series.insert(entry.ts, entry);
        }
        Ok(series)
    }

    async fn replace_file(path: &Path, series: &Series) -> Result<(), CandelaError> {
        let op = "save_bulk";
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| CandelaError::storage(op, e.to_string()))?;
        }
        let mut buf = String::new();
        for entry in series.values() {
            let line = serde_json::to_string(entry)
                .map_err(|e| CandelaError::storage(op, e.to_string()))?;
            buf.push_str(&line);
            buf.push('\n');
        }
        let tmp = path.with_extension("jsonl.tmp");
        tokio::fs::write(&tmp, buf.as_bytes())
            .await
            .map_err(|e| CandelaError::storage(op, e.to_string()))?;
        tokio::fs::rename(&tmp, path)
            .await
            .map_err(|e| CandelaError::storage(op, e.to_string()))?;
        Ok(())
    }
}

#[async_trait]
impl RawDataStore for JsonlStore {
    async fn get_range(
        &self,
        exchange: &str,
        coin: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<Entry>, CandelaError> {
        if start >= end {
            return Ok(Vec::new());
        }
        let series = Self::load_series(&self.file_path(exchange, coin), "get_range").await?;
        Ok(series.range(start..end).map(|(_, e)| e.clone()).collect())
    }

    async fn save_bulk(
        &self,
        exchange: &str,
        coin: &str,
        entries: &[Entry],
    ) -> Result<(), CandelaError> {
        if entries.is_empty() {
            return Ok(());
        }
        let path = self.file_path(exchange, coin);
        let _guard = self.write_lock.lock().await;
        let mut series = Self::load_series(&path, "save_bulk").await?;
        for e in entries {
            series.insert(e.ts, e.clone());
        }
        #[cfg(feature = "tracing")]
        tracing::debug!(
            exchange,
            coin,
            upserted = entries.len(),
            total = series.len(),
            "rewriting series file"
        );
        Self::replace_file(&path, &series).await
    }

    async fn latest_timestamp(
        &self,
        exchange: &str,
        coin: &str,
    ) -> Result<Option<DateTime<Utc>>, CandelaError> {
        let series =
            Self::load_series(&self.file_path(exchange, coin), "latest_timestamp").await?;
        Ok(series.keys().next_back().copied())
    }

    async fn exists(&self, exchange: &str, coin: &str) -> Result<bool, CandelaError> {
        let series = Self::load_series(&self.file_path(exchange, coin), "exists").await?;
        Ok(!series.is_empty())
    }
}
