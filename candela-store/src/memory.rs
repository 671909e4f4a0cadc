use std::collections::{BTreeMap, HashMap};

use async_trait::async_trait;
use candela_core::RawDataStore;
use candela_core::types::{CandelaError, Entry};
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;

type Series = BTreeMap<DateTime<Utc>, Entry>;

/// Process-local in-memory store.
///
/// Entries live in one ordered map per `(exchange, coin)` key, so the
/// ordering and deduplication guarantees of the store contract are
/// structural rather than enforced per read. Safe under concurrent
/// `save_bulk` calls for overlapping keys.
#[derive(Default)]
pub struct MemoryStore {
    inner: RwLock<HashMap<(String, String), Series>>,
}

impl MemoryStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn key(exchange: &str, coin: &str) -> (String, String) {
        (exchange.to_string(), coin.to_string())
    }
}

#[async_trait]
impl RawDataStore for MemoryStore {
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
        let guard = self.inner.read().await;
        Ok(guard
            .get(&Self::key(exchange, coin))
            .map(|series| series.range(start..end).map(|(_, e)| e.clone()).collect())
            .unwrap_or_default())
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
        let mut guard = self.inner.write().await;
        let series = guard.entry(Self::key(exchange, coin)).or_default();
        for e in entries {
            series.insert(e.ts, e.clone());
        }
        Ok(())
    }

    async fn latest_timestamp(
        &self,
        exchange: &str,
        coin: &str,
    ) -> Result<Option<DateTime<Utc>>, CandelaError> {
        let guard = self.inner.read().await;
        Ok(guard
            .get(&Self::key(exchange, coin))
            .and_then(|series| series.keys().next_back().copied()))
    }

    async fn exists(&self, exchange: &str, coin: &str) -> Result<bool, CandelaError> {
        let guard = self.inner.read().await;
        Ok(guard
            .get(&Self::key(exchange, coin))
            .is_some_and(|series| !series.is_empty()))
    }
}
