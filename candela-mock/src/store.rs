use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use async_trait::async_trait;
use candela_core::RawDataStore;
use candela_core::types::{CandelaError, Entry};
use candela_store::MemoryStore;
use chrono::{DateTime, Utc};

/// In-memory store with injectable failures and call counters, for
/// exercising the reconciliation pipeline's error paths.
#[derive(Default)]
pub struct InstrumentedStore {
    inner: MemoryStore,
    fail_reads: AtomicBool,
    fail_writes: AtomicBool,
    read_calls: AtomicUsize,
    write_calls: AtomicUsize,
}

impl InstrumentedStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Make subsequent `get_range` calls fail.
    pub fn fail_reads(&self, yes: bool) {
        self.fail_reads.store(yes, Ordering::SeqCst);
    }

    /// Make subsequent `save_bulk` calls fail.
    pub fn fail_writes(&self, yes: bool) {
        self.fail_writes.store(yes, Ordering::SeqCst);
    }

    /// Number of `get_range` calls made so far.
    pub fn read_calls(&self) -> usize {
        self.read_calls.load(Ordering::SeqCst)
    }

    /// Number of `save_bulk` calls made so far.
    pub fn write_calls(&self) -> usize {
        self.write_calls.load(Ordering::SeqCst)
    }

    /// Pre-populate the store without touching the counters or failure
    /// flags.
    ///
    /// # Panics
    /// Never panics; the inner memory store is infallible.
    pub async fn seed(&self, exchange: &str, coin: &str, entries: &[Entry]) {
        self.inner
            .save_bulk(exchange, coin, entries)
            .await
            .expect("memory store save cannot fail");
    }
}

#[async_trait]
impl RawDataStore for InstrumentedStore {
    async fn get_range(
        &self,
        exchange: &str,
        coin: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<Entry>, CandelaError> {
        self.read_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(CandelaError::storage("get_range", "injected read failure"));
        }
        self.inner.get_range(exchange, coin, start, end).await
    }

    async fn save_bulk(
        &self,
        exchange: &str,
        coin: &str,
        entries: &[Entry],
    ) -> Result<(), CandelaError> {
        self.write_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(CandelaError::storage("save_bulk", "injected write failure"));
        }
        self.inner.save_bulk(exchange, coin, entries).await
    }

    async fn latest_timestamp(
        &self,
        exchange: &str,
        coin: &str,
    ) -> Result<Option<DateTime<Utc>>, CandelaError> {
        self.inner.latest_timestamp(exchange, coin).await
    }

    async fn exists(&self, exchange: &str, coin: &str) -> Result<bool, CandelaError> {
        self.inner.exists(exchange, coin).await
    }
}
