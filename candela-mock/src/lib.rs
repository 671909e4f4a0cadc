//! candela-mock
//!
//! Deterministic mock implementations for tests and examples: a
//! [`MockConnector`] serving generated candle fixtures and an
//! [`InstrumentedStore`] with injectable failures and call counters.
//!
//! The connector recognizes a few magic coin names:
//! - `"DELISTED"`: availability probe returns `false`
//! - `"FAIL"`: availability and fetch fail with a classified upstream error
//! - `"RATELIMIT"`: fetch fails with a `RateLimited` error
//! - `"NODATA"`: fetch succeeds with an empty list

use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use candela_core::connector::{ExchangeConnector, HistoryProvider};
use candela_core::types::{CandelaError, Entry};
use chrono::{DateTime, Duration, Utc};

pub mod fixtures;
mod store;

pub use store::InstrumentedStore;

/// Mock connector with deterministic data and forced-failure hooks.
pub struct MockConnector {
    name: &'static str,
    entries: Option<Vec<Entry>>,
    fetch_calls: AtomicUsize,
    availability_calls: AtomicUsize,
}

impl Default for MockConnector {
    fn default() -> Self {
        Self::new()
    }
}

impl MockConnector {
    /// Create a connector named `candela-mock`.
    #[must_use]
    pub const fn new() -> Self {
        Self::named("candela-mock")
    }

    /// Create a connector with a custom registry name.
    #[must_use]
    pub const fn named(name: &'static str) -> Self {
        Self {
            name,
            entries: None,
            fetch_calls: AtomicUsize::new(0),
            availability_calls: AtomicUsize::new(0),
        }
    }

    /// Serve exactly these entries instead of generated fixtures.
    ///
    /// The script is returned verbatim for every fetch, the way a real
    /// upstream may overshoot the requested window; callers own the
    /// clamping.
    #[must_use]
    pub fn with_entries(mut self, entries: Vec<Entry>) -> Self {
        self.entries = Some(entries);
        self
    }

    /// Number of `fetch_range` calls made so far.
    pub fn fetch_calls(&self) -> usize {
        self.fetch_calls.load(Ordering::SeqCst)
    }

    /// Number of `check_availability` calls made so far.
    pub fn availability_calls(&self) -> usize {
        self.availability_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ExchangeConnector for MockConnector {
    fn name(&self) -> &'static str {
        self.name
    }

    fn vendor(&self) -> &'static str {
        "Mock"
    }

    async fn check_availability(&self, coin: &str) -> Result<bool, CandelaError> {
        self.availability_calls.fetch_add(1, Ordering::SeqCst);
        match coin {
            "FAIL" => Err(CandelaError::upstream(
                self.name,
                "forced failure: check_availability",
            )),
            "DELISTED" => Ok(false),
            _ => Ok(true),
        }
    }

    fn as_history_provider(&self) -> Option<&dyn HistoryProvider> {
        Some(self as &dyn HistoryProvider)
    }
}

#[async_trait]
impl HistoryProvider for MockConnector {
    async fn fetch_range(
        &self,
        coin: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        interval: Duration,
    ) -> Result<Vec<Entry>, CandelaError> {
        self.fetch_calls.fetch_add(1, Ordering::SeqCst);
        match coin {
            "FAIL" => Err(CandelaError::upstream_retryable(
                self.name,
                "forced failure: fetch_range",
            )),
            "RATELIMIT" => Err(CandelaError::rate_limited(self.name, 1_000)),
            "NODATA" => Ok(Vec::new()),
            _ => match &self.entries {
                Some(entries) => Ok(entries.clone()),
                None => Ok(fixtures::candles(self.name, coin, start, end, interval)),
            },
        }
    }
}
