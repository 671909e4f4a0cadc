//! Data model for the reconciliation pipeline, plus re-exports of the
//! foundational types from `candela-types`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub use candela_types::{
    CandelaConfig, CandelaError, ExchangeKey, StorageBackend, StorageConfig, ThrottleConfig,
};

/// One persisted or fetched data point.
///
/// At most one entry exists per `(exchange, coin, ts)` key; writes to an
/// existing key overwrite it. The payload is schema-flexible; see
/// [`crate::record::OhlcvRecord`] for the typed candle shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entry {
    /// Exchange the data point belongs to.
    pub exchange: String,
    /// Coin symbol the data point belongs to.
    pub coin: String,
    /// Grid timestamp of the data point.
    pub ts: DateTime<Utc>,
    /// Structured payload.
    pub payload: serde_json::Value,
}

impl Entry {
    /// Construct an entry.
    pub fn new(
        exchange: impl Into<String>,
        coin: impl Into<String>,
        ts: DateTime<Utc>,
        payload: serde_json::Value,
    ) -> Self {
        Self {
            exchange: exchange.into(),
            coin: coin.into(),
            ts,
            payload,
        }
    }
}

/// A maximal contiguous run of missing grid points, half-open `[start, end)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GapRange {
    /// First missing grid point.
    pub start: DateTime<Utc>,
    /// Exclusive end of the run.
    pub end: DateTime<Utc>,
}

impl GapRange {
    /// Construct a gap range. `start` must precede `end`.
    #[must_use]
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        debug_assert!(start < end, "gap range must be non-empty");
        Self { start, end }
    }

    /// Whether `ts` falls inside the half-open range.
    #[must_use]
    pub fn contains(&self, ts: DateTime<Utc>) -> bool {
        ts >= self.start && ts < self.end
    }
}

/// Why a gap could not be filled during reconciliation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[non_exhaustive]
pub enum UnfilledCause {
    /// The upstream legitimately has no data for the range (e.g. before the
    /// coin's listing date).
    NoData,
    /// The upstream call failed with a classified error.
    Upstream(CandelaError),
}

/// A gap (or gap sub-range) that remains unfilled after reconciliation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnfilledGap {
    /// The unfilled range.
    pub range: GapRange,
    /// Why it stayed unfilled.
    pub cause: UnfilledCause,
}

impl UnfilledGap {
    /// An unfilled gap caused by an empty upstream response.
    #[must_use]
    pub const fn no_data(range: GapRange) -> Self {
        Self {
            range,
            cause: UnfilledCause::NoData,
        }
    }

    /// An unfilled gap caused by an upstream failure.
    #[must_use]
    pub const fn upstream(range: GapRange, error: CandelaError) -> Self {
        Self {
            range,
            cause: UnfilledCause::Upstream(error),
        }
    }
}

/// Outcome of reconciling one chunk: the merged entries plus the conditions
/// that apply to them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct MergedResult {
    /// Entries ascending by timestamp, deduplicated by timestamp.
    pub entries: Vec<Entry>,
    /// Gap sub-ranges that could not be filled, ascending.
    pub unfilled: Vec<UnfilledGap>,
    /// A persistence failure for the freshly fetched entries, if one
    /// occurred. The entries themselves are still present above.
    pub write_failure: Option<CandelaError>,
}

impl MergedResult {
    /// True when every grid point was served and persistence succeeded.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.unfilled.is_empty() && self.write_failure.is_none()
    }
}
