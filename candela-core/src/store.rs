use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::types::{CandelaError, Entry};

/// Durable key-addressed storage of entries keyed by `(exchange, coin, ts)`.
///
/// Implementations must uphold two contracts the reconciliation engine
/// depends on without re-validating:
///
/// - `get_range` returns entries already deduplicated by timestamp and
///   sorted ascending.
/// - `save_bulk` is an idempotent upsert-by-timestamp and must tolerate
///   overlapping or duplicate calls under concurrent writers.
#[async_trait]
pub trait RawDataStore: Send + Sync {
    /// Read all entries with `start <= ts < end`, ascending, deduplicated.
    ///
    /// # Errors
    /// Returns `CandelaError::Storage` on read failure.
    async fn get_range(
        &self,
        exchange: &str,
        coin: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<Entry>, CandelaError>;

    /// Upsert the given entries by timestamp. Repeating the call with the
    /// same input produces the same stored state.
    ///
    /// # Errors
    /// Returns `CandelaError::Storage` on write failure.
    async fn save_bulk(
        &self,
        exchange: &str,
        coin: &str,
        entries: &[Entry],
    ) -> Result<(), CandelaError>;

    /// The most recent stored timestamp for the key, if any.
    ///
    /// # Errors
    /// Returns `CandelaError::Storage` on read failure.
    async fn latest_timestamp(
        &self,
        exchange: &str,
        coin: &str,
    ) -> Result<Option<DateTime<Utc>>, CandelaError>;

    /// Whether any data exists for the key.
    ///
    /// # Errors
    /// Returns `CandelaError::Storage` on read failure.
    async fn exists(&self, exchange: &str, coin: &str) -> Result<bool, CandelaError>;
}
