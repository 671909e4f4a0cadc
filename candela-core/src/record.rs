use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::types::{CandelaError, Entry};

/// The typed candle payload served by exchange connectors.
///
/// Connectors may attach provider-specific fields (trade counts, quote
/// volume, ...); those survive round-trips through the flattened `extra`
/// map. Entries remain payload-agnostic; this type is the opt-in view.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OhlcvRecord {
    /// Opening price of the interval.
    pub open: Decimal,
    /// Highest traded price of the interval.
    pub high: Decimal,
    /// Lowest traded price of the interval.
    pub low: Decimal,
    /// Closing price of the interval.
    pub close: Decimal,
    /// Traded base-asset volume of the interval.
    pub volume: Decimal,
    /// Provider-specific extra fields.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl OhlcvRecord {
    /// Construct a record without extra fields.
    #[must_use]
    pub fn new(
        open: Decimal,
        high: Decimal,
        low: Decimal,
        close: Decimal,
        volume: Decimal,
    ) -> Self {
        Self {
            open,
            high,
            low,
            close,
            volume,
            extra: serde_json::Map::new(),
        }
    }

    /// Parse a record out of a stored payload.
    ///
    /// # Errors
    /// Returns `CandelaError::Data` when required fields are missing or have
    /// the wrong shape.
    pub fn from_value(value: &serde_json::Value) -> Result<Self, CandelaError> {
        serde_json::from_value(value.clone())
            .map_err(|e| CandelaError::Data(format!("malformed ohlcv payload: {e}")))
    }

    /// Serialize the record into a payload value.
    ///
    /// # Errors
    /// Returns `CandelaError::Data` if serialization fails.
    pub fn into_value(self) -> Result<serde_json::Value, CandelaError> {
        serde_json::to_value(self).map_err(|e| CandelaError::Data(e.to_string()))
    }

    /// Wrap the record into an [`Entry`] for the given key.
    ///
    /// # Errors
    /// Returns `CandelaError::Data` if serialization fails.
    pub fn into_entry(
        self,
        exchange: impl Into<String>,
        coin: impl Into<String>,
        ts: DateTime<Utc>,
    ) -> Result<Entry, CandelaError> {
        Ok(Entry::new(exchange, coin, ts, self.into_value()?))
    }
}
