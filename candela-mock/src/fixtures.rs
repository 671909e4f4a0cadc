//! Deterministic candle fixtures.

use candela_core::OhlcvRecord;
use candela_core::types::Entry;
use chrono::{DateTime, Duration, Utc};
use rust_decimal::Decimal;

/// Generate one grid-aligned candle per grid point of `[start, end)`.
///
/// Prices derive from the timestamp, so repeated calls for the same range
/// return identical data.
#[must_use]
pub fn candles(
    exchange: &str,
    coin: &str,
    start: DateTime<Utc>,
    end: DateTime<Utc>,
    interval: Duration,
) -> Vec<Entry> {
    if interval <= Duration::zero() || start >= end {
        return Vec::new();
    }
    let mut out = Vec::new();
    let mut cursor = start;
    while cursor < end {
        out.push(candle_at(exchange, coin, cursor));
        cursor += interval;
    }
    out
}

/// The deterministic candle for a single grid point.
#[must_use]
pub fn candle_at(exchange: &str, coin: &str, ts: DateTime<Utc>) -> Entry {
    let seed = ts.timestamp().rem_euclid(10_000);
    let base = Decimal::new(10_000 + seed, 2);
    let spread = Decimal::new(50, 2);
    let record = OhlcvRecord::new(base, base + spread, base - spread, base, Decimal::new(seed, 0));
    record
        .into_entry(exchange, coin, ts)
        .expect("fixture payload serializes")
}
