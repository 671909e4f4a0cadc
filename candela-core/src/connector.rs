use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};

use crate::types::{CandelaError, Entry, ExchangeKey};

/// Focused role trait for connectors that can serve historical ranges.
#[async_trait]
pub trait HistoryProvider: Send + Sync {
    /// Fetch entries for `[start, end)` at the given grid interval,
    /// ascending by timestamp.
    ///
    /// The upstream may legitimately hold fewer points than the requested
    /// grid coverage (e.g. before the coin's listing date); the returned
    /// list is then partial or empty, which is not an error.
    ///
    /// # Errors
    /// Returns `CandelaError::Upstream` or `CandelaError::RateLimited` for
    /// connectivity, authorization, and throttling failures, never for
    /// "no data in range".
    async fn fetch_range(
        &self,
        coin: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        interval: Duration,
    ) -> Result<Vec<Entry>, CandelaError>;
}

/// One exchange's upstream API client. Exposes capability discovery.
#[async_trait]
pub trait ExchangeConnector: Send + Sync {
    /// A stable identifier used for registry routing (e.g. "kraken").
    fn name(&self) -> &'static str;

    /// Canonical exchange key constructed from the static name.
    fn key(&self) -> ExchangeKey {
        ExchangeKey::new(self.name())
    }

    /// Human-friendly vendor string.
    fn vendor(&self) -> &'static str {
        "unknown"
    }

    /// Whether the coin is tradable/listed on this exchange.
    ///
    /// # Errors
    /// Returns `CandelaError::Upstream` when the availability probe itself
    /// fails; `Ok(false)` means a definitive "not served here".
    async fn check_availability(&self, coin: &str) -> Result<bool, CandelaError>;

    /// Advertise history capability by returning a usable trait object
    /// reference when supported.
    fn as_history_provider(&self) -> Option<&dyn HistoryProvider> {
        None
    }
}

impl std::fmt::Debug for dyn ExchangeConnector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ExchangeConnector")
            .field("name", &self.name())
            .finish_non_exhaustive()
    }
}
