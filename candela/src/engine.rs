//! Historical reconciliation: store read, gap analysis, selective upstream
//! backfill, idempotent write-back, and ordered merge, per bounded chunk.

use std::sync::Arc;

use candela_core::connector::{ExchangeConnector, HistoryProvider};
use candela_core::store::RawDataStore;
use candela_core::timeseries::gaps::find_gaps;
use candela_core::timeseries::merge::merge_entries;
use candela_core::timeseries::util::timestamps_of;
use candela_core::types::{CandelaError, Entry, MergedResult, UnfilledGap};
use chrono::{DateTime, Duration, Utc};

/// Reconciles one `(exchange, coin)` series chunk-by-chunk against the store
/// and one upstream connector.
///
/// The engine performs no rate limiting of its own; the connector (usually
/// wrapped by the throttling middleware) owns its upstream budget.
pub struct ReconciliationEngine {
    store: Arc<dyn RawDataStore>,
    connector: Arc<dyn ExchangeConnector>,
    interval: Duration,
}

impl ReconciliationEngine {
    /// Create an engine over a store, a connector, and the grid interval.
    #[must_use]
    pub fn new(
        store: Arc<dyn RawDataStore>,
        connector: Arc<dyn ExchangeConnector>,
        interval: Duration,
    ) -> Self {
        Self {
            store,
            connector,
            interval,
        }
    }

    /// Reconcile one chunk `[chunk_start, chunk_end)`.
    ///
    /// Strictly ordered: read the stored range, detect gaps, fetch each gap
    /// from the upstream in ascending order, write fetched entries back, and
    /// merge with freshly-fetched-wins semantics. A classified upstream
    /// failure on one gap leaves that gap unfilled and moves on; a write-back
    /// failure is recorded on the result without discarding the fetched
    /// entries.
    ///
    /// # Errors
    /// Returns `CandelaError::Storage` when the initial range read fails,
    /// `CandelaError::Unsupported` when the connector cannot serve history,
    /// and any non-upstream error a connector misbehaves with.
    pub async fn reconcile(
        &self,
        exchange: &str,
        coin: &str,
        chunk_start: DateTime<Utc>,
        chunk_end: DateTime<Utc>,
    ) -> Result<MergedResult, CandelaError> {
        let provider = self
            .connector
            .as_history_provider()
            .ok_or_else(|| CandelaError::unsupported("history"))?;

        let stored = self
            .store
            .get_range(exchange, coin, chunk_start, chunk_end)
            .await?;
        let gaps = find_gaps(&timestamps_of(&stored), chunk_start, chunk_end, self.interval);

        let mut fetched: Vec<Entry> = Vec::new();
        let mut unfilled: Vec<UnfilledGap> = Vec::new();
        for gap in gaps {
            match provider
                .fetch_range(coin, gap.start, gap.end, self.interval)
                .await
            {
                Ok(mut batch) => {
                    // Clamp to the chunk window. Points outside the gap but
                    // inside the chunk are kept: the upstream is
                    // authoritative and may refresh stored neighbors.
                    batch.retain(|e| e.ts >= chunk_start && e.ts < chunk_end);
                    // Sub-ranges the upstream did not cover stay reported,
                    // never interpolated.
                    for residue in
                        find_gaps(&timestamps_of(&batch), gap.start, gap.end, self.interval)
                    {
                        unfilled.push(UnfilledGap::no_data(residue));
                    }
                    fetched.extend(batch);
                }
                Err(err) if err.is_upstream() => {
                    #[cfg(feature = "tracing")]
                    tracing::warn!(
                        exchange,
                        coin,
                        gap_start = %gap.start,
                        gap_end = %gap.end,
                        error = %err,
                        "gap left unfilled after upstream failure"
                    );
                    unfilled.push(UnfilledGap::upstream(gap, err));
                }
                Err(err) => return Err(err),
            }
        }

        let mut write_failure = None;
        if !fetched.is_empty() {
            if let Err(err) = self.store.save_bulk(exchange, coin, &fetched).await {
                #[cfg(feature = "tracing")]
                tracing::warn!(
                    exchange,
                    coin,
                    error = %err,
                    "failed to persist backfilled entries; serving them anyway"
                );
                write_failure = Some(err);
            }
        }

        Ok(MergedResult {
            entries: merge_entries(stored, fetched),
            unfilled,
            write_failure,
        })
    }
}
