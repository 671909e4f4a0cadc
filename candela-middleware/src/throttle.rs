//! Throttling connector wrapper.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use candela_core::Middleware;
use candela_core::connector::{ExchangeConnector, HistoryProvider};
use candela_core::types::{CandelaError, Entry};
use candela_types::ThrottleConfig;
use chrono::{DateTime, Utc};
use tokio::sync::Semaphore;

/// Wrapper that spreads a connector's outgoing upstream calls over time.
///
/// Each call takes a permit from a shared semaphore; the permit is returned
/// one window later, so at most `max_calls` upstream calls start within any
/// window. Callers wait for a permit instead of receiving an error, which
/// keeps the connector's own contract intact: a `RateLimited` error still
/// means the *upstream* rejected the call.
pub struct ThrottledConnector {
    inner: Arc<dyn ExchangeConnector>,
    permits: Arc<Semaphore>,
    window: Duration,
}

impl ThrottledConnector {
    /// Wrap an existing connector with the given call budget.
    #[must_use]
    pub fn new(inner: Arc<dyn ExchangeConnector>, config: &ThrottleConfig) -> Self {
        let max_calls = config.max_calls.max(1) as usize;
        Self {
            inner,
            permits: Arc::new(Semaphore::new(max_calls)),
            window: config.window,
        }
    }

    /// Access the inner connector.
    #[must_use]
    pub fn inner(&self) -> &Arc<dyn ExchangeConnector> {
        &self.inner
    }

    async fn admit(&self) -> Result<(), CandelaError> {
        let permit = self
            .permits
            .clone()
            .acquire_owned()
            .await
            .map_err(|e| CandelaError::upstream(self.inner.name(), e.to_string()))?;
        // Hold the permit for one window, then release it.
        let window = self.window;
        tokio::spawn(async move {
            tokio::time::sleep(window).await;
            drop(permit);
        });
        Ok(())
    }
}

#[async_trait]
impl ExchangeConnector for ThrottledConnector {
    fn name(&self) -> &'static str {
        self.inner.name()
    }

    fn vendor(&self) -> &'static str {
        self.inner.vendor()
    }

    async fn check_availability(&self, coin: &str) -> Result<bool, CandelaError> {
        self.admit().await?;
        self.inner.check_availability(coin).await
    }

    fn as_history_provider(&self) -> Option<&dyn HistoryProvider> {
        if self.inner.as_history_provider().is_some() {
            Some(self as &dyn HistoryProvider)
        } else {
            None
        }
    }
}

#[async_trait]
impl HistoryProvider for ThrottledConnector {
    async fn fetch_range(
        &self,
        coin: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        interval: chrono::Duration,
    ) -> Result<Vec<Entry>, CandelaError> {
        self.admit().await?;
        let Some(provider) = self.inner.as_history_provider() else {
            return Err(CandelaError::unsupported("history"));
        };
        provider.fetch_range(coin, start, end, interval).await
    }
}

/// Middleware config for constructing a [`ThrottledConnector`].
pub struct Throttle {
    config: ThrottleConfig,
}

impl Throttle {
    /// Create a throttle middleware with the given budget.
    #[must_use]
    pub const fn new(config: ThrottleConfig) -> Self {
        Self { config }
    }
}

impl Middleware for Throttle {
    fn apply(self: Box<Self>, inner: Arc<dyn ExchangeConnector>) -> Arc<dyn ExchangeConnector> {
        Arc::new(ThrottledConnector::new(inner, &self.config))
    }

    fn name(&self) -> &'static str {
        "ThrottledConnector"
    }

    fn config_json(&self) -> serde_json::Value {
        serde_json::json!({
            "max_calls": self.config.max_calls,
            "window_ms": self.config.window.as_millis(),
        })
    }
}
