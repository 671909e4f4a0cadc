use std::sync::Arc;

use candela_core::connector::ExchangeConnector;
use candela_core::registry::ConnectorRegistry;
use candela_core::store::RawDataStore;
use candela_core::stream::StreamHandle;
use candela_core::Middleware;
use candela_core::timeseries::chunks::chunk_bounds;
use candela_core::types::{CandelaError, Entry, MergedResult};
use candela_middleware::Throttle;
use candela_types::{CandelaConfig, ThrottleConfig};
use chrono::{DateTime, Utc};
use tokio::sync::{mpsc, watch};

use crate::engine::ReconciliationEngine;
use crate::stream::driver::run_session;
use crate::stream::sm::Session;
use crate::stream::{StreamMessage, StreamRequest};

/// Orchestrator serving reconciled historical series from a store and a set
/// of registered exchange connectors.
pub struct Candela {
    registry: Arc<ConnectorRegistry>,
    store: Arc<dyn RawDataStore>,
    cfg: CandelaConfig,
    grid_interval: chrono::Duration,
    chunk_span: chrono::Duration,
}

impl std::fmt::Debug for Candela {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Candela")
            .field("cfg", &self.cfg)
            .field("grid_interval", &self.grid_interval)
            .field("chunk_span", &self.chunk_span)
            .finish_non_exhaustive()
    }
}

/// Builder for constructing a [`Candela`] orchestrator.
pub struct CandelaBuilder {
    registry: ConnectorRegistry,
    store: Option<Arc<dyn RawDataStore>>,
    cfg: CandelaConfig,
}

impl Default for CandelaBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl CandelaBuilder {
    /// Create a builder with the default configuration, no connectors, and
    /// no store.
    #[must_use]
    pub fn new() -> Self {
        Self {
            registry: ConnectorRegistry::new(),
            store: None,
            cfg: CandelaConfig::default(),
        }
    }

    /// Register an exchange connector under its own name. Registering a
    /// second connector with the same name replaces the first.
    #[must_use]
    pub fn with_connector(mut self, connector: Arc<dyn ExchangeConnector>) -> Self {
        self.registry.register(connector);
        self
    }

    /// Register a connector wrapped in the per-exchange upstream throttle.
    #[must_use]
    pub fn with_throttled_connector(
        self,
        connector: Arc<dyn ExchangeConnector>,
        throttle: ThrottleConfig,
    ) -> Self {
        self.with_connector(Box::new(Throttle::new(throttle)).apply(connector))
    }

    /// Set the raw data store. Required.
    #[must_use]
    pub fn with_store(mut self, store: Arc<dyn RawDataStore>) -> Self {
        self.store = Some(store);
        self
    }

    /// Replace the configuration.
    #[must_use]
    pub fn with_config(mut self, cfg: CandelaConfig) -> Self {
        self.cfg = cfg;
        self
    }

    /// Validate the configuration and assemble the orchestrator.
    ///
    /// # Errors
    /// Returns `CandelaError::InvalidArg` when the configuration is invalid
    /// or no store was provided.
    pub fn build(self) -> Result<Candela, CandelaError> {
        self.cfg.validate()?;
        let store = self
            .store
            .ok_or_else(|| CandelaError::invalid_arg("a raw data store is required"))?;
        let grid_interval = chrono::Duration::from_std(self.cfg.grid_interval)
            .map_err(|_| CandelaError::invalid_arg("grid_interval out of range"))?;
        let chunk_span = chrono::Duration::from_std(self.cfg.chunk_span)
            .map_err(|_| CandelaError::invalid_arg("chunk_span out of range"))?;
        Ok(Candela {
            registry: Arc::new(self.registry),
            store,
            cfg: self.cfg,
            grid_interval,
            chunk_span,
        })
    }
}

impl Candela {
    /// Start building an orchestrator.
    #[must_use]
    pub fn builder() -> CandelaBuilder {
        CandelaBuilder::new()
    }

    /// The configuration this orchestrator was built with.
    #[must_use]
    pub fn config(&self) -> &CandelaConfig {
        &self.cfg
    }

    /// Registered exchange names, sorted.
    #[must_use]
    pub fn exchanges(&self) -> Vec<&str> {
        self.registry.names()
    }

    /// A bounded output channel sized per the configuration, ready to hand
    /// to [`Candela::stream_history`].
    #[must_use]
    pub fn channel(&self) -> (mpsc::Sender<StreamMessage>, mpsc::Receiver<StreamMessage>) {
        mpsc::channel(self.cfg.channel_capacity)
    }

    /// Whether the coin is tradable on the named exchange.
    ///
    /// # Errors
    /// Returns `CandelaError::UnknownExchange` for unregistered exchanges
    /// and `CandelaError::Upstream` when the probe itself fails.
    pub async fn check_availability(
        &self,
        exchange: &str,
        coin: &str,
    ) -> Result<bool, CandelaError> {
        let connector = self.registry.get(exchange)?;
        connector.check_availability(coin).await
    }

    /// Whether any data is persisted for the key.
    ///
    /// # Errors
    /// Returns `CandelaError::Storage` on store failure.
    pub async fn has_data(&self, exchange: &str, coin: &str) -> Result<bool, CandelaError> {
        self.store.exists(exchange, coin).await
    }

    /// The most recent persisted entry for the key, if any.
    ///
    /// # Errors
    /// Returns `CandelaError::Storage` on store failure.
    pub async fn latest_entry(
        &self,
        exchange: &str,
        coin: &str,
    ) -> Result<Option<Entry>, CandelaError> {
        let Some(latest) = self.store.latest_timestamp(exchange, coin).await? else {
            return Ok(None);
        };
        let entries = self
            .store
            .get_range(exchange, coin, latest, latest + self.grid_interval)
            .await?;
        Ok(entries.into_iter().next_back())
    }

    /// Reconcile and return the whole range at once, chunk by chunk in
    /// order. The streaming boundary is preferable for long ranges; this is
    /// the one-shot convenience.
    ///
    /// # Errors
    /// Returns `CandelaError::InvalidArg` for a malformed request,
    /// `CandelaError::UnknownExchange` for unregistered exchanges, and any
    /// aborting reconciliation error (`Storage`, `Unsupported`).
    pub async fn get_history(
        &self,
        exchange: &str,
        coin: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<MergedResult, CandelaError> {
        StreamRequest::new(exchange, coin, start, end).validate()?;
        let connector = self.registry.get(exchange)?;
        let engine =
            ReconciliationEngine::new(Arc::clone(&self.store), connector, self.grid_interval);

        let mut combined = MergedResult::default();
        for (chunk_start, chunk_end) in chunk_bounds(start, end, self.chunk_span) {
            let mut result = engine.reconcile(exchange, coin, chunk_start, chunk_end).await?;
            combined.entries.append(&mut result.entries);
            combined.unfilled.append(&mut result.unfilled);
            if combined.write_failure.is_none() {
                combined.write_failure = result.write_failure;
            }
        }
        Ok(combined)
    }

    /// Start a streaming session delivering `[start, end)` in ordered
    /// chunks on `tx`.
    ///
    /// The session runs as one sequential background task. Request-shape
    /// problems are returned synchronously; domain failures (unknown
    /// exchange, unavailable coin, aborting store errors) travel over the
    /// channel as terminal messages. Dropping the receiver or stopping the
    /// returned handle cancels the session cooperatively.
    ///
    /// # Errors
    /// Returns `CandelaError::InvalidArg` for a malformed request.
    pub fn stream_history(
        &self,
        request: StreamRequest,
        tx: mpsc::Sender<StreamMessage>,
    ) -> Result<StreamHandle, CandelaError> {
        request.validate()?;
        let (stop_tx, stop_rx) = watch::channel(false);

        let join = match self.registry.get(&request.exchange) {
            Ok(connector) => {
                let chunks = chunk_bounds(request.start, request.end, self.chunk_span);
                let session = Session::new(
                    request.exchange,
                    request.coin,
                    request.start,
                    request.end,
                    chunks,
                );
                let engine = ReconciliationEngine::new(
                    Arc::clone(&self.store),
                    Arc::clone(&connector),
                    self.grid_interval,
                );
                tokio::spawn(run_session(engine, connector, tx, stop_rx, session))
            }
            Err(error) => {
                // Unknown exchange: same channel contract, one terminal
                // message.
                let (start, end) = (request.start, request.end);
                tokio::spawn(async move {
                    let _ = tx.send(StreamMessage::Failed { start, end, error }).await;
                })
            }
        };
        Ok(StreamHandle::new(join, stop_tx))
    }
}
