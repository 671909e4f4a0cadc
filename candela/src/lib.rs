//! candela serves reconciled historical market data for `(exchange, coin)`
//! pairs.
//!
//! Overview
//! - Persisted series are read from a [`candela_core::RawDataStore`]; gaps
//!   against the expected fixed-interval grid are detected, backfilled from
//!   the registered exchange connector, written back idempotently, and
//!   merged with freshly-fetched-wins semantics.
//! - Delivery is incremental: the requested range is partitioned into
//!   configured chunks and streamed in order over a bounded channel, one
//!   chunk in flight at a time, cancellable between awaits.
//! - Each request runs as one sequential task; concurrency comes from many
//!   requests sharing the store and the connector registry. Per-exchange
//!   upstream budgets live in the throttling middleware, not in the engine.
//!
//! Building an orchestrator and streaming a range:
//! ```rust,ignore
//! use std::sync::Arc;
//! use candela::{Candela, StreamRequest};
//!
//! let candela = Candela::builder()
//!     .with_store(Arc::new(candela_store::MemoryStore::new()))
//!     .with_throttled_connector(Arc::new(my_connector), Default::default())
//!     .build()?;
//!
//! let (tx, mut rx) = candela.channel();
//! let handle = candela.stream_history(
//!     StreamRequest::new("kraken", "BTC", start, end),
//!     tx,
//! )?;
//! while let Some(msg) = rx.recv().await {
//!     // chunks in order, then a completion or error terminal
//! }
//! ```
#![warn(missing_docs)]

pub(crate) mod core;
/// Historical reconciliation engine.
pub mod engine;
/// Streaming delivery: messages, session state machine, and driver.
pub mod stream;

pub use candela_core::types::{
    CandelaConfig, CandelaError, Entry, GapRange, MergedResult, StorageBackend, StorageConfig,
    ThrottleConfig, UnfilledCause, UnfilledGap,
};
pub use candela_core::{ExchangeConnector, HistoryProvider, OhlcvRecord, RawDataStore};
pub use candela_middleware::{Throttle, ThrottledConnector};
pub use crate::core::{Candela, CandelaBuilder};
pub use engine::ReconciliationEngine;
pub use stream::{StreamHandle, StreamMessage, StreamRequest};
