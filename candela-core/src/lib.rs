//! candela-core
//!
//! Core types, traits, and utilities shared across the candela ecosystem.
//!
//! - `types`: the data model (entries, gap ranges, merged results).
//! - `record`: the typed OHLCV payload shape with validating conversions.
//! - `store`: the `RawDataStore` trait consumed by the reconciliation
//!   pipeline.
//! - `connector`: the `ExchangeConnector` trait and the `HistoryProvider`
//!   capability trait.
//! - `registry`: name-keyed routing to registered connectors.
//! - `timeseries`: pure gap analysis, chunk partitioning, and merge helpers.
//!
//! Async runtime (Tokio)
//! ---------------------
//! This crate assumes the Tokio ecosystem as the async runtime. The
//! `stream::StreamHandle` type wraps `tokio::task::JoinHandle<()>` and uses
//! `tokio::sync::watch` for cooperative shutdown, so code that drives
//! streaming sessions must run under a Tokio 1.x runtime.
#![warn(missing_docs)]

/// The `ExchangeConnector` trait and the `HistoryProvider` capability trait.
pub mod connector;
/// Middleware trait implemented by connector wrappers.
pub mod middleware;
/// Typed OHLCV payload records.
pub mod record;
/// Name-keyed connector registry.
pub mod registry;
/// The `RawDataStore` trait.
pub mod store;
/// Stream handle utilities for cancellable background sessions.
pub mod stream;
/// Pure time-series utilities: gap analysis, chunking, and merging.
pub mod timeseries;
pub mod types;

pub use connector::{ExchangeConnector, HistoryProvider};
pub use middleware::Middleware;
pub use record::OhlcvRecord;
pub use registry::ConnectorRegistry;
pub use store::RawDataStore;
pub use timeseries::chunks::chunk_bounds;
pub use timeseries::gaps::find_gaps;
pub use timeseries::merge::merge_entries;
pub use timeseries::util::timestamps_of;
pub use types::*;
