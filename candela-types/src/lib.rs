//! candela-types
//!
//! Foundational types shared across the candela workspace: the error
//! taxonomy and the configuration values injected into each component at
//! construction.
#![warn(missing_docs)]

mod error;

/// Configuration types for the orchestrator, throttle, and storage backends.
pub mod config;
/// Connector key types.
pub mod keys;

pub use config::{CandelaConfig, StorageBackend, StorageConfig, ThrottleConfig};
pub use error::CandelaError;
pub use keys::ExchangeKey;
