//! Configuration types shared across the orchestrator, stores, and
//! connectors.

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::CandelaError;

/// Global configuration for the `Candela` orchestrator.
///
/// Injected as an immutable value at construction; concurrent requests with
/// different configurations are expressed by building separate orchestrators.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CandelaConfig {
    /// Spacing of the expected timestamp grid. Data is assumed to exist at
    /// every grid point; absence defines a gap.
    pub grid_interval: Duration,
    /// Time span covered by one delivery chunk. Must be at least
    /// `grid_interval`.
    pub chunk_span: Duration,
    /// Capacity of the bounded output channel handed to streaming sessions.
    pub channel_capacity: usize,
}

impl Default for CandelaConfig {
    fn default() -> Self {
        Self {
            grid_interval: Duration::from_secs(5 * 60),
            chunk_span: Duration::from_secs(6 * 60 * 60),
            channel_capacity: 8,
        }
    }
}

impl CandelaConfig {
    /// Validate the configuration.
    ///
    /// # Errors
    /// Returns `CandelaError::InvalidArg` when the grid interval is zero,
    /// the chunk span is shorter than the grid interval, or the channel
    /// capacity is zero.
    pub fn validate(&self) -> Result<(), CandelaError> {
        if self.grid_interval.is_zero() {
            return Err(CandelaError::invalid_arg("grid_interval must be non-zero"));
        }
        if self.chunk_span < self.grid_interval {
            return Err(CandelaError::invalid_arg(
                "chunk_span must be at least grid_interval",
            ));
        }
        if self.channel_capacity == 0 {
            return Err(CandelaError::invalid_arg(
                "channel_capacity must be non-zero",
            ));
        }
        Ok(())
    }
}

/// Configuration for a per-exchange upstream call budget over a sliding
/// window.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThrottleConfig {
    /// Maximum number of upstream calls admitted within a single window.
    pub max_calls: u32,
    /// Duration of the accounting window.
    pub window: Duration,
}

impl Default for ThrottleConfig {
    fn default() -> Self {
        Self {
            max_calls: 20,
            window: Duration::from_secs(1),
        }
    }
}

/// Selection of a raw data store backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[non_exhaustive]
pub enum StorageBackend {
    /// Process-local in-memory store. Data does not survive restarts.
    Memory,
    /// JSON-lines files under a root directory, one file per
    /// (exchange, coin).
    LocalFile {
        /// Root directory for the stored files.
        root: PathBuf,
    },
}

/// Storage configuration consumed by the backend factory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Which backend to construct.
    pub backend: StorageBackend,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: StorageBackend::Memory,
        }
    }
}
