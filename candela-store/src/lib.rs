//! candela-store
//!
//! Reference [`RawDataStore`] backends for the candela ecosystem:
//!
//! - [`MemoryStore`]: process-local, useful for tests and ephemeral serving.
//! - [`JsonlStore`]: JSON-lines files under a root directory, one file per
//!   `(exchange, coin)` key.
//!
//! Both backends uphold the store contract: `get_range` returns entries
//! deduplicated and sorted ascending, and `save_bulk` is an idempotent
//! upsert-by-timestamp that tolerates overlapping concurrent calls.
#![warn(missing_docs)]

use std::sync::Arc;

use candela_core::RawDataStore;
use candela_core::types::{CandelaError, StorageBackend, StorageConfig};

mod jsonl;
mod memory;
mod path;

pub use jsonl::JsonlStore;
pub use memory::MemoryStore;
pub use path::storage_stem;

/// Construct the store selected by the configuration.
///
/// # Errors
/// Returns `CandelaError::Unsupported` for backend kinds this crate does not
/// implement.
pub fn build_store(config: &StorageConfig) -> Result<Arc<dyn RawDataStore>, CandelaError> {
    match &config.backend {
        StorageBackend::Memory => Ok(Arc::new(MemoryStore::new())),
        StorageBackend::LocalFile { root } => Ok(Arc::new(JsonlStore::new(root.clone()))),
        other => Err(CandelaError::unsupported(format!(
            "storage backend {other:?}"
        ))),
    }
}
