//! Time-series utilities shared by the reconciliation engine and the
//! streaming coordinator.
//!
//! Modules include:
//! - `gaps`: detect missing sub-ranges of a fixed-interval grid
//! - `chunks`: partition a requested range into delivery chunks
//! - `merge`: merge stored and freshly fetched entries
//!
//! Everything here is pure, deterministic, in-memory computation.

/// Chunk partitioning of a requested range.
pub mod chunks;
/// Gap detection against the expected timestamp grid.
pub mod gaps;
/// Merge helpers for joining stored and fetched series.
pub mod merge;
/// Small shared helpers.
pub mod util;
