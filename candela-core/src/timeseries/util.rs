use std::collections::BTreeSet;

use chrono::{DateTime, Utc};

use crate::types::Entry;

/// Collect the timestamps of a slice of entries into a sorted set.
#[must_use]
pub fn timestamps_of(entries: &[Entry]) -> BTreeSet<DateTime<Utc>> {
    entries.iter().map(|e| e.ts).collect()
}
