use std::collections::BTreeMap;

use chrono::{DateTime, Utc};

use crate::types::Entry;

/// Merge stored and freshly fetched entries keyed by timestamp.
///
/// On a timestamp collision the freshly fetched entry wins: the upstream is
/// authoritative over potentially stale local copies. The output is
/// ascending by timestamp and deduplicated.
#[must_use]
pub fn merge_entries(stored: Vec<Entry>, fetched: Vec<Entry>) -> Vec<Entry> {
    let mut map: BTreeMap<DateTime<Utc>, Entry> = BTreeMap::new();
    for e in stored {
        map.insert(e.ts, e);
    }
    for e in fetched {
        map.insert(e.ts, e);
    }
    map.into_values().collect()
}
