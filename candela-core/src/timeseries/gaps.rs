use std::collections::BTreeSet;

use chrono::{DateTime, Duration, Utc};

use crate::types::GapRange;

/// Compute the missing sub-ranges of the expected grid over `[start, end)`.
///
/// The expected grid is `start, start + interval, start + 2*interval, ...`
/// strictly below `end`. Every grid point absent from `existing` extends (or
/// opens) the current gap; every present point closes it. A trailing open
/// gap closes at `end`.
///
/// The output is disjoint, ascending, grid-aligned, and minimal: no
/// zero-length range, no two adjacent ranges left unmerged. A non-positive
/// interval or an empty input range yields no gaps.
#[must_use]
pub fn find_gaps(
    existing: &BTreeSet<DateTime<Utc>>,
    start: DateTime<Utc>,
    end: DateTime<Utc>,
    interval: Duration,
) -> Vec<GapRange> {
    if interval <= Duration::zero() || start >= end {
        return Vec::new();
    }

    let mut gaps = Vec::new();
    let mut open: Option<DateTime<Utc>> = None;
    let mut cursor = start;
    while cursor < end {
        if existing.contains(&cursor) {
            if let Some(gap_start) = open.take() {
                gaps.push(GapRange::new(gap_start, cursor));
            }
        } else if open.is_none() {
            open = Some(cursor);
        }
        cursor += interval;
    }
    if let Some(gap_start) = open {
        gaps.push(GapRange::new(gap_start, end));
    }
    gaps
}

/// Whether `ts` sits on the grid anchored at `start`.
#[must_use]
pub fn grid_aligned(ts: DateTime<Utc>, start: DateTime<Utc>, interval: Duration) -> bool {
    if interval <= Duration::zero() || ts < start {
        return false;
    }
    let offset = ts - start;
    let step_ns = interval.num_nanoseconds();
    let off_ns = offset.num_nanoseconds();
    match (off_ns, step_ns) {
        (Some(off), Some(step)) if step > 0 => off % step == 0,
        _ => false,
    }
}
