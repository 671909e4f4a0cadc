use std::collections::BTreeSet;

use candela_core::timeseries::gaps::{find_gaps, grid_aligned};
use chrono::{DateTime, Duration, Utc};
use proptest::prelude::*;

fn ts(minutes: i64) -> DateTime<Utc> {
    DateTime::from_timestamp(minutes * 60, 0).expect("valid timestamp")
}

fn set(minutes: &[i64]) -> BTreeSet<DateTime<Utc>> {
    minutes.iter().copied().map(ts).collect()
}

#[test]
fn empty_store_yields_one_gap_covering_the_range() {
    let gaps = find_gaps(&BTreeSet::new(), ts(0), ts(15), Duration::minutes(5));
    assert_eq!(gaps.len(), 1);
    assert_eq!(gaps[0].start, ts(0));
    assert_eq!(gaps[0].end, ts(15));
}

#[test]
fn fully_present_grid_yields_no_gaps() {
    let existing = set(&[0, 5, 10, 15, 20]);
    let gaps = find_gaps(&existing, ts(0), ts(25), Duration::minutes(5));
    assert!(gaps.is_empty());
}

#[test]
fn single_missing_point_is_a_minimal_gap() {
    // Store holds 00:00 and 00:10 on a 5-minute grid.
    let existing = set(&[0, 10]);
    let gaps = find_gaps(&existing, ts(0), ts(15), Duration::minutes(5));
    assert_eq!(gaps.len(), 1);
    assert_eq!(gaps[0].start, ts(5));
    assert_eq!(gaps[0].end, ts(10));
}

#[test]
fn trailing_gap_closes_at_range_end() {
    let existing = set(&[0, 5]);
    let gaps = find_gaps(&existing, ts(0), ts(20), Duration::minutes(5));
    assert_eq!(gaps.len(), 1);
    assert_eq!(gaps[0].start, ts(10));
    assert_eq!(gaps[0].end, ts(20));
}

#[test]
fn adjacent_missing_points_merge_into_one_gap() {
    let existing = set(&[0, 20]);
    let gaps = find_gaps(&existing, ts(0), ts(25), Duration::minutes(5));
    assert_eq!(gaps.len(), 1);
    assert_eq!(gaps[0].start, ts(5));
    assert_eq!(gaps[0].end, ts(20));
}

#[test]
fn off_grid_timestamps_do_not_fill_grid_points() {
    // 00:02 is not on the 5-minute grid anchored at 00:00.
    let existing = set(&[2]);
    let gaps = find_gaps(&existing, ts(0), ts(10), Duration::minutes(5));
    assert_eq!(gaps.len(), 1);
    assert_eq!(gaps[0].start, ts(0));
    assert_eq!(gaps[0].end, ts(10));
}

#[test]
fn degenerate_inputs_yield_no_gaps() {
    assert!(find_gaps(&BTreeSet::new(), ts(10), ts(10), Duration::minutes(5)).is_empty());
    assert!(find_gaps(&BTreeSet::new(), ts(10), ts(0), Duration::minutes(5)).is_empty());
    assert!(find_gaps(&BTreeSet::new(), ts(0), ts(10), Duration::zero()).is_empty());
}

#[test]
fn alignment_probe() {
    let step = Duration::minutes(5);
    assert!(grid_aligned(ts(15), ts(0), step));
    assert!(!grid_aligned(ts(2), ts(0), step));
    assert!(!grid_aligned(ts(-5), ts(0), step));
}

proptest! {
    /// The gaps plus the present grid points exactly cover the expected
    /// grid, gaps are disjoint, ascending, aligned, and minimal.
    #[test]
    fn gaps_partition_the_grid(
        interval_min in 1i64..=90,
        points in proptest::collection::vec(any::<bool>(), 0..200),
    ) {
        let interval = Duration::minutes(interval_min);
        let start = ts(0);
        let end = start + interval * i32::try_from(points.len()).unwrap();

        let existing: BTreeSet<_> = points
            .iter()
            .enumerate()
            .filter(|(_, present)| **present)
            .map(|(i, _)| start + interval * i32::try_from(i).unwrap())
            .collect();

        let gaps = find_gaps(&existing, start, end, interval);

        // Disjoint and ascending, with no zero-length or adjacent ranges.
        for w in gaps.windows(2) {
            prop_assert!(w[0].end < w[1].start);
        }
        for g in &gaps {
            prop_assert!(g.start < g.end);
            prop_assert!(grid_aligned(g.start, start, interval));
        }

        // Walking the grid, membership in a gap must equal absence from the
        // store.
        let mut cursor = start;
        while cursor < end {
            let in_gap = gaps.iter().any(|g| g.contains(cursor));
            prop_assert_eq!(in_gap, !existing.contains(&cursor));
            cursor += interval;
        }
    }
}
