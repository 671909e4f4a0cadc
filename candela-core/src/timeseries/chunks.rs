use chrono::{DateTime, Duration, Utc};

/// Partition `[start, end)` into ordered, contiguous chunks of at most
/// `span` each. The final chunk is truncated at `end`.
///
/// Chunk boundaries are an internal pipelining detail: a logical gap
/// spanning two chunks is simply reconciled in two pieces. A non-positive
/// span or an empty input range yields no chunks.
#[must_use]
pub fn chunk_bounds(
    start: DateTime<Utc>,
    end: DateTime<Utc>,
    span: Duration,
) -> Vec<(DateTime<Utc>, DateTime<Utc>)> {
    if span <= Duration::zero() || start >= end {
        return Vec::new();
    }

    let mut bounds = Vec::new();
    let mut cursor = start;
    while cursor < end {
        let chunk_end = std::cmp::min(cursor + span, end);
        bounds.push((cursor, chunk_end));
        cursor = chunk_end;
    }
    bounds
}
