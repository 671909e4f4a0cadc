use candela_core::types::{CandelaError, Entry, UnfilledGap};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Messages emitted on a streaming session's output channel.
///
/// Per request the channel carries, in order: zero-or-one [`Unavailable`],
/// then zero-or-more [`Chunk`]s ascending in time, then exactly one of
/// [`Completed`] or [`Failed`]. If the session is cancelled first, no
/// further messages are guaranteed.
///
/// [`Unavailable`]: StreamMessage::Unavailable
/// [`Chunk`]: StreamMessage::Chunk
/// [`Completed`]: StreamMessage::Completed
/// [`Failed`]: StreamMessage::Failed
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum StreamMessage {
    /// The coin is not served by the requested exchange. Terminal; no data
    /// chunks follow.
    Unavailable {
        /// Exchange that was asked.
        exchange: String,
        /// Coin that is not served.
        coin: String,
    },
    /// One reconciled chunk.
    Chunk {
        /// Zero-based position of the chunk within the request.
        index: usize,
        /// Inclusive chunk start.
        start: DateTime<Utc>,
        /// Exclusive chunk end.
        end: DateTime<Utc>,
        /// Entries ascending by timestamp.
        entries: Vec<Entry>,
        /// Gap sub-ranges that could not be filled.
        unfilled: Vec<UnfilledGap>,
        /// A persistence failure for freshly fetched entries, if any.
        write_failure: Option<CandelaError>,
    },
    /// All chunks were delivered.
    Completed {
        /// Number of chunks delivered.
        chunks: usize,
    },
    /// The request aborted. Chunks already delivered are not retracted.
    Failed {
        /// Start of the range the failure applies to (the failed chunk, or
        /// the whole request when no chunk was reached).
        start: DateTime<Utc>,
        /// Exclusive end of that range.
        end: DateTime<Utc>,
        /// The classified error.
        error: CandelaError,
    },
}
