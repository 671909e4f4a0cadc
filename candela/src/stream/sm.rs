//! Pure state machine for one streaming session.
//!
//! The session is an explicit finite-state value passed through each step so
//! cancellation and error transitions stay auditable and testable without a
//! transport. The driver performs the returned actions and feeds the
//! resulting events back in.

use candela_core::types::{CandelaError, MergedResult};
use chrono::{DateTime, Utc};

use super::message::StreamMessage;

/// Lifecycle phase of a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Created, not yet started.
    Idle,
    /// Probing coin availability on the connector.
    CheckingAvailability,
    /// Delivering chunks in order.
    Streaming,
    /// All chunks delivered and the completion marker emitted.
    Completed,
    /// Aborted with a terminal message.
    Failed,
    /// The caller cancelled or the downstream went away.
    Cancelled,
}

/// Inputs observed by the session.
#[derive(Debug, Clone)]
pub enum Event {
    /// The driver started the session.
    Started,
    /// Availability probe returned `true`.
    AvailabilityConfirmed,
    /// Availability probe returned `false`.
    AvailabilityDenied,
    /// Availability probe itself failed.
    AvailabilityFailed(CandelaError),
    /// Reconciliation of the current chunk finished.
    ChunkReady(MergedResult),
    /// Reconciliation of the current chunk aborted.
    ChunkFailed(CandelaError),
    /// The previous emission was accepted by the output channel.
    EmitAccepted,
    /// The output channel is closed.
    DownstreamClosed,
    /// The caller requested cancellation.
    CancelRequested,
}

/// Work the driver must perform next.
#[derive(Debug)]
pub enum Action {
    /// Probe coin availability on the connector.
    CheckAvailability,
    /// Reconcile the chunk `[start, end)`.
    Reconcile {
        /// Inclusive chunk start.
        start: DateTime<Utc>,
        /// Exclusive chunk end.
        end: DateTime<Utc>,
    },
    /// Emit a message on the output channel and await acceptance.
    Emit(StreamMessage),
    /// Stop immediately; no further actions follow.
    Stop,
}

/// Explicit per-request session state.
#[derive(Debug)]
pub struct Session {
    /// Current phase.
    pub phase: Phase,
    /// Requested exchange.
    pub exchange: String,
    /// Requested coin.
    pub coin: String,
    /// Overall request start.
    pub start: DateTime<Utc>,
    /// Overall request end (exclusive).
    pub end: DateTime<Utc>,
    /// Ordered chunk bounds partitioning `[start, end)`.
    pub chunks: Vec<(DateTime<Utc>, DateTime<Utc>)>,
    /// Index of the chunk currently being served.
    pub cursor: usize,
}

impl Session {
    /// Create an idle session over pre-computed chunk bounds.
    #[must_use]
    pub fn new(
        exchange: impl Into<String>,
        coin: impl Into<String>,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        chunks: Vec<(DateTime<Utc>, DateTime<Utc>)>,
    ) -> Self {
        Self {
            phase: Phase::Idle,
            exchange: exchange.into(),
            coin: coin.into(),
            start,
            end,
            chunks,
            cursor: 0,
        }
    }

    /// Whether the session reached a terminal phase.
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        matches!(
            self.phase,
            Phase::Completed | Phase::Failed | Phase::Cancelled
        )
    }

    /// Advance the state machine with one event, producing follow-up actions.
    #[must_use]
    pub fn handle(mut self, event: Event) -> (Self, Vec<Action>) {
        // Terminal phases absorb everything, including late channel events.
        if self.is_terminal() {
            return (self, Vec::new());
        }

        match (self.phase, event) {
            (_, Event::DownstreamClosed | Event::CancelRequested) => {
                self.phase = Phase::Cancelled;
                (self, vec![Action::Stop])
            }
            (Phase::Idle, Event::Started) => {
                self.phase = Phase::CheckingAvailability;
                (self, vec![Action::CheckAvailability])
            }
            (Phase::CheckingAvailability, Event::AvailabilityConfirmed) => {
                match self.chunks.first().copied() {
                    Some((start, end)) => {
                        self.phase = Phase::Streaming;
                        (self, vec![Action::Reconcile { start, end }])
                    }
                    None => {
                        self.phase = Phase::Completed;
                        (self, vec![Action::Emit(StreamMessage::Completed { chunks: 0 })])
                    }
                }
            }
            (Phase::CheckingAvailability, Event::AvailabilityDenied) => {
                self.phase = Phase::Failed;
                let msg = StreamMessage::Unavailable {
                    exchange: self.exchange.clone(),
                    coin: self.coin.clone(),
                };
                (self, vec![Action::Emit(msg)])
            }
            (Phase::CheckingAvailability, Event::AvailabilityFailed(error)) => {
                self.phase = Phase::Failed;
                let msg = StreamMessage::Failed {
                    start: self.start,
                    end: self.end,
                    error,
                };
                (self, vec![Action::Emit(msg)])
            }
            (Phase::Streaming, Event::ChunkReady(result)) => {
                let (start, end) = self.chunks[self.cursor];
                let msg = StreamMessage::Chunk {
                    index: self.cursor,
                    start,
                    end,
                    entries: result.entries,
                    unfilled: result.unfilled,
                    write_failure: result.write_failure,
                };
                (self, vec![Action::Emit(msg)])
            }
            (Phase::Streaming, Event::ChunkFailed(error)) => {
                let (start, end) = self.chunks[self.cursor];
                self.phase = Phase::Failed;
                let msg = StreamMessage::Failed { start, end, error };
                (self, vec![Action::Emit(msg)])
            }
            (Phase::Streaming, Event::EmitAccepted) => {
                self.cursor += 1;
                match self.chunks.get(self.cursor).copied() {
                    Some((start, end)) => (self, vec![Action::Reconcile { start, end }]),
                    None => {
                        let chunks = self.chunks.len();
                        self.phase = Phase::Completed;
                        (self, vec![Action::Emit(StreamMessage::Completed { chunks })])
                    }
                }
            }
            // Out-of-phase events carry no meaning; ignore them.
            _ => (self, Vec::new()),
        }
    }
}
