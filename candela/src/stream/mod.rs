//! Chunked, cancellable delivery of reconciled history over a bounded
//! channel.

pub(crate) mod driver;
/// Output channel messages.
pub mod message;
/// The pure session state machine.
pub mod sm;

use candela_core::types::CandelaError;
use chrono::{DateTime, Utc};

pub use candela_core::stream::StreamHandle;
pub use message::StreamMessage;

/// One client request for a streamed historical range.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StreamRequest {
    /// Exchange to serve from.
    pub exchange: String,
    /// Coin to serve.
    pub coin: String,
    /// Inclusive range start.
    pub start: DateTime<Utc>,
    /// Exclusive range end.
    pub end: DateTime<Utc>,
}

impl StreamRequest {
    /// Construct a request.
    pub fn new(
        exchange: impl Into<String>,
        coin: impl Into<String>,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Self {
        Self {
            exchange: exchange.into(),
            coin: coin.into(),
            start,
            end,
        }
    }

    /// Validate the request shape.
    ///
    /// # Errors
    /// Returns `CandelaError::InvalidArg` for empty identifiers or an empty
    /// time range.
    pub fn validate(&self) -> Result<(), CandelaError> {
        if self.exchange.trim().is_empty() {
            return Err(CandelaError::invalid_arg("exchange must be non-empty"));
        }
        if self.coin.trim().is_empty() {
            return Err(CandelaError::invalid_arg("coin must be non-empty"));
        }
        if self.start >= self.end {
            return Err(CandelaError::invalid_arg("start must precede end"));
        }
        Ok(())
    }
}
