use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Unified error type for the candela workspace.
///
/// This covers storage failures, classified upstream failures (distinct from
/// legitimate empty responses), routing misses, and argument/data validation
/// problems.
#[derive(Debug, Error, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum CandelaError {
    /// A read or write against the raw data store failed.
    #[error("storage {op} failed: {msg}")]
    Storage {
        /// Store operation that failed (e.g. "get_range", "save_bulk").
        op: String,
        /// Human-readable error message.
        msg: String,
    },

    /// An upstream exchange call failed (connectivity, authorization, or a
    /// provider-side fault). Never used for "no data in range".
    #[error("upstream {exchange} failed: {msg}")]
    Upstream {
        /// Exchange whose connector reported the failure.
        exchange: String,
        /// Human-readable error message.
        msg: String,
        /// Whether retrying the same call later may succeed.
        retryable: bool,
    },

    /// An upstream exchange rejected the call because of its request-rate
    /// ceiling.
    #[error("rate limited by {exchange}: reset_in_ms={reset_in_ms}")]
    RateLimited {
        /// Exchange that reported throttling.
        exchange: String,
        /// Milliseconds until the upstream window is expected to reset.
        reset_in_ms: u64,
    },

    /// The coin is not tradable or listed on the named exchange.
    #[error("coin {coin} unavailable on {exchange}")]
    CoinUnavailable {
        /// Exchange that was asked.
        exchange: String,
        /// Coin symbol that is not served.
        coin: String,
    },

    /// No connector is registered for the requested exchange name.
    #[error("unknown exchange: {exchange}")]
    UnknownExchange {
        /// Exchange name that failed to resolve.
        exchange: String,
    },

    /// The requested capability is not implemented by the target connector.
    #[error("unsupported capability: {capability}")]
    Unsupported {
        /// A capability string describing what was requested (e.g. "history").
        capability: String,
    },

    /// Invalid input argument.
    #[error("invalid argument: {0}")]
    InvalidArg(String),

    /// Issues with returned or expected data (missing fields, bad shapes).
    #[error("data issue: {0}")]
    Data(String),
}

impl CandelaError {
    /// Helper: build a `Storage` error for a store operation.
    pub fn storage(op: impl Into<String>, msg: impl Into<String>) -> Self {
        Self::Storage {
            op: op.into(),
            msg: msg.into(),
        }
    }

    /// Helper: build a non-retryable `Upstream` error.
    pub fn upstream(exchange: impl Into<String>, msg: impl Into<String>) -> Self {
        Self::Upstream {
            exchange: exchange.into(),
            msg: msg.into(),
            retryable: false,
        }
    }

    /// Helper: build a retryable `Upstream` error.
    pub fn upstream_retryable(exchange: impl Into<String>, msg: impl Into<String>) -> Self {
        Self::Upstream {
            exchange: exchange.into(),
            msg: msg.into(),
            retryable: true,
        }
    }

    /// Helper: build a `RateLimited` error.
    pub fn rate_limited(exchange: impl Into<String>, reset_in_ms: u64) -> Self {
        Self::RateLimited {
            exchange: exchange.into(),
            reset_in_ms,
        }
    }

    /// Helper: build a `CoinUnavailable` error.
    pub fn coin_unavailable(exchange: impl Into<String>, coin: impl Into<String>) -> Self {
        Self::CoinUnavailable {
            exchange: exchange.into(),
            coin: coin.into(),
        }
    }

    /// Helper: build an `UnknownExchange` error.
    pub fn unknown_exchange(exchange: impl Into<String>) -> Self {
        Self::UnknownExchange {
            exchange: exchange.into(),
        }
    }

    /// Helper: build an `Unsupported` error for a capability string.
    pub fn unsupported(capability: impl Into<String>) -> Self {
        Self::Unsupported {
            capability: capability.into(),
        }
    }

    /// Helper: build an `InvalidArg` error.
    pub fn invalid_arg(msg: impl Into<String>) -> Self {
        Self::InvalidArg(msg.into())
    }

    /// Returns true for classified upstream failures (`Upstream` and
    /// `RateLimited`).
    ///
    /// Reconciliation recovers from these per gap instead of aborting the
    /// surrounding chunk.
    #[must_use]
    pub const fn is_upstream(&self) -> bool {
        matches!(self, Self::Upstream { .. } | Self::RateLimited { .. })
    }

    /// Returns true if retrying the same call later may succeed.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        match self {
            Self::Upstream { retryable, .. } => *retryable,
            Self::RateLimited { .. } => true,
            _ => false,
        }
    }
}
