//! candela-middleware
//!
//! Middleware wrappers for [`candela_core::ExchangeConnector`]
//! implementations. The only wrapper here is the per-exchange upstream
//! throttle: upstream APIs enforce request-rate ceilings independent of how
//! many local client requests are in flight, so the budget lives inside the
//! (wrapped) connector, shared by every caller that holds it.
#![warn(missing_docs)]

mod throttle;

pub use throttle::{Throttle, ThrottledConnector};
