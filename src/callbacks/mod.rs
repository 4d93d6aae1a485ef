//! Ready-made callbacks.
//!
//! These are ordinary consumers of the [`Callback`](crate::Callback) contract;
//! the chain itself knows nothing about them.

mod headers;
mod logging;
mod policy;
mod retry;
mod stats;

pub use headers::{AddHeader, BrowserHeaders};
pub use logging::LogExchange;
pub use policy::{DenyHosts, Respond};
pub use retry::Retry;
pub use stats::ExchangeStats;
