//! reqchain: ordered, short-circuitable interception of outbound HTTP requests
//!
//! A [`Transport`] runs every request through an ordered list of
//! [`Callback`]s before a [`Sender`] performs the actual exchange. Each
//! callback receives a [`Chain`] through which it can inspect the current
//! request, replace it, and [`proceed`](Chain::proceed) to the rest of the
//! chain, or return a response of its own without proceeding at all.
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use reqchain::callbacks::{AddHeader, LogExchange, Retry};
//! use reqchain::{callback_fn, transport, Callback, Chain, Request, Sender};
//! use reqwest::header::{HeaderName, HeaderValue};
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let callbacks: Vec<Arc<dyn Callback>> = vec![
//!     Arc::new(LogExchange::new()),
//!     Arc::new(Retry::new(2)),
//!     Arc::new(AddHeader::new(
//!         HeaderName::from_static("foo"),
//!         HeaderValue::from_static("bar"),
//!     )),
//!     Arc::new(callback_fn(|chain: Chain| async move {
//!         let request = chain.request().clone();
//!         chain.proceed(request).await
//!     })),
//! ];
//! let transport = transport(callbacks)?;
//!
//! let response = transport
//!     .send(Request::parse(reqwest::Method::GET, "https://example.com/")?)
//!     .await?;
//! println!("{:?} ({} bytes)", response.status(), response.body().len());
//! # Ok(())
//! # }
//! ```
//!
//! # Requirements
//!
//! This library requires a Tokio runtime. Use `#[tokio::main]` in your application
//! or ensure you're calling library functions within an async context.

pub mod app;
pub mod callbacks;
mod chain;
pub mod config;
mod context;
pub mod error_handling;
pub mod initialization;
mod message;
mod transport;

// Re-export public API
pub use app::{run, run_with, ExchangeSummary, RunReport};
pub use chain::{callback_fn, Callback, CallbackFn, Chain};
pub use config::{Config, LogFormat, LogLevel, Opt};
pub use context::{Context, Values};
pub use error_handling::{Error, InitializationError, Outcome, OutcomeStats, Result};
pub use message::{Request, Response};
pub use transport::{transport, with_transport, ReqwestSender, Sender, Transport};
