//! Request/response logging callback.

use std::time::Instant;

use futures::future::BoxFuture;
use log::Level;

use crate::chain::{Callback, Chain};
use crate::error_handling::Result;
use crate::message::Response;

/// Logs each request on the way out and its outcome on the way back.
///
/// Place it first to log what the caller sent and what the caller gets back,
/// or last to log what actually reaches the sender.
#[derive(Debug, Clone)]
pub struct LogExchange {
    level: Level,
}

impl LogExchange {
    /// Logs at `info`; failures are always logged at `warn`.
    pub fn new() -> Self {
        Self { level: Level::Info }
    }

    /// Logs successful exchanges at `level` instead.
    pub fn with_level(level: Level) -> Self {
        Self { level }
    }

    /// Level of the inbound line: the configured one for any response, with
    /// or without a status, and `warn` for errors.
    fn outcome_level(&self, result: &Result<Response>) -> Level {
        match result {
            Ok(_) => self.level,
            Err(_) => Level::Warn,
        }
    }
}

impl Default for LogExchange {
    fn default() -> Self {
        Self::new()
    }
}

impl Callback for LogExchange {
    fn call(&self, chain: Chain) -> BoxFuture<'_, Result<Response>> {
        Box::pin(async move {
            let request = chain.request().clone();
            let method = request.method().clone();
            let url = request.url().clone();
            log::log!(self.level, "--> {} {}", method, url);

            let start = Instant::now();
            let result = chain.proceed(request).await;
            let elapsed_ms = start.elapsed().as_millis();

            let level = self.outcome_level(&result);
            match &result {
                Ok(response) => match response.status() {
                    Some(status) => log::log!(
                        level,
                        "<-- {} {} {} ({} bytes, {}ms)",
                        status.as_u16(),
                        method,
                        url,
                        response.body().len(),
                        elapsed_ms
                    ),
                    None => log::log!(
                        level,
                        "<-- (no status) {} {} ({} bytes, {}ms)",
                        method,
                        url,
                        response.body().len(),
                        elapsed_ms
                    ),
                },
                Err(e) => log::log!(
                    level,
                    "<-- failed {} {} after {}ms: {}",
                    method,
                    url,
                    elapsed_ms,
                    e
                ),
            }
            result
        })
    }
}
