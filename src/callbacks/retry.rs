//! Retry callback.

use std::time::Duration;

use futures::future::BoxFuture;
use log::warn;
use tokio_retry::RetryIf;

use crate::chain::{Callback, Chain};
use crate::config::{HTTP_STATUS_TOO_MANY_REQUESTS, RETRY_MAX_ATTEMPTS};
use crate::error_handling::{get_retry_strategy, Error, Result};
use crate::message::Response;

/// Repeats the rest of the chain when an attempt fails transiently.
///
/// An attempt is retried when it errors with [`Error::is_retryable`] or
/// answers with `429` or a `5xx` status. Each retry proceeds with a fresh copy
/// of this step's request, after the next delay of the back-off schedule.
/// When the schedule runs out the last result is returned as is.
///
/// Attempts are driven by `tokio_retry`. Cancelling the request's context
/// stops the whole sequence with [`Error::Cancelled`], including the wait
/// between attempts.
#[derive(Debug, Clone)]
pub struct Retry {
    delays: Vec<Duration>,
}

impl Retry {
    /// Retries up to `max_retries` times on the default exponential back-off.
    pub fn new(max_retries: usize) -> Self {
        Self {
            delays: get_retry_strategy(max_retries).collect(),
        }
    }

    /// Retries once per given delay.
    pub fn with_delays<I>(delays: I) -> Self
    where
        I: IntoIterator<Item = Duration>,
    {
        Self {
            delays: delays.into_iter().collect(),
        }
    }

    /// Maximum number of retries after the first attempt.
    pub fn max_retries(&self) -> usize {
        self.delays.len()
    }

    fn should_retry_status(response: &Response) -> bool {
        response.status().is_some_and(|status| {
            status.as_u16() == HTTP_STATUS_TOO_MANY_REQUESTS || status.is_server_error()
        })
    }
}

impl Default for Retry {
    fn default() -> Self {
        Self::new(RETRY_MAX_ATTEMPTS)
    }
}

/// A failed attempt, kept whole so the last one can be handed back as is.
enum Attempt {
    Status(Response),
    Failed(Error),
}

impl Attempt {
    fn classify(result: Result<Response>) -> std::result::Result<Response, Attempt> {
        match result {
            Ok(response) if Retry::should_retry_status(&response) => {
                Err(Attempt::Status(response))
            }
            Ok(response) => Ok(response),
            Err(e) => Err(Attempt::Failed(e)),
        }
    }

    fn is_retryable(&self) -> bool {
        match self {
            Attempt::Status(_) => true,
            Attempt::Failed(e) => e.is_retryable(),
        }
    }

    fn into_result(self) -> Result<Response> {
        match self {
            Attempt::Status(response) => Ok(response),
            Attempt::Failed(e) => Err(e),
        }
    }
}

impl std::fmt::Display for Attempt {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Attempt::Status(response) => write!(f, "status {:?}", response.status()),
            Attempt::Failed(e) => write!(f, "{e}"),
        }
    }
}

impl Callback for Retry {
    fn call(&self, chain: Chain) -> BoxFuture<'_, Result<Response>> {
        Box::pin(async move {
            let mut retries = 0;
            let attempts = RetryIf::spawn(
                self.delays.clone(),
                || {
                    let attempt = chain.proceed(chain.request().clone());
                    async move { Attempt::classify(attempt.await) }
                },
                |attempt: &Attempt| {
                    if !attempt.is_retryable() {
                        return false;
                    }
                    retries += 1;
                    if let Some(delay) = self.delays.get(retries - 1) {
                        warn!(
                            "Retrying {} {} in {:?} (retry {}/{}): {}",
                            chain.request().method(),
                            chain.request().url(),
                            delay,
                            retries,
                            self.delays.len(),
                            attempt
                        );
                    }
                    true
                },
            );

            tokio::select! {
                result = attempts => result.or_else(Attempt::into_result),
                _ = chain.context().cancelled() => Err(Error::Cancelled),
            }
        })
    }
}
