//! Outcome categorization and retry strategy.

use std::time::Duration;

use tokio_retry::strategy::ExponentialBackoff;

use super::types::{Error, Outcome, Result};
use crate::message::Response;

/// Creates an exponential backoff retry strategy.
///
/// Returns a strategy configured with:
/// - Initial delay: `RETRY_INITIAL_DELAY_MS` milliseconds
/// - Backoff factor: `RETRY_FACTOR`
/// - Maximum delay: `RETRY_MAX_DELAY_SECS` seconds
///
/// The iterator yields at most `max_retries` delays, one per retry.
pub fn get_retry_strategy(max_retries: usize) -> impl Iterator<Item = Duration> {
    ExponentialBackoff::from_millis(crate::config::RETRY_INITIAL_DELAY_MS)
        .factor(crate::config::RETRY_FACTOR)
        .max_delay(Duration::from_secs(crate::config::RETRY_MAX_DELAY_SECS))
        .take(max_retries)
}

/// Categorizes the result of an exchange into an [`Outcome`].
pub fn categorize(result: &Result<Response>) -> Outcome {
    match result {
        Ok(response) => categorize_response(response),
        Err(error) => categorize_error(error),
    }
}

/// Categorizes a response by its status code.
pub fn categorize_response(response: &Response) -> Outcome {
    let Some(status) = response.status() else {
        return Outcome::NoStatus;
    };
    match status.as_u16() {
        429 => Outcome::TooManyRequests,
        _ if status.is_client_error() => Outcome::ClientError,
        _ if status.is_server_error() => Outcome::ServerError,
        _ => Outcome::Success,
    }
}

/// Categorizes an exchange error.
pub fn categorize_error(error: &Error) -> Outcome {
    match error {
        Error::Rejected(_) => Outcome::Rejected,
        Error::Cancelled => Outcome::Cancelled,
        Error::DeadlineExceeded => Outcome::DeadlineExceeded,
        Error::Http(e) if e.is_timeout() => Outcome::Timeout,
        Error::Http(e) if e.is_connect() => Outcome::ConnectError,
        _ => Outcome::OtherError,
    }
}
