//! Error type definitions.
//!
//! This module defines the exchange error shared by senders and callbacks, the
//! initialization error, and the outcome categories used for statistics.

use log::SetLoggerError;
use reqwest::Error as ReqwestError;
use strum_macros::EnumIter as EnumIterMacro;
use thiserror::Error;

/// Result of sending a request through a sender or a chain.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Error produced while exchanging a request for a response.
///
/// The chain itself never creates these; it hands back whatever the sender or
/// a callback returned. Callbacks that refuse a request by policy return
/// [`Error::Rejected`], which looks no different to the caller than a network
/// failure.
#[derive(Error, Debug)]
pub enum Error {
    /// The reqwest sender failed (connect, timeout, body, ...).
    #[error("HTTP request error: {0}")]
    Http(#[from] ReqwestError),

    /// The request's context was cancelled.
    #[error("Request cancelled")]
    Cancelled,

    /// The request's context deadline passed.
    #[error("Request deadline exceeded")]
    DeadlineExceeded,

    /// A callback refused the request.
    #[error("Request rejected: {0}")]
    Rejected(String),

    /// The request could not be turned into something the sender understands.
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Any other sender or callback failure.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl Error {
    /// Whether repeating the same request might succeed.
    ///
    /// Only transport failures that happened before or while talking to the
    /// server qualify; policy rejections and cancellation never do.
    pub fn is_retryable(&self) -> bool {
        match self {
            Error::Http(e) => e.is_timeout() || e.is_connect() || e.is_request(),
            _ => false,
        }
    }
}

/// Error types for initialization failures.
#[derive(Error, Debug)]
#[allow(clippy::enum_variant_names)] // All variants end with "Error" by convention
pub enum InitializationError {
    /// Error initializing the logger.
    #[error("Logger initialization error: {0}")]
    LoggerError(#[from] SetLoggerError),

    /// Error initializing the HTTP client.
    #[error("HTTP client initialization error: {0}")]
    HttpClientError(#[from] ReqwestError),
}

/// Category of a finished exchange, as seen by the caller.
///
/// Every outcome of a request falls in exactly one category, whether the
/// response came from the network or was synthesized by a callback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIterMacro)]
pub enum Outcome {
    /// 1xx, 2xx or 3xx status.
    Success,
    /// 429 Too Many Requests.
    TooManyRequests,
    /// Any other 4xx status.
    ClientError,
    /// 5xx status.
    ServerError,
    /// Response without a status code (synthesized by a callback).
    NoStatus,
    /// Refused by a callback.
    Rejected,
    /// Context cancelled.
    Cancelled,
    /// Context deadline passed.
    DeadlineExceeded,
    /// reqwest timed out.
    Timeout,
    /// reqwest could not connect.
    ConnectError,
    /// Anything else.
    OtherError,
}

impl Outcome {
    /// Human-readable label.
    pub fn as_str(&self) -> &'static str {
        match self {
            Outcome::Success => "Success",
            Outcome::TooManyRequests => "Too many requests",
            Outcome::ClientError => "Client error",
            Outcome::ServerError => "Server error",
            Outcome::NoStatus => "No status",
            Outcome::Rejected => "Rejected",
            Outcome::Cancelled => "Cancelled",
            Outcome::DeadlineExceeded => "Deadline exceeded",
            Outcome::Timeout => "Timeout",
            Outcome::ConnectError => "Connect error",
            Outcome::OtherError => "Other error",
        }
    }

    /// Whether this outcome counts as a failed request.
    pub fn is_failure(&self) -> bool {
        !matches!(self, Outcome::Success | Outcome::NoStatus)
    }
}
