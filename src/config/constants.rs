//! Configuration constants.
//!
//! This module defines the constants used as defaults throughout the crate.

/// Maximum number of requests the CLI keeps in flight at once.
pub const MAX_CONCURRENCY: usize = 10;

// Network operation timeouts
/// TCP connection timeout in seconds for the default client
pub const TCP_CONNECT_TIMEOUT_SECS: u64 = 5;

/// Default User-Agent string for HTTP requests.
///
/// Users can override this via the `--user-agent` CLI flag.
pub const DEFAULT_USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/131.0.0.0 Safari/537.36";

// Redirect handling
/// Maximum number of redirect hops the default client follows
pub const MAX_REDIRECT_HOPS: usize = 10;

// Retry strategy
/// Initial delay in milliseconds before first retry
pub const RETRY_INITIAL_DELAY_MS: u64 = 500;
/// Factor by which retry delay is multiplied on each attempt
pub const RETRY_FACTOR: u64 = 2;
/// Maximum delay between retries in seconds
pub const RETRY_MAX_DELAY_SECS: u64 = 20;
/// Default number of retries for the `Retry` callback (on top of the first attempt)
pub const RETRY_MAX_ATTEMPTS: usize = 3;

/// HTTP status code for Too Many Requests
pub const HTTP_STATUS_TOO_MANY_REQUESTS: u16 = 429;
