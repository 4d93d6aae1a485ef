//! HTTP client initialization.

use std::time::Duration;

use reqwest::ClientBuilder;

use crate::config::{MAX_REDIRECT_HOPS, TCP_CONNECT_TIMEOUT_SECS};

/// Initializes the HTTP client backing the default sender.
///
/// Creates a `reqwest::Client` configured with:
/// - the given User-Agent header
/// - a TCP connect timeout of `TCP_CONNECT_TIMEOUT_SECS`
/// - redirect following (up to `MAX_REDIRECT_HOPS` hops)
///
/// No overall request timeout is set; per-request deadlines travel with each
/// request's context instead.
///
/// # Errors
///
/// Returns a `reqwest::Error` if client creation fails.
pub fn init_client(user_agent: &str) -> Result<reqwest::Client, reqwest::Error> {
    ClientBuilder::new()
        .connect_timeout(Duration::from_secs(TCP_CONNECT_TIMEOUT_SECS))
        .redirect(reqwest::redirect::Policy::limited(MAX_REDIRECT_HOPS))
        .user_agent(user_agent)
        .build()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_client_with_default_user_agent() {
        assert!(init_client(crate::config::DEFAULT_USER_AGENT).is_ok());
    }
}
