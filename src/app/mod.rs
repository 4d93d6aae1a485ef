//! Command-line application.
//!
//! Builds one [`Transport`] from a [`Config`] and sends every configured URL
//! through it with bounded concurrency.

pub mod shutdown;
pub mod statistics;
pub mod url;

use std::sync::Arc;
use std::time::Instant;

use anyhow::{Context as _, Result};
use futures::stream::{self, StreamExt};
use log::{info, warn};
use reqwest::StatusCode;
use tokio_util::sync::CancellationToken;

use crate::callbacks::{
    AddHeader, BrowserHeaders, DenyHosts, ExchangeStats, LogExchange, Respond, Retry,
};
use crate::chain::Callback;
use crate::config::Config;
use crate::context::Context;
use crate::error_handling::{categorize, InitializationError};
use crate::initialization::init_client;
use crate::message::{Request, Response};
use crate::transport::{ReqwestSender, Sender, Transport};

pub use shutdown::{cancel_on_ctrl_c, shutdown_gracefully};
pub use statistics::print_outcome_statistics;
pub use url::normalize_url;

/// Body of the canned response returned in dry-run mode.
pub const DRY_RUN_BODY: &str = "dry run: request not sent";

/// Result of one URL.
#[derive(Debug, Clone)]
pub struct ExchangeSummary {
    /// The URL as given on the command line.
    pub url: String,
    /// Response status, if a response with a status came back.
    pub status: Option<StatusCode>,
    /// Response body length.
    pub bytes: usize,
    /// Error message, if the exchange failed.
    pub error: Option<String>,
    /// Whether the exchange counts as a failure.
    pub failed: bool,
}

/// Results of a run.
#[derive(Debug, Clone)]
pub struct RunReport {
    /// One entry per URL, in completion order.
    pub results: Vec<ExchangeSummary>,
    /// Number of URLs attempted.
    pub total: usize,
    /// Number of URLs that did not fail.
    pub succeeded: usize,
    /// Number of URLs that failed, invalid ones included.
    pub failed: usize,
    /// Wall-clock duration of the run.
    pub elapsed_seconds: f64,
}

impl RunReport {
    /// One-line summary of the run.
    pub fn summary(&self) -> String {
        format!(
            "Sent {} request{} ({} succeeded, {} failed) in {:.1}s",
            self.total,
            if self.total == 1 { "" } else { "s" },
            self.succeeded,
            self.failed,
            self.elapsed_seconds
        )
    }
}

/// Builds the transport for `config`.
///
/// Callback order, outermost first: `ExchangeStats`, `LogExchange`,
/// `DenyHosts`, `Retry`, `BrowserHeaders`, one `AddHeader` per configured
/// header, then `Respond` in dry-run mode.
///
/// # Errors
///
/// Returns an error if the HTTP client cannot be built.
pub fn build_transport(
    config: &Config,
    stats: &ExchangeStats,
) -> Result<Transport, InitializationError> {
    let sender = ReqwestSender::from_client(init_client(&config.user_agent)?);
    Ok(build_transport_with(Arc::new(sender), config, stats))
}

/// Builds the transport for `config` on top of an arbitrary sender.
pub fn build_transport_with(
    sender: Arc<dyn Sender>,
    config: &Config,
    stats: &ExchangeStats,
) -> Transport {
    let mut callbacks: Vec<Arc<dyn Callback>> = vec![
        Arc::new(stats.clone()),
        Arc::new(LogExchange::new()),
    ];
    if !config.deny_hosts.is_empty() {
        callbacks.push(Arc::new(DenyHosts::new(config.deny_hosts.iter().cloned())));
    }
    if config.retries > 0 {
        callbacks.push(Arc::new(Retry::new(config.retries)));
    }
    if config.browser_headers {
        callbacks.push(Arc::new(BrowserHeaders::new()));
    }
    for (name, value) in &config.headers {
        callbacks.push(Arc::new(AddHeader::new(name.clone(), value.clone())));
    }
    if config.dry_run {
        callbacks.push(Arc::new(Respond::new(
            Response::new(StatusCode::OK).with_body(DRY_RUN_BODY),
        )));
    }
    Transport::from_shared(sender, callbacks)
}

/// Sends every URL of `config` and reports the results.
///
/// Ctrl-C cancels all in-flight requests.
///
/// # Errors
///
/// Returns an error if there are no valid URLs or the HTTP client cannot be
/// built. Failed exchanges are reported, not returned as errors.
pub async fn run(config: Config) -> Result<RunReport> {
    let stats = ExchangeStats::new();
    let transport = build_transport(&config, &stats).context("Failed to initialize transport")?;
    run_with(transport, stats, config).await
}

/// Like [`run`], with a prebuilt transport whose counters are `stats`.
pub async fn run_with(transport: Transport, stats: ExchangeStats, config: Config) -> Result<RunReport> {
    let start = Instant::now();
    let cancel = CancellationToken::new();
    let watcher = cancel_on_ctrl_c(cancel.clone());

    let mut results = Vec::with_capacity(config.urls.len());
    let mut targets = Vec::with_capacity(config.urls.len());
    for raw in &config.urls {
        match normalize_url(raw).map(|url| Request::parse(config.method.clone(), &url)) {
            Some(Ok(request)) => targets.push((raw.clone(), request)),
            Some(Err(e)) => results.push(invalid(raw, e.to_string())),
            None => results.push(invalid(raw, "invalid URL".to_string())),
        }
    }
    if targets.is_empty() && !config.urls.is_empty() {
        shutdown_gracefully(cancel, watcher).await;
        anyhow::bail!("No valid URLs to send");
    }
    info!(
        "Sending {} request{} with concurrency {}",
        targets.len(),
        if targets.len() == 1 { "" } else { "s" },
        config.max_concurrency
    );

    let body = config.body.clone().unwrap_or_default();
    let exchanges = stream::iter(targets)
        .map(|(url, request)| {
            let mut context = Context::new().with_cancellation(cancel.child_token());
            if let Some(timeout) = config.timeout {
                context = context.with_timeout(timeout);
            }
            let request = request.with_body(body.clone()).with_context(context);
            let transport = &transport;
            async move {
                let result = transport.send(request).await;
                let failed = categorize(&result).is_failure();
                match result {
                    Ok(response) => ExchangeSummary {
                        url,
                        status: response.status(),
                        bytes: response.body().len(),
                        error: None,
                        failed,
                    },
                    Err(e) => ExchangeSummary {
                        url,
                        status: None,
                        bytes: 0,
                        error: Some(e.to_string()),
                        failed,
                    },
                }
            }
        })
        .buffer_unordered(config.max_concurrency.max(1));
    results.extend(exchanges.collect::<Vec<_>>().await);

    shutdown_gracefully(cancel, watcher).await;

    let total = results.len();
    let failed = results.iter().filter(|r| r.failed).count();
    let elapsed_seconds = start.elapsed().as_secs_f64();
    print_outcome_statistics(stats.stats());

    Ok(RunReport {
        results,
        total,
        succeeded: total - failed,
        failed,
        elapsed_seconds,
    })
}

fn invalid(url: &str, error: String) -> ExchangeSummary {
    warn!("Not sending {url}: {error}");
    ExchangeSummary {
        url: url.to_string(),
        status: None,
        bytes: 0,
        error: Some(error),
        failed: true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::callbacks::testing::ScriptedSender;
    use reqwest::header::{HeaderName, HeaderValue};
    use reqwest::Method;

    fn config(urls: &[&str]) -> Config {
        Config {
            urls: urls.iter().map(|u| u.to_string()).collect(),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_dry_run_never_reaches_sender() {
        let sender = Arc::new(ScriptedSender::default());
        let stats = ExchangeStats::new();
        let mut config = config(&["example.com", "http://example.org/a"]);
        config.dry_run = true;
        let transport = build_transport_with(sender.clone(), &config, &stats);

        let report = run_with(transport, stats.clone(), config).await.unwrap();

        assert_eq!(report.total, 2);
        assert_eq!(report.failed, 0);
        assert!(report
            .results
            .iter()
            .all(|r| r.status == Some(StatusCode::OK) && r.bytes == DRY_RUN_BODY.len()));
        assert_eq!(sender.calls(), 0);
        assert_eq!(stats.stats().total(), 2);
    }

    #[tokio::test]
    async fn test_configured_headers_body_and_method_are_sent() {
        let sender = Arc::new(ScriptedSender::default());
        let stats = ExchangeStats::new();
        let mut config = config(&["http://example.com/submit"]);
        config.method = Method::POST;
        config.body = Some("payload".to_string());
        config.headers = vec![(
            HeaderName::from_static("x-token"),
            HeaderValue::from_static("abc"),
        )];
        let transport = build_transport_with(sender.clone(), &config, &stats);

        let report = run_with(transport, stats, config).await.unwrap();

        assert_eq!(report.succeeded, 1);
        let seen = sender.seen.lock().unwrap().clone();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].method(), &Method::POST);
        assert_eq!(seen[0].headers().get("x-token").unwrap(), "abc");
        assert_eq!(&seen[0].body()[..], b"payload");
    }

    #[tokio::test]
    async fn test_invalid_and_denied_urls_count_as_failures() {
        let sender = Arc::new(ScriptedSender::default());
        let stats = ExchangeStats::new();
        let mut config = config(&["ftp://example.com", "http://blocked.test/", "http://ok.test/"]);
        config.deny_hosts = vec!["blocked.test".to_string()];
        let transport = build_transport_with(sender.clone(), &config, &stats);

        let report = run_with(transport, stats, config).await.unwrap();

        assert_eq!(report.total, 3);
        assert_eq!(report.failed, 2);
        assert_eq!(report.succeeded, 1);
        assert_eq!(sender.calls(), 1);
    }

    #[tokio::test]
    async fn test_no_valid_urls_is_an_error() {
        let sender = Arc::new(ScriptedSender::default());
        let stats = ExchangeStats::new();
        let config = config(&["not a url at all!!!"]);
        let transport = build_transport_with(sender, &config, &stats);

        assert!(run_with(transport, stats, config).await.is_err());
    }

    #[test]
    fn test_summary_line() {
        let report = RunReport {
            results: Vec::new(),
            total: 3,
            succeeded: 2,
            failed: 1,
            elapsed_seconds: 1.26,
        };
        assert_eq!(
            report.summary(),
            "Sent 3 requests (2 succeeded, 1 failed) in 1.3s"
        );

        let single = RunReport { total: 1, succeeded: 1, failed: 0, ..report };
        assert!(single.summary().starts_with("Sent 1 request ("));
    }

    #[test]
    fn test_build_transport_orders_optional_callbacks() {
        let stats = ExchangeStats::new();
        let sender: Arc<dyn Sender> = Arc::new(ScriptedSender::default());
        let plain = build_transport_with(Arc::clone(&sender), &Config::default(), &stats);
        assert_eq!(plain.len(), 2);

        let config = Config {
            retries: 2,
            browser_headers: true,
            dry_run: true,
            deny_hosts: vec!["x.test".to_string()],
            ..Default::default()
        };
        let full = build_transport_with(sender, &config, &stats);
        assert_eq!(full.len(), 6);
    }
}
