//! Configuration types and CLI options.
//!
//! This module defines enums and structs used for command-line argument parsing
//! and configuration.

use std::time::Duration;

use reqwest::header::{HeaderName, HeaderValue};
use reqwest::Method;
use strum::VariantNames;
use strum_macros::{EnumString, VariantNames as VariantNamesMacro};
use structopt::StructOpt;

use crate::config::constants::{DEFAULT_USER_AGENT, MAX_CONCURRENCY};

/// Logging level for the application.
///
/// Controls the verbosity of log output, from most restrictive (Error) to most
/// verbose (Trace).
#[derive(Clone, Debug, PartialEq, Eq, EnumString, VariantNamesMacro)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum LogLevel {
    /// Only error messages
    Error,
    /// Error and warning messages
    Warn,
    /// Error, warning, and informational messages
    Info,
    /// All messages except trace
    Debug,
    /// All messages including trace
    Trace,
}

impl From<LogLevel> for log::LevelFilter {
    fn from(l: LogLevel) -> Self {
        match l {
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

/// Log output format.
///
/// Controls how log messages are formatted:
/// - `Plain`: Human-readable format with colors (default)
/// - `Json`: Structured JSON format for machine parsing
#[derive(Clone, Debug, PartialEq, Eq, EnumString, VariantNamesMacro)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum LogFormat {
    /// Human-readable format with colors (default)
    Plain,
    /// Structured JSON format for machine parsing
    Json,
}

/// Parses an HTTP method name such as `GET` or `post`.
pub fn parse_method(s: &str) -> Result<Method, String> {
    Method::from_bytes(s.to_ascii_uppercase().as_bytes())
        .map_err(|e| format!("invalid HTTP method {s:?}: {e}"))
}

/// Parses a `name:value` header argument.
///
/// Whitespace around the name and value is trimmed; the value may itself
/// contain colons.
pub fn parse_header(s: &str) -> Result<(HeaderName, HeaderValue), String> {
    let (name, value) = s
        .split_once(':')
        .ok_or_else(|| format!("invalid header {s:?}: expected name:value"))?;
    let name = HeaderName::from_bytes(name.trim().as_bytes())
        .map_err(|e| format!("invalid header name in {s:?}: {e}"))?;
    let value = HeaderValue::from_str(value.trim())
        .map_err(|e| format!("invalid header value in {s:?}: {e}"))?;
    Ok((name, value))
}

/// Command-line options.
///
/// # Examples
///
/// ```bash
/// # Send two requests with an extra header
/// reqchain https://example.com/ https://example.org/ -H 'x-trace: 1'
///
/// # Show what would be sent without touching the network
/// reqchain https://example.com/ --dry-run --log-level debug
/// ```
#[derive(Debug, StructOpt)]
#[structopt(
    name = "reqchain",
    about = "Sends HTTP requests through an ordered chain of callbacks."
)]
pub struct Opt {
    /// URLs to request
    #[structopt(required = true, min_values = 1)]
    pub urls: Vec<String>,

    /// HTTP method
    #[structopt(short = "X", long, default_value = "GET", parse(try_from_str = parse_method))]
    pub method: Method,

    /// Extra request header as name:value (repeatable)
    #[structopt(short = "H", long = "header", number_of_values = 1, parse(try_from_str = parse_header))]
    pub headers: Vec<(HeaderName, HeaderValue)>,

    /// Request body
    #[structopt(short = "d", long)]
    pub data: Option<String>,

    /// HTTP User-Agent header value
    #[structopt(long, default_value = DEFAULT_USER_AGENT)]
    pub user_agent: String,

    /// Add a realistic browser header set to every request
    #[structopt(long)]
    pub browser_headers: bool,

    /// Refuse requests to this host (repeatable)
    #[structopt(long = "deny-host", number_of_values = 1)]
    pub deny_hosts: Vec<String>,

    /// Retries on connection errors, 429 and 5xx responses (0 disables)
    #[structopt(long, default_value = "0")]
    pub retries: usize,

    /// Per-request deadline in seconds
    #[structopt(long)]
    pub timeout_seconds: Option<u64>,

    /// Answer every request with a synthesized response instead of sending it
    #[structopt(long)]
    pub dry_run: bool,

    /// Maximum concurrent requests
    #[structopt(long, default_value = "10")]
    pub max_concurrency: usize,

    /// Log level: error|warn|info|debug|trace
    #[structopt(long, default_value = "info", possible_values = LogLevel::VARIANTS, case_insensitive = true)]
    pub log_level: LogLevel,

    /// Log format: plain|json
    #[structopt(long, default_value = "plain", possible_values = LogFormat::VARIANTS, case_insensitive = true)]
    pub log_format: LogFormat,
}

/// Library configuration (no CLI dependencies).
///
/// # Examples
///
/// ```no_run
/// use reqchain::Config;
///
/// let config = Config {
///     urls: vec!["https://example.com/".to_string()],
///     retries: 2,
///     ..Default::default()
/// };
/// # let _ = config;
/// ```
#[derive(Debug, Clone)]
pub struct Config {
    /// URLs to request
    pub urls: Vec<String>,

    /// HTTP method for every request
    pub method: Method,

    /// Extra headers added by a callback, in order
    pub headers: Vec<(HeaderName, HeaderValue)>,

    /// Request body
    pub body: Option<String>,

    /// HTTP User-Agent header value
    pub user_agent: String,

    /// Add a realistic browser header set
    pub browser_headers: bool,

    /// Hosts whose requests are refused
    pub deny_hosts: Vec<String>,

    /// Retries on top of the first attempt (0 disables)
    pub retries: usize,

    /// Per-request deadline
    pub timeout: Option<Duration>,

    /// Synthesize responses instead of sending
    pub dry_run: bool,

    /// Maximum concurrent requests
    pub max_concurrency: usize,

    /// Log level
    pub log_level: LogLevel,

    /// Log format
    pub log_format: LogFormat,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            urls: Vec::new(),
            method: Method::GET,
            headers: Vec::new(),
            body: None,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            browser_headers: false,
            deny_hosts: Vec::new(),
            retries: 0,
            timeout: None,
            dry_run: false,
            max_concurrency: MAX_CONCURRENCY,
            log_level: LogLevel::Info,
            log_format: LogFormat::Plain,
        }
    }
}

impl From<Opt> for Config {
    fn from(opt: Opt) -> Self {
        Self {
            urls: opt.urls,
            method: opt.method,
            headers: opt.headers,
            body: opt.data,
            user_agent: opt.user_agent,
            browser_headers: opt.browser_headers,
            deny_hosts: opt.deny_hosts,
            retries: opt.retries,
            timeout: opt.timeout_seconds.map(Duration::from_secs),
            dry_run: opt.dry_run,
            max_concurrency: opt.max_concurrency.max(1),
            log_level: opt.log_level,
            log_format: opt.log_format,
        }
    }
}
