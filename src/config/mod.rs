//! Configuration and constants.
//!
//! This module provides:
//! - Configuration constants (timeouts, retry strategy, limits)
//! - CLI option types and parsing
//! - Library configuration used by the runner

mod constants;
mod types;

// Re-export all constants
pub use constants::*;
pub use types::{parse_header, parse_method, Config, LogFormat, LogLevel, Opt};
