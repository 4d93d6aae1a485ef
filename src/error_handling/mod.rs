//! Error handling and exchange statistics.
//!
//! This module provides:
//! - The exchange [`Error`] shared by senders and callbacks
//! - Initialization errors
//! - Outcome categorization and counters
//! - Retry strategy configuration

mod categorization;
mod stats;
mod types;

// Re-export public API
pub use categorization::{categorize, categorize_error, categorize_response, get_retry_strategy};
pub use stats::OutcomeStats;
pub use types::{Error, InitializationError, Outcome, Result};
