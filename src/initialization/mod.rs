//! Shared resource initialization.
//!
//! This module provides functions to initialize:
//! - the HTTP client behind the default sender
//! - the logger

mod client;
mod logger;

// Re-export public API
pub use client::init_client;
pub use logger::init_logger_with;
