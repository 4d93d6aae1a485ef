//! Main application entry point (CLI binary).
//!
//! This is a thin wrapper around the `reqchain` library that handles:
//! - Command-line argument parsing
//! - Logger initialization
//! - User-facing output formatting
//!
//! All core functionality is implemented in the library crate.

use anyhow::{Context, Result};
use std::process;
use structopt::StructOpt;

use reqchain::initialization::init_logger_with;
use reqchain::{run, Config, Opt};

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from(Opt::from_args());

    init_logger_with(config.log_level.clone().into(), config.log_format.clone())
        .context("Failed to initialize logger")?;

    match run(config).await {
        Ok(report) => {
            for result in &report.results {
                match (&result.error, result.status) {
                    (Some(error), _) => println!("ERR {} {}", result.url, error),
                    (None, Some(status)) => {
                        println!("{} {} {}", status.as_u16(), result.url, result.bytes)
                    }
                    (None, None) => println!("--- {} {}", result.url, result.bytes),
                }
            }
            println!("{}", report.summary());
            if report.failed > 0 {
                process::exit(1);
            }
            Ok(())
        }
        Err(e) => {
            eprintln!("reqchain error: {:#}", e);
            process::exit(1);
        }
    }
}
