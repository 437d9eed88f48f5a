//! # A2S Probe
//!
//! Queries one game server for its status, writes selected fields to files
//! and turns one statistic into the process exit code. Meant for health
//! checks and monitoring scripts that only look at `$?` and a few files.
//!
//! ## Pipeline
//!
//! A run is one linear sequence:
//!
//! 1. [`cli`] parses the command line into an immutable
//!    [`config::ProbeConfig`]. Missing or over-long values stop the run here,
//!    before any packet is sent.
//! 2. [`retry::RetryController`] opens a fresh connection through a
//!    [`connection::Connector`] for every attempt, configures its timeout and
//!    queries the server until one attempt succeeds or the retry budget is
//!    spent.
//! 3. [`extract::QueryResult`] exposes the response fields by name.
//! 4. [`output::dispatch`] writes the requested text fields to their files.
//!    Failures here are reported per field and never abort the run.
//! 5. [`exit_code::ReturnSelector`] picks the statistic that becomes the exit
//!    code, clamped to zero.
//!
//! The connection and the result are owned by the run and dropped before
//! [`run`] returns, on every path.
//!
//! ## Concurrency
//! There is exactly one network operation in flight at any time. Each
//! send and receive is bounded by the configured timeout; there is no other
//! cancellation.
//!
//! ## Usage Example
//!
//! ```rust,no_run
//! use probe::connection::A2sConnector;
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() {
//!     let argv = ["a2s-probe", "-h", "127.0.0.1", "-p", "27015", "-c", "2"];
//!     let Ok(Some(config)) = probe::cli::parse(argv) else {
//!         return;
//!     };
//!     match probe::run(&config, &A2sConnector).await {
//!         Ok(report) => println!("{} players", report.return_code),
//!         Err(e) => eprintln!("query failed: {}", e),
//!     }
//! }
//! ```

pub mod cli;
pub mod config;
pub mod connection;
pub mod error;
pub mod exit_code;
pub mod extract;
pub mod output;
pub mod retry;

use config::ProbeConfig;
use connection::Connector;
use error::Result;
use log::{debug, info};
use retry::{RetryController, Success};

/// What a completed run produced
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunReport {
    /// Selected statistic, already clamped to zero
    pub return_code: i64,
    pub attempts: u64,
    /// Output fields that could not be written
    pub output_failures: usize,
}

/// Runs the query pipeline for one configuration
pub async fn run<C: Connector>(config: &ProbeConfig, connector: &C) -> Result<RunReport> {
    let Success {
        connection,
        result,
        attempts,
    } = RetryController::new(connector, &config.query)
        .run(&config.address)
        .await?;
    debug!(
        "Query of {} succeeded after {} attempt(s)",
        config.address, attempts
    );

    let failures = output::dispatch(&config.outputs, &result);

    let return_code = config.selector.return_code(&result);
    info!("(returned {})", return_code);

    drop(result);
    drop(connection);

    Ok(RunReport {
        return_code,
        attempts,
        output_failures: failures.len(),
    })
}
