//! Retry controller
//!
//! Drives attempts until one succeeds or the budget is spent:
//!
//! ```text
//! Idle -> Attempting -> Succeeded
//!            |  ^   \-> FatalError   (resources could not be allocated)
//!            v  |
//!          failure   -> Exhausted    (attempt counter passed the retry count)
//! ```
//!
//! Every attempt opens a brand new connection and a failed one is dropped
//! before the next is opened, so its error state never leaks into the next
//! attempt. Retries are immediate.

use crate::config::{QueryConfig, ServerAddress};
use crate::connection::{Connector, QueryConnection};
use crate::error::{OpenError, ProbeError, Result};
use crate::extract::QueryResult;
use log::{debug, error, warn};

/// Result of one open-configure-query cycle
pub enum AttemptOutcome<C> {
    Success { connection: C, result: QueryResult },
    /// No connection could be opened to the address
    OpenFailed(String),
    /// The query failed or left the connection in an error state
    Failure(String),
}

/// The live connection and response of a successful run
#[derive(Debug)]
pub struct Success<C> {
    pub connection: C,
    pub result: QueryResult,
    /// Attempts made, the successful one included
    pub attempts: u64,
}

pub struct RetryController<'a, C: Connector> {
    connector: &'a C,
    config: &'a QueryConfig,
}

impl<'a, C: Connector> RetryController<'a, C> {
    pub fn new(connector: &'a C, config: &'a QueryConfig) -> Self {
        Self { connector, config }
    }

    /// One attempt. Only resource exhaustion is returned as an error; every
    /// other failure is an [`AttemptOutcome::OpenFailed`] or
    /// [`AttemptOutcome::Failure`].
    pub async fn attempt(
        &self,
        address: &ServerAddress,
    ) -> Result<AttemptOutcome<C::Connection>> {
        let mut connection = match self.connector.open(address).await {
            Ok(connection) => connection,
            Err(OpenError::Resources(message)) => {
                return Err(ProbeError::FatalAllocation(message));
            }
            Err(OpenError::Address(message)) => {
                return Ok(AttemptOutcome::OpenFailed(message));
            }
        };

        connection.configure(self.config.timeout());

        let outcome = connection.query().await;
        match outcome {
            Ok(result) if connection.is_ok() => {
                Ok(AttemptOutcome::Success { connection, result })
            }
            outcome => {
                let message = match outcome {
                    Err(e) => e.to_string(),
                    Ok(_) => connection
                        .error_message()
                        .unwrap_or("unknown error")
                        .to_string(),
                };
                connection.clear_error();
                drop(connection);
                Ok(AttemptOutcome::Failure(message))
            }
        }
    }

    pub async fn run(&self, address: &ServerAddress) -> Result<Success<C::Connection>> {
        let total = self.config.attempts();
        let mut attempt: u64 = 0;

        loop {
            debug!("Querying {} (attempt {} of {})", address, attempt + 1, total);

            match self.attempt(address).await {
                Ok(AttemptOutcome::Success { connection, result }) => {
                    return Ok(Success {
                        connection,
                        result,
                        attempts: attempt + 1,
                    });
                }
                Ok(AttemptOutcome::OpenFailed(message)) => {
                    warn!(
                        "Failed to initialize server connection: {}: {}",
                        address.host(),
                        message
                    );
                }
                Ok(AttemptOutcome::Failure(message)) => {
                    warn!(
                        "Failed to connect (attempt {} of {}): {}",
                        attempt + 1,
                        total,
                        message
                    );
                }
                Err(e) => {
                    error!("{}", e);
                    return Err(e);
                }
            }

            attempt += 1;
            if attempt > u64::from(self.config.retries()) {
                let err = ProbeError::RetriesExhausted { attempts: attempt };
                error!("{}", err);
                return Err(err);
            }
        }
    }
}
