//! Connection management
//!
//! The retry loop talks to the query library through two traits:
//! a [`Connector`] hands out fresh [`QueryConnection`]s, one per attempt.
//! A connection is released by dropping it, so it can only be released once.

use crate::config::ServerAddress;
use crate::error::{OpenError, ProbeError};
use crate::extract::QueryResult;
use log::debug;
use query::{Server, TimeoutKind};
use std::time::Duration;

/// One handle bound to one server address
#[allow(async_fn_in_trait)]
pub trait QueryConnection {
    /// Sets both the send and the receive timeout
    fn configure(&mut self, timeout: Duration);

    /// Runs one info query. A failure also sets the connection's error state.
    async fn query(&mut self) -> Result<QueryResult, ProbeError>;

    fn is_ok(&self) -> bool;

    fn error_message(&self) -> Option<&str>;

    fn clear_error(&mut self);
}

#[allow(async_fn_in_trait)]
pub trait Connector {
    type Connection: QueryConnection;

    async fn open(&self, address: &ServerAddress) -> Result<Self::Connection, OpenError>;
}

/// Opens A2S connections through the `query` crate
#[derive(Debug, Default, Clone, Copy)]
pub struct A2sConnector;

impl Connector for A2sConnector {
    type Connection = A2sConnection;

    async fn open(&self, address: &ServerAddress) -> Result<A2sConnection, OpenError> {
        match Server::new(address.host(), address.port()).await {
            Ok(server) => Ok(A2sConnection { server }),
            Err(e) if e.is_resource_exhaustion() => Err(OpenError::Resources(e.to_string())),
            Err(e) => Err(OpenError::Address(e.to_string())),
        }
    }
}

#[derive(Debug)]
pub struct A2sConnection {
    server: Server,
}

impl QueryConnection for A2sConnection {
    fn configure(&mut self, timeout: Duration) {
        self.server.set_timeout(TimeoutKind::Both, timeout);
    }

    async fn query(&mut self) -> Result<QueryResult, ProbeError> {
        let info = self
            .server
            .info()
            .await
            .map_err(|e| ProbeError::ConnectionFailure(e.to_string()))?;

        debug!(
            "{} answered: protocol {}, {:?} on {:?}, vac {}, password {}, port {:?}, steam id {:?}, game id {:?}",
            self.server.addr(),
            info.protocol,
            info.server_type,
            info.environment,
            info.vac,
            info.visibility,
            info.port,
            info.steam_id,
            info.game_id
        );

        Ok(QueryResult::from(info))
    }

    fn is_ok(&self) -> bool {
        self.server.is_ok()
    }

    fn error_message(&self) -> Option<&str> {
        self.server.last_error()
    }

    fn clear_error(&mut self) {
        self.server.clear_error();
    }
}
