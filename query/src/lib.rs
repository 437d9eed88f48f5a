//! # A2S Query Library
//!
//! Client side of the Valve server query protocol, limited to the
//! `A2S_INFO` request. A [`Server`] handle owns one UDP socket connected to
//! one game server; [`Server::info`] sends the request, answers challenges,
//! reassembles split responses and parses the payload into [`ServerInfo`].
//!
//! ## Error State
//! Besides returning a [`Result`], every failed query is recorded on the
//! handle. Callers can inspect it with [`Server::is_ok`] and
//! [`Server::last_error`] and reset it with [`Server::clear_error`].
//!
//! ## Timeouts
//! Send and receive waits are bounded separately, see
//! [`Server::set_timeout`]. The default for both is [`DEFAULT_TIMEOUT`].
//!
//! ## Usage Example
//!
//! ```rust,no_run
//! use query::{Server, TimeoutKind};
//! use std::time::Duration;
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let mut server = Server::new("127.0.0.1", 27015).await?;
//!     server.set_timeout(TimeoutKind::Both, Duration::from_millis(1000));
//!
//!     let info = server.info().await?;
//!     println!(
//!         "{} on {} ({}/{})",
//!         String::from_utf8_lossy(&info.name),
//!         String::from_utf8_lossy(&info.map),
//!         info.players,
//!         info.max_players
//!     );
//!     Ok(())
//! }
//! ```

pub mod error;
pub mod info;
pub mod packet;
pub mod server;

pub use error::{QueryError, Result};
pub use info::{Environment, ServerInfo, ServerType, Spectator, TheShip};
pub use server::{Server, TimeoutKind, DEFAULT_TIMEOUT};
