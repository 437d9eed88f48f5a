//! Query handle for one game server

use crate::error::{QueryError, Result};
use crate::info::ServerInfo;
use crate::packet::{
    info_request, Datagram, PacketReader, Reassembler, MAX_PACKET_SIZE, S2A_INFO, S2C_CHALLENGE,
};
use log::{debug, trace};
use std::future::Future;
use std::net::{Ipv4Addr, Ipv6Addr, SocketAddr};
use std::time::Duration;
use tokio::net::{lookup_host, UdpSocket};
use tokio::time::timeout;

pub const DEFAULT_TIMEOUT: Duration = Duration::from_millis(5000);

/// Challenge round trips tolerated before giving up on a server
const MAX_CHALLENGES: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeoutKind {
    Send,
    Receive,
    Both,
}

/// A UDP socket bound to one server address, plus the error state of the
/// last operation.
///
/// Dropping the handle releases the socket.
#[derive(Debug)]
pub struct Server {
    host: String,
    addr: SocketAddr,
    socket: UdpSocket,
    send_timeout: Duration,
    recv_timeout: Duration,
    error: Option<String>,
}

impl Server {
    /// Resolves `host` and creates a socket connected to the first resolved
    /// address that can be bound and connected. Later addresses are tried
    /// when an earlier one fails, unless the failure is resource exhaustion.
    ///
    /// Resolution failures come back as [`QueryError::Resolve`], local socket
    /// failures as [`QueryError::Socket`].
    pub async fn new(host: &str, port: u16) -> Result<Self> {
        let resolve_error = |message: String| QueryError::Resolve {
            host: host.to_string(),
            port,
            message,
        };

        let addrs: Vec<SocketAddr> = lookup_host((host, port))
            .await
            .map_err(|e| resolve_error(e.to_string()))?
            .collect();

        let mut last_error = None;
        for addr in addrs {
            match connect(addr).await {
                Ok(socket) => {
                    debug!(
                        "Query socket {} connected to {} ({})",
                        socket.local_addr()?,
                        addr,
                        host
                    );
                    return Ok(Self {
                        host: host.to_string(),
                        addr,
                        socket,
                        send_timeout: DEFAULT_TIMEOUT,
                        recv_timeout: DEFAULT_TIMEOUT,
                        error: None,
                    });
                }
                Err(e) if e.is_resource_exhaustion() => return Err(e),
                Err(e) => {
                    debug!("Skipping {} for {}: {}", addr, host, e);
                    last_error = Some(e);
                }
            }
        }

        Err(last_error.unwrap_or_else(|| resolve_error("no addresses found".to_string())))
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    /// A zero duration disables the timeout for that direction.
    pub fn set_timeout(&mut self, kind: TimeoutKind, duration: Duration) {
        match kind {
            TimeoutKind::Send => self.send_timeout = duration,
            TimeoutKind::Receive => self.recv_timeout = duration,
            TimeoutKind::Both => {
                self.send_timeout = duration;
                self.recv_timeout = duration;
            }
        }
    }

    pub fn timeouts(&self) -> (Duration, Duration) {
        (self.send_timeout, self.recv_timeout)
    }

    /// True when no error has been recorded since the last [`clear_error`].
    ///
    /// [`clear_error`]: Server::clear_error
    pub fn is_ok(&self) -> bool {
        self.error.is_none()
    }

    pub fn last_error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn clear_error(&mut self) {
        self.error = None;
    }

    /// Sends A2S_INFO and waits for the answer, following challenges.
    /// A failure is also recorded in the handle's error state.
    pub async fn info(&mut self) -> Result<ServerInfo> {
        match self.fetch_info().await {
            Ok(info) => Ok(info),
            Err(e) => {
                self.error = Some(e.to_string());
                Err(e)
            }
        }
    }

    async fn fetch_info(&self) -> Result<ServerInfo> {
        let mut challenge = None;

        for _ in 0..=MAX_CHALLENGES {
            self.send(&info_request(challenge)).await?;
            let message = self.receive().await?;

            match message.first() {
                Some(&S2A_INFO) => return ServerInfo::parse(&message),
                Some(&S2C_CHALLENGE) => {
                    let value = PacketReader::new(&message[1..]).read_i32("challenge")?;
                    debug!("Server {} issued challenge 0x{:08X}", self.addr, value as u32);
                    challenge = Some(value);
                }
                Some(&other) => return Err(QueryError::UnexpectedHeader(other)),
                None => return Err(QueryError::Malformed("empty response".to_string())),
            }
        }

        Err(QueryError::ChallengeLoop)
    }

    async fn send(&self, bytes: &[u8]) -> Result<()> {
        trace!("Sending {} bytes to {}", bytes.len(), self.addr);
        bounded("send", self.send_timeout, self.socket.send(bytes)).await?;
        Ok(())
    }

    /// Receives one complete message, reassembling split responses.
    async fn receive(&self) -> Result<Vec<u8>> {
        let mut buffer = [0u8; MAX_PACKET_SIZE * 2];
        let mut reassembler: Option<Reassembler> = None;

        loop {
            let len = bounded("receive", self.recv_timeout, self.socket.recv(&mut buffer)).await?;
            trace!("Received {} bytes from {}", len, self.addr);

            match Datagram::parse(&buffer[..len])? {
                Datagram::Single(message) => return Ok(message),
                Datagram::Fragment(fragment) => {
                    let assembler = reassembler
                        .get_or_insert_with(|| Reassembler::new(fragment.id, fragment.total));
                    if let Some(message) = assembler.push(fragment)? {
                        return Ok(message);
                    }
                }
            }
        }
    }
}

/// Binds an unspecified local address of the same family and connects it
async fn connect(addr: SocketAddr) -> Result<UdpSocket> {
    let local = if addr.is_ipv4() {
        SocketAddr::from((Ipv4Addr::UNSPECIFIED, 0))
    } else {
        SocketAddr::from((Ipv6Addr::UNSPECIFIED, 0))
    };
    let socket = UdpSocket::bind(local).await.map_err(QueryError::Socket)?;
    socket.connect(addr).await?;
    Ok(socket)
}

/// Awaits one socket operation under `limit`. A zero limit waits forever.
async fn bounded<T, F>(operation: &'static str, limit: Duration, future: F) -> Result<T>
where
    F: Future<Output = std::io::Result<T>>,
{
    if limit.is_zero() {
        return Ok(future.await?);
    }
    Ok(timeout(limit, future)
        .await
        .map_err(|_| QueryError::Timeout {
            operation,
            timeout: limit,
        })??)
}
