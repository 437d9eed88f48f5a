//! Error types for the A2S query client

use std::io;
use std::time::Duration;
use thiserror::Error;

/// Result type for query operations
pub type Result<T> = std::result::Result<T, QueryError>;

#[derive(Error, Debug)]
pub enum QueryError {
    /// The local UDP socket could not be created
    #[error("failed to allocate query socket: {0}")]
    Socket(#[source] io::Error),

    /// Hostname lookup failed or produced no usable address
    #[error("failed to resolve {host}:{port}: {message}")]
    Resolve {
        host: String,
        port: u16,
        message: String,
    },

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("timed out after {}ms waiting to {operation}", .timeout.as_millis())]
    Timeout {
        operation: &'static str,
        timeout: Duration,
    },

    /// The response ended before a required field
    #[error("malformed response: {0}")]
    Malformed(String),

    #[error("unexpected response header 0x{0:02X}")]
    UnexpectedHeader(u8),

    #[error("compressed multi-packet responses are not supported")]
    Compressed,

    #[error("server kept answering with challenges")]
    ChallengeLoop,
}

// errno values for exhausted local resources
const ENOMEM: i32 = 12;
const ENFILE: i32 = 23;
const EMFILE: i32 = 24;
#[cfg(target_os = "linux")]
const ENOBUFS: i32 = 105;
#[cfg(not(target_os = "linux"))]
const ENOBUFS: i32 = 55;

/// Out of memory, descriptors or buffer space. Retrying will not help.
fn is_exhausted_io_error(e: &io::Error) -> bool {
    e.kind() == io::ErrorKind::OutOfMemory
        || matches!(e.raw_os_error(), Some(ENOMEM | ENFILE | EMFILE | ENOBUFS))
}

impl QueryError {
    /// True when the local socket could not be created because the process
    /// or system ran out of resources. Any other bind failure, such as an
    /// unsupported address family, is not exhaustion.
    pub fn is_resource_exhaustion(&self) -> bool {
        match self {
            QueryError::Socket(e) => is_exhausted_io_error(e),
            _ => false,
        }
    }
}
