//! Error taxonomy for a probe run

use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, ProbeError>;

/// Process status for every failed run (`-1` as an unsigned byte)
pub const FAILURE_STATUS: u8 = 255;

/// Rejected command-line input. Raised before any network activity.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Server hostname is not set. Specify it with -h.")]
    MissingHost,

    #[error("Server port is not set. Specify it with -p.")]
    MissingPort,

    #[error("Server hostname is {len} bytes long; the limit is {max}.")]
    HostTooLong { len: usize, max: usize },

    #[error("Path given to --{flag} is {len} bytes long; the limit is {max}.")]
    PathTooLong {
        flag: &'static str,
        len: usize,
        max: usize,
    },
}

/// Failure to obtain a connection handle
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum OpenError {
    /// Local resources could not be allocated. Not worth retrying.
    #[error("{0}")]
    Resources(String),

    /// The address could not be resolved or connected to
    #[error("{0}")]
    Address(String),
}

/// Per-field failure while writing an output file. Never fatal.
#[derive(Error, Debug)]
pub enum OutputError {
    #[error("Failed to open {label} file (at {}).", .path.display())]
    Open {
        label: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write {label} file entirely. Out of disk space?")]
    IncompleteWrite {
        label: &'static str,
        #[source]
        source: std::io::Error,
    },
}

#[derive(Error, Debug)]
pub enum ProbeError {
    #[error("Memory exhausted: {0}")]
    FatalAllocation(String),

    /// One failed attempt. Recovered by the retry loop.
    #[error("{0}")]
    ConnectionFailure(String),

    #[error("Retries exhausted after {attempts} attempts. Aborting...")]
    RetriesExhausted { attempts: u64 },

    #[error(transparent)]
    Validation(#[from] ConfigError),

    #[error("{0}")]
    InvalidUsage(String),
}

impl ProbeError {
    pub fn status(&self) -> u8 {
        FAILURE_STATUS
    }
}
