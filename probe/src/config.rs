//! Validated run configuration
//!
//! Everything the command line can set ends up in one [`ProbeConfig`],
//! built once and passed by reference through the pipeline. Length limits
//! are checked here and rejected outright; nothing is silently truncated.

use crate::error::ConfigError;
use crate::exit_code::ReturnSelector;
use crate::extract::TextField;
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const DEFAULT_TIMEOUT_MS: u64 = 1000;
pub const DEFAULT_RETRY_COUNT: u32 = 3;

/// Longest accepted hostname, in bytes
pub const MAX_HOST_LEN: usize = 63;
/// Longest accepted output path, in bytes
pub const MAX_PATH_LEN: usize = 255;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerAddress {
    host: String,
    port: u16,
}

impl ServerAddress {
    pub fn new(host: &str, port: u16) -> Result<Self, ConfigError> {
        if host.is_empty() {
            return Err(ConfigError::MissingHost);
        }
        if host.len() > MAX_HOST_LEN {
            return Err(ConfigError::HostTooLong {
                len: host.len(),
                max: MAX_HOST_LEN,
            });
        }
        if port == 0 {
            return Err(ConfigError::MissingPort);
        }

        Ok(Self {
            host: host.to_string(),
            port,
        })
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn port(&self) -> u16 {
        self.port
    }
}

impl std::fmt::Display for ServerAddress {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.host, self.port)
    }
}

/// Timeout and retry budget for the query loop
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QueryConfig {
    timeout: Duration,
    retries: u32,
}

impl QueryConfig {
    pub fn new(timeout_ms: u64, retries: u32) -> Self {
        Self {
            timeout: Duration::from_millis(timeout_ms),
            retries,
        }
    }

    /// Applies to both send and receive. Zero means no deadline.
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub fn retries(&self) -> u32 {
        self.retries
    }

    /// Total attempts, the first one included
    pub fn attempts(&self) -> u64 {
        u64::from(self.retries) + 1
    }
}

impl Default for QueryConfig {
    fn default() -> Self {
        Self::new(DEFAULT_TIMEOUT_MS, DEFAULT_RETRY_COUNT)
    }
}

/// Destination file for each text field. `None` means the field is not
/// written.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OutputTargets {
    pub name: Option<PathBuf>,
    pub map: Option<PathBuf>,
    pub folder: Option<PathBuf>,
    pub game: Option<PathBuf>,
    pub version: Option<PathBuf>,
    pub keywords: Option<PathBuf>,
}

impl OutputTargets {
    pub fn get(&self, field: TextField) -> Option<&Path> {
        let path = match field {
            TextField::Name => &self.name,
            TextField::Map => &self.map,
            TextField::Folder => &self.folder,
            TextField::Game => &self.game,
            TextField::Version => &self.version,
            TextField::Keywords => &self.keywords,
        };
        path.as_deref()
    }

    pub fn set(&mut self, field: TextField, path: Option<PathBuf>) -> Result<(), ConfigError> {
        // An empty path means "not set"
        let path = path.filter(|p| !p.as_os_str().is_empty());

        if let Some(p) = &path {
            let len = p.as_os_str().len();
            if len > MAX_PATH_LEN {
                return Err(ConfigError::PathTooLong {
                    flag: field.flag(),
                    len,
                    max: MAX_PATH_LEN,
                });
            }
        }

        match field {
            TextField::Name => self.name = path,
            TextField::Map => self.map = path,
            TextField::Folder => self.folder = path,
            TextField::Game => self.game = path,
            TextField::Version => self.version = path,
            TextField::Keywords => self.keywords = path,
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeConfig {
    pub address: ServerAddress,
    pub query: QueryConfig,
    pub outputs: OutputTargets,
    pub selector: ReturnSelector,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_address_requires_host() {
        assert_eq!(
            ServerAddress::new("", 27015),
            Err(ConfigError::MissingHost)
        );
    }

    #[test]
    fn test_address_requires_port() {
        assert_eq!(
            ServerAddress::new("game.example.com", 0),
            Err(ConfigError::MissingPort)
        );
    }

    #[test]
    fn test_host_length_limit() {
        let at_limit = "a".repeat(MAX_HOST_LEN);
        assert!(ServerAddress::new(&at_limit, 27015).is_ok());

        let over = "a".repeat(MAX_HOST_LEN + 1);
        assert_eq!(
            ServerAddress::new(&over, 27015),
            Err(ConfigError::HostTooLong {
                len: MAX_HOST_LEN + 1,
                max: MAX_HOST_LEN
            })
        );
    }

    #[test]
    fn test_address_display() {
        let address = ServerAddress::new("game.example.com", 27015).unwrap();
        assert_eq!(address.to_string(), "game.example.com:27015");
        assert_eq!(address.host(), "game.example.com");
        assert_eq!(address.port(), 27015);
    }

    #[test]
    fn test_query_config_attempts() {
        assert_eq!(QueryConfig::new(1000, 0).attempts(), 1);
        assert_eq!(QueryConfig::default().attempts(), 4);
        assert_eq!(QueryConfig::new(1000, u32::MAX).attempts(), u64::from(u32::MAX) + 1);
        assert_eq!(QueryConfig::default().timeout(), Duration::from_millis(1000));
    }

    #[test]
    fn test_empty_output_path_is_unset() {
        let mut targets = OutputTargets::default();
        targets.set(TextField::Map, Some(PathBuf::new())).unwrap();
        assert_eq!(targets.get(TextField::Map), None);

        targets
            .set(TextField::Map, Some(PathBuf::from("map.txt")))
            .unwrap();
        assert_eq!(targets.get(TextField::Map), Some(Path::new("map.txt")));
    }

    #[test]
    fn test_output_path_length_limit() {
        let mut targets = OutputTargets::default();
        let long = PathBuf::from("x".repeat(MAX_PATH_LEN + 1));
        assert_eq!(
            targets.set(TextField::Keywords, Some(long)),
            Err(ConfigError::PathTooLong {
                flag: "keywords-file",
                len: MAX_PATH_LEN + 1,
                max: MAX_PATH_LEN
            })
        );
        assert_eq!(targets.get(TextField::Keywords), None);
    }
}
