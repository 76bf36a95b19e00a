//! Server configuration.

use std::net::{Ipv4Addr, SocketAddr};
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;
use tokio::sync::Semaphore;

use crate::server::error::Error;

/// Largest accepted `read_buffer_size`; one buffer is allocated per connection.
pub const MAX_READ_BUFFER_SIZE: usize = 1024 * 1024;

/// HTTP server configuration.
///
/// Every field has a default, so a JSON config file only needs to list the
/// values it changes.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ServerConfig {
    /// The address to bind to.
    pub addr: SocketAddr,
    /// The directory files are served from.
    pub root: PathBuf,
    /// The file served for `/` and for paths ending in `/`.
    pub default_document: String,
    /// The maximum number of concurrent connections.
    pub max_connections: usize,
    /// The read buffer size. Bounds the length of the request line.
    pub read_buffer_size: usize,
    /// How long a single read may wait, in milliseconds.
    pub read_timeout_ms: u64,
    /// How long writing a whole response may take, in milliseconds.
    pub write_timeout_ms: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            addr: SocketAddr::from((Ipv4Addr::LOCALHOST, 8080)),
            root: PathBuf::from("."),
            default_document: "index.html".to_string(),
            max_connections: 1024,
            read_buffer_size: 4096,
            read_timeout_ms: 10_000,
            write_timeout_ms: 10_000,
        }
    }
}

impl ServerConfig {
    /// Load a configuration from a JSON file, filling gaps with defaults.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, Error> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("cannot read {}: {e}", path.display())))?;
        Self::from_json_str(&raw)
    }

    /// Parse a configuration from a JSON document, filling gaps with defaults.
    pub fn from_json_str(raw: &str) -> Result<Self, Error> {
        let config: Self = serde_json::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values the server cannot run with.
    pub fn validate(&self) -> Result<(), Error> {
        if self.max_connections == 0 {
            return Err(Error::Config("max_connections must be at least 1".to_string()));
        }
        if self.max_connections > Semaphore::MAX_PERMITS {
            return Err(Error::Config(format!(
                "max_connections must be at most {}, got {}",
                Semaphore::MAX_PERMITS,
                self.max_connections
            )));
        }
        if self.read_buffer_size == 0 {
            return Err(Error::Config("read_buffer_size must be at least 1".to_string()));
        }
        if self.read_buffer_size > MAX_READ_BUFFER_SIZE {
            return Err(Error::Config(format!(
                "read_buffer_size must be at most {MAX_READ_BUFFER_SIZE}, got {}",
                self.read_buffer_size
            )));
        }
        if self.default_document.is_empty() || self.default_document.contains(|c: char| c == '/' || c == '\\') {
            return Err(Error::Config(format!(
                "default_document must be a plain file name, got {:?}",
                self.default_document
            )));
        }
        Ok(())
    }

    pub fn read_timeout(&self) -> Duration {
        Duration::from_millis(self.read_timeout_ms)
    }

    pub fn write_timeout(&self) -> Duration {
        Duration::from_millis(self.write_timeout_ms)
    }
}
