//! Error types for the HTTP server.

use thiserror::Error;

use crate::parser::{Error as ParserError, Method};

/// Errors that can occur during HTTP server operation.
#[derive(Debug, Error)]
pub enum Error {
    /// The listening socket could not be created or bound. Fatal.
    #[error("Socket setup failed: {0}")]
    SocketSetup(#[source] std::io::Error),

    /// Accepting a connection failed. The accept loop keeps running.
    #[error("Accept failed: {0}")]
    Accept(#[source] std::io::Error),

    /// Reading from a connection failed.
    #[error("Read failed: {0}")]
    Read(#[source] std::io::Error),

    /// Writing to a connection failed or made no progress.
    #[error("Write failed: {0}")]
    Write(#[source] std::io::Error),

    /// A read or write did not finish in time.
    #[error("Timed out while {0}")]
    Timeout(&'static str),

    /// Error parsing the request line.
    #[error("Parse error: {0}")]
    ParseError(#[from] ParserError),

    /// The request used a method other than GET.
    #[error("Unsupported method: {0}")]
    UnsupportedMethod(Method),

    /// Requested file not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Requested path escapes the served root.
    #[error("Path traversal attempt: {0}")]
    PathTraversal(String),

    /// Requested file exists but cannot be read.
    #[error("Permission denied: {0}")]
    PermissionDenied(String),

    /// Invalid server configuration.
    #[error("Configuration error: {0}")]
    Config(String),

    /// JSON deserialization error.
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
}
