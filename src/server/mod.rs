//! Static file server for microserve-rs.
//!
//! This module wires the request line parser to a file responder and runs
//! each accepted connection on its own task.

mod response;
mod config;
mod connection;
mod error;
mod files;
mod http_server;
mod mime;
mod stats;

// Re-export public items
pub use response::{HttpResponse, StatusCode, BAD_REQUEST_BODY, NOT_FOUND_BODY};
pub use config::{ServerConfig, MAX_READ_BUFFER_SIZE};
pub use connection::{
    dispatch, drain_request, handle_connection, read_request_head, write_response, ConnectionState, DRAIN_LIMIT,
    DRAIN_TIMEOUT,
};
pub use error::Error;
pub use files::FileResponder;
pub use http_server::{HttpServer, ShutdownHandle};
pub use mime::{content_type_for, DEFAULT_CONTENT_TYPE};
pub use stats::{ServerStats, StatsSnapshot};
