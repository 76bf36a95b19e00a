//! A minimal static file HTTP server.
//!
//! The server answers `GET` requests with files from a single root
//! directory and closes the connection after every response.
//!
//! # Features
//!
//! - Request line parsing with a small, pure tokenizer
//! - Content types picked from the longest matching file suffix
//! - Requests confined to the root directory; `..` and escaping symlinks get a 404
//! - `400`, `404` and `501` responses with consistent `Content-Length`
//! - One task per connection, with a connection cap and read/write timeouts
//! - Graceful shutdown on Ctrl+C or through a [`ShutdownHandle`]
//!
//! # Examples
//!
//! ## Parsing a request line
//!
//! ```
//! use microserve_rs::{parse_request, Method};
//!
//! let request = parse_request(b"GET /index.html HTTP/1.1\r\nHost: example.com\r\n\r\n").unwrap();
//! assert_eq!(request.method, Method::GET);
//! assert_eq!(request.path, "/index.html");
//! assert_eq!(request.version, "HTTP/1.1");
//! ```
//!
//! ## Picking a content type
//!
//! ```
//! use microserve_rs::content_type_for;
//!
//! assert_eq!(content_type_for("app.js"), "application/javascript");
//! assert_eq!(content_type_for("data.json"), "application/json");
//! assert_eq!(content_type_for("README"), "text/plain");
//! ```
//!
//! ## Running a server
//!
//! ```no_run
//! use microserve_rs::{HttpServer, ServerConfig};
//!
//! # async fn run() -> Result<(), microserve_rs::ServerError> {
//! let config = ServerConfig {
//!     root: "./public".into(),
//!     ..ServerConfig::default()
//! };
//!
//! let server = HttpServer::bind(config).await?;
//! server.run_until_ctrl_c().await
//! # }
//! ```

// Export the parser module
pub mod parser;

// Export the server module
pub mod server;

// Re-export commonly used items for convenience
pub use parser::{Error as ParserError, HttpRequest, Method, parse_request};
pub use server::{
    content_type_for, Error as ServerError, FileResponder, HttpResponse, HttpServer, ServerConfig,
    ShutdownHandle, StatusCode,
};
