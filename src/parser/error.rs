//! Error types for the request line parser.

use thiserror::Error;

/// Errors that can occur while parsing a request line.
///
/// Every variant means the request is malformed; the server answers all of
/// them with `400 Bad Request`.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum Error {
    /// No bytes were supplied.
    #[error("Empty request")]
    EmptyRequest,

    /// No line terminator was found within the read buffer.
    #[error("Request line is not terminated")]
    MissingLineTerminator,

    /// The request line does not consist of exactly three tokens.
    #[error("Malformed request line: {0}")]
    MalformedRequestLine(String),

    /// The request line is not valid UTF-8.
    #[error("Request line is not valid UTF-8")]
    InvalidEncoding,
}
