//! Request line parsing and representation.

use crate::parser::error::Error;
use crate::parser::method::Method;
use crate::parser::tokenizer::{split_line, split_tokens};

/// A parsed request line.
///
/// Only the request line is interpreted; headers and body are left on the
/// wire.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    /// The HTTP method (GET, POST, etc.)
    pub method: Method,
    /// The request target, exactly as sent
    pub path: String,
    /// The protocol version token, e.g. `HTTP/1.1`
    pub version: String,
}

impl HttpRequest {
    /// Create a new request from its three components.
    pub fn new(method: Method, path: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            version: version.into(),
        }
    }

    /// The request line as it would appear on the wire, without terminator.
    pub fn request_line(&self) -> String {
        format!("{} {} {}", self.method, self.path, self.version)
    }
}

/// Parse the request line from the start of a request buffer.
///
/// # Arguments
///
/// * `input` - The bytes read from the connection so far
///
/// # Returns
///
/// The parsed request, or an error if the first line is missing or
/// malformed. Bytes after the first line are ignored.
pub fn parse_request(input: &[u8]) -> Result<HttpRequest, Error> {
    if input.is_empty() {
        return Err(Error::EmptyRequest);
    }

    let (line, _rest) = split_line(input).ok_or(Error::MissingLineTerminator)?;
    let line = std::str::from_utf8(line).map_err(|_| Error::InvalidEncoding)?;

    let tokens = split_tokens(line);
    let [method, path, version] = tokens.as_slice() else {
        return Err(Error::MalformedRequestLine(line.to_string()));
    };

    Ok(HttpRequest::new(Method::from(*method), *path, *version))
}
