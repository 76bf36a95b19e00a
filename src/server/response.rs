//! HTTP response types and serialization.

/// HTTP status codes with their standard reason phrases.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StatusCode {
    Ok = 200,
    BadRequest = 400,
    NotFound = 404,
    NotImplemented = 501,
    ServiceUnavailable = 503,
}

impl StatusCode {
    /// Get the reason phrase for this status code.
    pub fn reason_phrase(&self) -> &'static str {
        match self {
            StatusCode::Ok => "OK",
            StatusCode::BadRequest => "Bad Request",
            StatusCode::NotFound => "Not Found",
            StatusCode::NotImplemented => "Not Implemented",
            StatusCode::ServiceUnavailable => "Service Unavailable",
        }
    }

    /// The numeric status code.
    pub fn as_u16(&self) -> u16 {
        *self as u16
    }
}

/// Body sent with every 404, whatever the underlying cause.
pub const NOT_FOUND_BODY: &str = "<h1>404 Not Found</h1>";

/// Body sent when the request line cannot be parsed.
pub const BAD_REQUEST_BODY: &str = "<h1>400 Bad Request</h1>";

/// Represents an HTTP response.
///
/// Headers are kept in insertion order and serialized in that order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    /// The HTTP status code
    pub status: StatusCode,
    /// The HTTP headers, in insertion order
    pub headers: Vec<(String, String)>,
    /// The response body
    pub body: Vec<u8>,
}

impl HttpResponse {
    /// Create a new HTTP response with the given status code and an empty body.
    pub fn new(status: StatusCode) -> Self {
        Self {
            status,
            headers: vec![("Server".to_string(), "microserve-rs".to_string())],
            body: Vec::new(),
        }
        .with_header("Content-Length", "0")
    }

    /// A `200 OK` response carrying a file's bytes.
    pub fn file(body: Vec<u8>, content_type: &str) -> Self {
        Self::new(StatusCode::Ok)
            .with_content_type(content_type)
            .with_body_bytes(body)
    }

    /// The fixed `404 Not Found` response.
    pub fn not_found() -> Self {
        Self::new(StatusCode::NotFound)
            .with_content_type("text/html")
            .with_body_string(NOT_FOUND_BODY)
    }

    /// The fixed `400 Bad Request` response.
    pub fn bad_request() -> Self {
        Self::new(StatusCode::BadRequest)
            .with_content_type("text/html")
            .with_body_string(BAD_REQUEST_BODY)
    }

    /// The `501 Not Implemented` response, with an empty body.
    pub fn not_implemented() -> Self {
        Self::new(StatusCode::NotImplemented).with_content_type("text/plain")
    }

    /// The `503 Service Unavailable` response sent when the server is full.
    pub fn service_unavailable() -> Self {
        Self::new(StatusCode::ServiceUnavailable)
            .with_content_type("text/plain")
            .with_body_string("Server is at capacity, please try again later")
    }

    /// Set the response body with a string.
    pub fn with_body_string(self, body: impl Into<String>) -> Self {
        self.with_body_bytes(body.into().into_bytes())
    }

    /// Set the response body with bytes.
    pub fn with_body_bytes(mut self, body: impl Into<Vec<u8>>) -> Self {
        self.body = body.into();
        let content_length = self.body.len().to_string();
        self.with_header("Content-Length", content_length)
    }

    /// Add a header, or replace the value of an existing one in place.
    ///
    /// Header names are matched case-insensitively.
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        let name = name.into();
        let value = value.into();
        match self.headers.iter_mut().find(|(k, _)| k.eq_ignore_ascii_case(&name)) {
            Some((_, existing)) => *existing = value,
            None => self.headers.push((name, value)),
        }
        self
    }

    /// Set the content type.
    pub fn with_content_type(self, content_type: impl Into<String>) -> Self {
        self.with_header("Content-Type", content_type)
    }

    /// Get a header value, matching the name case-insensitively.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// Convert the response to bytes.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(128 + self.body.len());

        // Add the status line
        let status_line = format!(
            "HTTP/1.1 {} {}\r\n",
            self.status.as_u16(),
            self.status.reason_phrase()
        );
        bytes.extend_from_slice(status_line.as_bytes());

        // Add the headers
        for (name, value) in &self.headers {
            let header_line = format!("{name}: {value}\r\n");
            bytes.extend_from_slice(header_line.as_bytes());
        }

        // Add the empty line that separates headers from body
        bytes.extend_from_slice(b"\r\n");

        // Add the body
        bytes.extend_from_slice(&self.body);

        bytes
    }
}
