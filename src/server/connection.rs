//! Lifecycle of a single accepted connection.
//!
//! A connection moves through `Reading → Parsing → Dispatching → Writing →
//! Closed`. Errors in any state skip straight to `Closed`. The stream is
//! owned by [`handle_connection`] and released when it returns.
//!
//! Only the request line is read before responding. Whatever the client
//! sent after it is read and discarded before the socket is dropped;
//! closing a TCP socket with unread input makes the kernel reset the
//! connection, and the reset can destroy response bytes still in flight.

use std::io;
use std::time::Duration;

use log::{debug, info, warn};
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};
use tokio::time::timeout;

use crate::parser::{has_line_terminator, parse_request, HttpRequest, Method};
use crate::server::config::ServerConfig;
use crate::server::error::Error;
use crate::server::files::FileResponder;
use crate::server::response::{HttpResponse, StatusCode};

/// Most bytes read and discarded after the response is written.
pub const DRAIN_LIMIT: usize = 64 * 1024;

/// How long to keep reading the rest of a request before closing anyway.
pub const DRAIN_TIMEOUT: Duration = Duration::from_millis(1_000);

const END_OF_HEAD: &[u8] = b"\r\n\r\n";

/// Where a connection is in its lifecycle.
#[derive(Debug)]
pub enum ConnectionState {
    Reading,
    Parsing(Vec<u8>),
    Dispatching(HttpRequest),
    Writing(HttpResponse),
    Closed,
}

/// Serve exactly one request on `stream`, then close it.
///
/// Returns the status that was sent, or `None` when the peer closed the
/// connection before sending anything. Read and write failures are
/// returned as errors; in every case the stream has been shut down and
/// dropped by the time this returns.
///
/// Malformed request lines are answered with `400 Bad Request`.
pub async fn handle_connection<S>(
    mut stream: S,
    config: &ServerConfig,
    files: &FileResponder,
) -> Result<Option<StatusCode>, Error>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    let mut state = ConnectionState::Reading;
    let mut sent = None;
    let mut head = Vec::new();

    let result = loop {
        state = match state {
            ConnectionState::Reading => match read_request_head(&mut stream, config).await {
                Ok(Some(buf)) => {
                    head.extend_from_slice(&buf);
                    ConnectionState::Parsing(buf)
                }
                Ok(None) => {
                    debug!("Peer closed the connection before sending a request");
                    ConnectionState::Closed
                }
                Err(e) => break Err(e),
            },

            ConnectionState::Parsing(buf) => match parse_request(&buf) {
                Ok(request) => ConnectionState::Dispatching(request),
                Err(e) => {
                    warn!("Rejecting malformed request: {}", Error::from(e));
                    ConnectionState::Writing(HttpResponse::bad_request())
                }
            },

            ConnectionState::Dispatching(request) => {
                let response = dispatch(&request, files).await;
                info!(
                    "\"{line}\" {status}",
                    line = request.request_line(),
                    status = response.status.as_u16()
                );
                ConnectionState::Writing(response)
            }

            ConnectionState::Writing(response) => {
                let response = response.with_header("Connection", "close");
                if let Err(e) = write_response(&mut stream, &response, config.write_timeout()).await {
                    break Err(e);
                }
                sent = Some(response.status);
                ConnectionState::Closed
            }

            ConnectionState::Closed => break Ok(sent),
        };
    };

    // Best effort: the peer may already be gone.
    let _ = timeout(config.write_timeout(), stream.shutdown()).await;
    if result.is_ok() && !head.is_empty() {
        let discarded = drain_request(&mut stream, &head).await;
        if discarded > 0 {
            debug!("Discarded {discarded} unread request bytes before closing");
        }
    }
    drop(stream);

    result
}

/// Produce the response for a parsed request.
pub async fn dispatch(request: &HttpRequest, files: &FileResponder) -> HttpResponse {
    match request.method {
        Method::GET => files.respond(request).await,
        ref other => {
            debug!("{}", Error::UnsupportedMethod(other.clone()));
            HttpResponse::not_implemented()
        }
    }
}

/// Read until the request line is complete.
///
/// Stops at the first line terminator, when the buffer of
/// `read_buffer_size` bytes is full, or at end of stream. Returns `None`
/// if the stream ended before any byte arrived.
pub async fn read_request_head<S>(stream: &mut S, config: &ServerConfig) -> Result<Option<Vec<u8>>, Error>
where
    S: AsyncRead + Unpin,
{
    let mut buf = vec![0; config.read_buffer_size];
    let mut filled = 0;

    while filled < buf.len() {
        let n = timeout(config.read_timeout(), stream.read(&mut buf[filled..]))
            .await
            .map_err(|_| Error::Timeout("reading request"))?
            .map_err(Error::Read)?;
        if n == 0 {
            break;
        }
        filled += n;
        if has_line_terminator(&buf[filled - n..filled]) {
            break;
        }
    }

    if filled == 0 {
        return Ok(None);
    }
    buf.truncate(filled);
    Ok(Some(buf))
}

/// Read and discard the rest of a request whose first bytes were `head`.
///
/// Stops at the blank line ending the request head, at end of stream, on a
/// read error, after [`DRAIN_LIMIT`] bytes or after [`DRAIN_TIMEOUT`],
/// whichever comes first. Returns the number of bytes discarded.
pub async fn drain_request<S>(stream: &mut S, head: &[u8]) -> usize
where
    S: AsyncRead + Unpin,
{
    if contains(head, END_OF_HEAD) {
        return 0;
    }

    let mut discarded = 0;
    // The terminator may straddle two reads
    let mut window = head[head.len().saturating_sub(END_OF_HEAD.len() - 1)..].to_vec();
    let mut buf = vec![0u8; 4096];

    let _ = timeout(DRAIN_TIMEOUT, async {
        while discarded < DRAIN_LIMIT {
            let n = match stream.read(&mut buf).await {
                Ok(0) | Err(_) => break,
                Ok(n) => n,
            };
            discarded += n;
            window.extend_from_slice(&buf[..n]);
            if contains(&window, END_OF_HEAD) {
                break;
            }
            window.drain(..window.len().saturating_sub(END_OF_HEAD.len() - 1));
        }
    })
    .await;

    discarded
}

fn contains(haystack: &[u8], needle: &[u8]) -> bool {
    haystack.windows(needle.len()).any(|w| w == needle)
}

/// Serialize `response` and write all of it, retrying short writes.
pub async fn write_response<S>(stream: &mut S, response: &HttpResponse, limit: Duration) -> Result<(), Error>
where
    S: AsyncWrite + Unpin,
{
    let bytes = response.to_bytes();
    timeout(limit, write_fully(stream, &bytes))
        .await
        .map_err(|_| Error::Timeout("writing response"))?
}

async fn write_fully<S>(stream: &mut S, bytes: &[u8]) -> Result<(), Error>
where
    S: AsyncWrite + Unpin,
{
    let mut written = 0;
    while written < bytes.len() {
        let n = stream.write(&bytes[written..]).await.map_err(Error::Write)?;
        if n == 0 {
            return Err(Error::Write(io::Error::from(io::ErrorKind::WriteZero)));
        }
        written += n;
    }
    stream.flush().await.map_err(Error::Write)
}
