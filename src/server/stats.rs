//! Server-wide counters shared by all connection tasks.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::server::response::StatusCode;

/// Connection and response counters.
///
/// Updated from every connection task with relaxed atomics.
#[derive(Debug, Default)]
pub struct ServerStats {
    accepted: AtomicU64,
    rejected: AtomicU64,
    dropped: AtomicU64,
    success: AtomicU64,
    client_errors: AtomicU64,
    server_errors: AtomicU64,
}

/// A point-in-time copy of [`ServerStats`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StatsSnapshot {
    pub accepted: u64,
    pub rejected: u64,
    pub dropped: u64,
    pub success: u64,
    pub client_errors: u64,
    pub server_errors: u64,
}

impl ServerStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_accepted(&self) {
        self.accepted.fetch_add(1, Ordering::Relaxed);
    }

    /// A connection turned away because the server was full.
    pub fn record_rejected(&self) {
        self.rejected.fetch_add(1, Ordering::Relaxed);
    }

    /// A connection closed without a response being written.
    pub fn record_dropped(&self) {
        self.dropped.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_response(&self, status: StatusCode) {
        let counter = match status.as_u16() {
            200..=399 => &self.success,
            400..=499 => &self.client_errors,
            _ => &self.server_errors,
        };
        counter.fetch_add(1, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> StatsSnapshot {
        StatsSnapshot {
            accepted: self.accepted.load(Ordering::Relaxed),
            rejected: self.rejected.load(Ordering::Relaxed),
            dropped: self.dropped.load(Ordering::Relaxed),
            success: self.success.load(Ordering::Relaxed),
            client_errors: self.client_errors.load(Ordering::Relaxed),
            server_errors: self.server_errors.load(Ordering::Relaxed),
        }
    }
}

impl fmt::Display for StatsSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{accepted} connections accepted, {rejected} rejected, {dropped} dropped; \
             responses: {success} ok, {client} client errors, {server} server errors",
            accepted = self.accepted,
            rejected = self.rejected,
            dropped = self.dropped,
            success = self.success,
            client = self.client_errors,
            server = self.server_errors,
        )
    }
}
