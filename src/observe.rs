//! Per-request observation.
//!
//! The connection layer invokes an optional [`RequestObserver`] after each
//! response is produced. Request handling is correct whether or not an
//! observer is attached; observers see an immutable record and cannot change
//! the response.

use chrono::{DateTime, Utc};

use crate::http::request::Method;
use crate::http::response::StatusCode;

/// What happened to one request.
#[derive(Debug, Clone)]
pub struct RequestRecord {
    pub method: Method,
    /// The raw request path as the client sent it.
    pub path: String,
    pub status: StatusCode,
    pub timestamp: DateTime<Utc>,
}

/// Observer invoked once per handled request.
pub trait RequestObserver: Send + Sync {
    fn on_response(&self, record: &RequestRecord);
}

/// Default observer: one structured log line per request.
pub struct LogObserver;

impl RequestObserver for LogObserver {
    fn on_response(&self, record: &RequestRecord) {
        tracing::info!(
            method = record.method.as_str(),
            path = %record.path,
            status = record.status.as_u16(),
            timestamp = %record.timestamp.to_rfc3339(),
            "request handled"
        );
    }
}
