use std::fmt;
use std::io;

use serde::{Deserialize, Serialize};

/// Classification of a failed executor invocation.
///
/// Carried inside an [`Outcome`](crate::http::Outcome) so that retry and
/// cache decisions never need the transport's own error object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorKind {
    /// Request or response timeout
    Timeout,
    /// Connection establishment or reset
    Connection,
    /// DNS resolution failure
    Dns,
    /// TLS handshake failure
    Tls,
    /// Any other transient network failure
    Network,
    /// Server answered with a 5xx status
    ServerError,
    /// Server answered with a 4xx status
    ClientError,
    /// Credentials rejected or missing
    Authentication,
    /// Request could not be built or was rejected as malformed
    MalformedRequest,
    /// The request was cancelled before it completed
    Cancelled,
    /// Response body could not be decoded
    Decode,
    Unknown,
}

impl ErrorKind {
    /// Returns true if the error is related to a timeout.
    #[must_use]
    pub fn is_timeout(self) -> bool {
        matches!(self, ErrorKind::Timeout)
    }

    /// Returns true if the error happened while establishing a connection.
    #[must_use]
    pub fn is_connection_failure(self) -> bool {
        matches!(self, ErrorKind::Connection | ErrorKind::Dns)
    }

    /// Errors that describe a problem with the request itself. Repeating the
    /// same request cannot fix them.
    #[must_use]
    pub fn is_permanent(self) -> bool {
        matches!(
            self,
            ErrorKind::Authentication | ErrorKind::MalformedRequest | ErrorKind::Cancelled
        )
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorKind::Timeout => f.write_str("request timeout"),
            ErrorKind::Connection => f.write_str("connection error"),
            ErrorKind::Dns => f.write_str("dns resolution error"),
            ErrorKind::Tls => f.write_str("tls handshake error"),
            ErrorKind::Network => f.write_str("network error"),
            ErrorKind::ServerError => f.write_str("HTTP status server error"),
            ErrorKind::ClientError => f.write_str("HTTP status client error"),
            ErrorKind::Authentication => f.write_str("authentication error"),
            ErrorKind::MalformedRequest => f.write_str("malformed request"),
            ErrorKind::Cancelled => f.write_str("request cancelled"),
            ErrorKind::Decode => f.write_str("error decoding response body"),
            ErrorKind::Unknown => f.write_str("unknown error"),
        }
    }
}

/// A Result alias for cache storage operations.
pub type StorageResult<T> = std::result::Result<T, StorageError>;

/// Failures inside the cache tiers.
///
/// These never leave the cache: every occurrence is logged and the
/// operation degrades to a miss or a no-op store.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("storage i/o error: {0}")]
    Io(#[from] io::Error),

    #[error("entry serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("payload compression failed: {0}")]
    Compression(String),

    #[error("corrupted cache entry for key {0}")]
    Corrupted(String),

    #[error("invalid storage key: {0}")]
    InvalidKey(String),
}

/// Returned by the cancellable retry entry point when the caller's cancel
/// signal fired before a terminal outcome was reached.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("retry loop cancelled by caller")]
pub struct Cancelled;
