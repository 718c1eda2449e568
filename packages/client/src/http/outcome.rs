//! Result of a single executor invocation

use std::collections::HashMap;

use bytes::Bytes;
use http::StatusCode;

use crate::error::ErrorKind;

/// Outcome of one request execution, whether it came from the network or
/// was rebuilt from a cache entry.
///
/// A transport-level failure is reported through `error_kind`; the status
/// code is then `0` unless the transport also produced a status.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Outcome {
    pub status_code: u16,
    pub data: Option<Bytes>,
    pub headers: HashMap<String, String>,
    pub error_kind: Option<ErrorKind>,
}

impl Outcome {
    /// Successful response with a body
    pub fn ok(data: impl Into<Bytes>) -> Self {
        Self {
            status_code: 200,
            data: Some(data.into()),
            ..Self::default()
        }
    }

    /// Response with the given status and no body
    pub fn status(status_code: u16) -> Self {
        Self {
            status_code,
            ..Self::default()
        }
    }

    /// Transport failure without any HTTP response
    pub fn failure(kind: ErrorKind) -> Self {
        Self {
            error_kind: Some(kind),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_data(mut self, data: impl Into<Bytes>) -> Self {
        self.data = Some(data.into());
        self
    }

    #[must_use]
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    /// Typed status code, if the stored code is a valid HTTP status
    pub fn status_code(&self) -> Option<StatusCode> {
        StatusCode::from_u16(self.status_code).ok()
    }

    /// True for a 2xx response with no transport error attached
    pub fn is_success(&self) -> bool {
        self.error_kind.is_none() && self.status_code().is_some_and(|s| s.is_success())
    }

    /// True for transport failures and 4xx/5xx responses
    pub fn is_error(&self) -> bool {
        self.error_kind.is_some()
            || self
                .status_code()
                .is_none_or(|s| s.is_client_error() || s.is_server_error())
    }

    /// Case-insensitive header lookup
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    /// Body bytes, empty when the outcome carries none
    pub fn body(&self) -> Bytes {
        self.data.clone().unwrap_or_default()
    }
}
