//! Minimal request shape needed to fingerprint a request

use std::collections::HashMap;

use http::Method;

/// The method, URL and headers of an outgoing request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestDescriptor {
    pub method: String,
    pub url: String,
    pub headers: HashMap<String, String>,
}

impl RequestDescriptor {
    /// Create a request descriptor with no headers
    pub fn new(method: Method, url: impl Into<String>) -> Self {
        Self {
            method: method.as_str().to_string(),
            url: url.into(),
            headers: HashMap::new(),
        }
    }

    /// Shorthand for a GET request
    pub fn get(url: impl Into<String>) -> Self {
        Self::new(Method::GET, url)
    }

    /// Add a header, replacing any previous value with the same name
    #[must_use]
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    /// Case-insensitive header lookup
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    /// Parsed method, if the stored method string is a valid token
    pub fn method(&self) -> Option<Method> {
        Method::from_bytes(self.method.to_ascii_uppercase().as_bytes()).ok()
    }

    /// Returns true for methods whose responses may be served from cache
    pub fn is_cacheable_method(&self) -> bool {
        matches!(self.method(), Some(Method::GET | Method::HEAD))
    }
}
