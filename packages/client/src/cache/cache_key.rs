//! Cache key generation and hashing for HTTP responses
//!
//! Provides `CacheKey` for generating consistent cache keys based on
//! request method, normalized URL, and cache-relevant headers.
//!
//! Credentials are never part of the key: `Authorization`, `Cookie` and
//! `Proxy-Authorization` are dropped, so callers with different credentials
//! share one entry for the same resource.

use std::collections::BTreeMap;

use ring::digest::{SHA256, digest};
use url::Url;

use crate::http::RequestDescriptor;

/// Headers that select between response variants.
const KEYED_HEADERS: [&str; 5] = [
    "accept",
    "accept-encoding",
    "accept-language",
    "content-type",
    "user-agent",
];

/// Cache key for HTTP responses based on method, URL and headers
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    /// Upper-cased HTTP method
    pub method: String,
    /// Normalized request URL
    pub url: String,
    /// Lower-cased header names mapped to trimmed values, sorted by name
    pub cache_headers: BTreeMap<String, String>,
}

impl CacheKey {
    /// Create cache key from request components
    pub fn new(method: &str, url: &str, headers: &[(&str, &str)]) -> Self {
        let cache_headers = headers
            .iter()
            .filter_map(|(name, value)| keyed_header(name, value))
            .collect();

        Self {
            method: method.trim().to_ascii_uppercase(),
            url: normalize_url(url),
            cache_headers,
        }
    }

    /// Create cache key from a request descriptor
    pub fn from_request(request: &RequestDescriptor) -> Self {
        let cache_headers = request
            .headers
            .iter()
            .filter_map(|(name, value)| keyed_header(name, value))
            .collect();

        Self {
            method: request.method.trim().to_ascii_uppercase(),
            url: normalize_url(&request.url),
            cache_headers,
        }
    }

    /// Generate the fixed-length storage key: hex-encoded SHA-256 of the
    /// canonical form.
    pub fn hash_key(&self) -> String {
        hex::encode(digest(&SHA256, self.canonical().as_bytes()).as_ref())
    }

    fn canonical(&self) -> String {
        let mut canonical = String::with_capacity(self.url.len() + 64);
        canonical.push_str(&self.method);
        canonical.push('\n');
        canonical.push_str(&self.url);
        for (name, value) in &self.cache_headers {
            canonical.push('\n');
            canonical.push_str(name);
            canonical.push(':');
            canonical.push_str(value);
        }
        canonical
    }
}

fn keyed_header(name: &str, value: &str) -> Option<(String, String)> {
    let name = name.trim().to_ascii_lowercase();
    if KEYED_HEADERS.contains(&name.as_str()) {
        Some((name, value.trim().to_string()))
    } else {
        None
    }
}

/// Normalize a URL for key derivation.
///
/// Scheme and host are lower-cased and default ports dropped by the parser;
/// the fragment is removed and query pairs are sorted. Strings that do not
/// parse as absolute URLs are only trimmed.
pub fn normalize_url(raw: &str) -> String {
    let trimmed = raw.trim();
    let Ok(mut url) = Url::parse(trimmed) else {
        return trimmed.to_string();
    };

    url.set_fragment(None);

    let mut pairs: Vec<(String, String)> = url
        .query_pairs()
        .map(|(k, v)| (k.into_owned(), v.into_owned()))
        .collect();
    if pairs.is_empty() {
        url.set_query(None);
    } else {
        pairs.sort();
        url.query_pairs_mut().clear().extend_pairs(pairs);
    }

    url.into()
}
