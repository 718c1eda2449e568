//! Cache entry management with TTL and access tracking
//!
//! Provides `CacheEntry` for storing response payloads with the metadata
//! needed to rebuild an `Outcome`, plus the access bookkeeping used by
//! frequency- and recency-based eviction.

use std::collections::HashMap;

use bytes::Bytes;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::StorageResult;
use crate::http::Outcome;
use crate::http::compression::decompress_gzip;

/// Status and headers of the cached response
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResponseMetadata {
    pub status_code: u16,
    pub headers: HashMap<String, String>,
}

/// Cached response entry with metadata
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheEntry {
    /// Storage key this entry was written under
    pub key: String,
    /// Response body, gzip-compressed when `is_compressed` is set
    #[serde(with = "payload_base64")]
    pub payload: Bytes,
    pub response_metadata: ResponseMetadata,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
    pub access_count: u64,
    pub last_accessed_at: DateTime<Utc>,
    pub is_compressed: bool,
}

impl CacheEntry {
    /// Create a new entry. `expires_at` must be strictly after `created_at`.
    pub fn new(
        key: String,
        payload: Bytes,
        response_metadata: ResponseMetadata,
        created_at: DateTime<Utc>,
        expires_at: DateTime<Utc>,
        is_compressed: bool,
    ) -> Self {
        debug_assert!(expires_at > created_at);
        Self {
            key,
            payload,
            response_metadata,
            created_at,
            expires_at,
            access_count: 0,
            last_accessed_at: created_at,
            is_compressed,
        }
    }

    /// An entry is logically absent once `now` has passed its expiry
    #[inline]
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now > self.expires_at
    }

    /// Record a cache hit
    pub fn record_access(&mut self, now: DateTime<Utc>) {
        self.access_count += 1;
        self.last_accessed_at = now;
    }

    /// Bytes charged against tier capacity
    pub fn size_bytes(&self) -> u64 {
        let header_bytes: usize = self
            .response_metadata
            .headers
            .iter()
            .map(|(name, value)| name.len() + value.len())
            .sum();
        (self.payload.len() + header_bytes + self.key.len()) as u64
    }

    /// Copy of this entry with the payload decompressed
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Compression` if a compressed payload is corrupt.
    pub fn decoded(&self) -> StorageResult<Self> {
        if !self.is_compressed {
            return Ok(self.clone());
        }
        let payload = Bytes::from(decompress_gzip(&self.payload)?);
        Ok(Self {
            payload,
            is_compressed: false,
            ..self.clone()
        })
    }

    /// Rebuild a response outcome from a decoded entry
    pub fn to_outcome(&self) -> Outcome {
        Outcome {
            status_code: self.response_metadata.status_code,
            data: Some(self.payload.clone()),
            headers: self.response_metadata.headers.clone(),
            error_kind: None,
        }
    }

    /// Remaining lifetime at `now`, zero once expired
    pub fn time_to_live(&self, now: DateTime<Utc>) -> std::time::Duration {
        (self.expires_at - now).to_std().unwrap_or_default()
    }
}

mod payload_base64 {
    use base64::Engine;
    use base64::engine::general_purpose::STANDARD;
    use bytes::Bytes;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(payload: &Bytes, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&STANDARD.encode(payload))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Bytes, D::Error> {
        let encoded = String::deserialize(deserializer)?;
        STANDARD
            .decode(encoded.as_bytes())
            .map(Bytes::from)
            .map_err(serde::de::Error::custom)
    }
}
