//! Multi-tier HTTP response caching
//!
//! This module provides the response cache used in front of the retry
//! orchestrator:
//! - SHA-256 cache keys over method, normalized URL and variant headers
//! - A byte-bounded memory tier with pluggable eviction (LRU, LFU, FIFO, TTL-first)
//! - A persistent tier over any [`StorageBackend`], with promotion into memory
//! - TTL expiry on every read path plus a periodic background sweep
//! - Optional gzip compression of large payloads

pub mod cache_config;
pub mod cache_entry;
pub mod cache_key;
pub mod clock;
pub mod eviction_policy;
pub mod response_cache;
pub mod storage;
mod tiers;

// Re-export all public types and functions
pub use cache_config::{CacheConfig, TierStrategy};
pub use cache_entry::{CacheEntry, ResponseMetadata};
pub use cache_key::CacheKey;
pub use clock::{Clock, ManualClock, SystemClock};
pub use eviction_policy::{EvictionCandidate, EvictionPolicy};
pub use response_cache::ResponseCache;
pub use storage::{FileSystemBackend, MemoryBackend, StorageBackend};
