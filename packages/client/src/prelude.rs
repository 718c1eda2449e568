//! Harbor client prelude
//!
//! The types most callers need to configure and drive the cache and the
//! retry orchestrator.

// Request and outcome model
pub use crate::http::{Outcome, RequestDescriptor};

// Error types
pub use crate::config::{ConfigResult, ConfigurationError, Validator};
pub use crate::error::{Cancelled, ErrorKind};

// Response cache
pub use crate::cache::{
    CacheConfig, CacheEntry, CacheKey, EvictionPolicy, FileSystemBackend, MemoryBackend,
    ResponseCache, StorageBackend, TierStrategy,
};

// Retry orchestration
pub use crate::retry::{BackoffStrategy, JitterStrategy, RetryContext, RetryExecutor, RetryPolicy};

// Telemetry types
pub use crate::telemetry::{CacheStatsSnapshot, RetryStatsSnapshot};
