//! Telemetry and statistics collection
//!
//! Counters owned by the cache and retry components. Each instance keeps
//! its own counters; there is no process-wide registry.

pub mod cache_stats;
pub mod retry_stats;

pub use cache_stats::{CacheStats, CacheStatsSnapshot};
pub use retry_stats::{RetryStats, RetryStatsSnapshot};
