//! # Harbor client core
//!
//! Response caching and retry orchestration for an HTTP client whose wire
//! transport is supplied by the caller.
//!
//! ## Features
//!
//! - **Two-tier response cache**: byte-bounded memory tier in front of a
//!   persistent tier, with promotion on disk hits
//! - **Pluggable eviction**: LRU, LFU, FIFO and TTL-first
//! - **Deterministic cache keys**: SHA-256 over method, normalized URL and
//!   variant headers
//! - **Retry orchestration**: fixed, linear, exponential or custom backoff
//!   with none, full, equal or decorrelated jitter, bounded by attempts and
//!   a wall-clock budget
//! - **Per-instance statistics** for both components
//!
//! ## Usage
//!
//! ```rust,no_run
//! use harbor_client::prelude::*;
//!
//! # async fn run() -> Result<(), ConfigurationError> {
//! let cache = ResponseCache::new(CacheConfig::memory_only(16 * 1024 * 1024))?;
//! let retry = RetryExecutor::new(RetryPolicy::default())?;
//!
//! let request = RequestDescriptor::get("https://api.example.com/items");
//! let outcome = match cache.retrieve(&request) {
//!     Some(entry) => entry.to_outcome(),
//!     None => {
//!         let outcome = retry
//!             .execute_with_retry(&request, |req| async move {
//!                 // hand `req` to the transport here
//!                 let _ = req;
//!                 Outcome::ok("[]")
//!             })
//!             .await;
//!         cache.store(&outcome, &request, None);
//!         outcome
//!     }
//! };
//! assert!(outcome.is_success());
//! # Ok(())
//! # }
//! ```

#![deny(unsafe_code)]
#![warn(clippy::all)]

pub mod cache;
pub mod config;
pub mod error;
pub mod http;
pub mod retry;
pub mod telemetry;

// Prelude with canonical types
pub mod prelude;

pub use crate::prelude::*;
