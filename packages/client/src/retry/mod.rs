//! Retry orchestration with pluggable backoff and jitter
//!
//! Provides the retry loop, its policy and delay strategies, and
//! convenience helpers for preset policies.

pub mod backoff;
pub mod context;
pub mod executor;
pub mod helpers;
pub mod jitter;
pub mod policy;

// Re-export main types for convenient access
pub use backoff::{BackoffStrategy, CustomBackoff};
pub use context::RetryContext;
pub use executor::RetryExecutor;
pub use helpers::{
    execute_with_aggressive_retry, execute_with_conservative_retry, execute_with_default_retry,
    execute_without_retry,
};
pub use jitter::JitterStrategy;
pub use policy::{RetryPolicy, RetryPredicate};
