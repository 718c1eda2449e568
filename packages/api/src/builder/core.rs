//! Core `HarborBuilder` structure and construction
//!
//! Collects cache, storage, clock and retry settings and validates them all
//! at `build()` time.

use std::fmt;
use std::sync::Arc;

use harbor_client::cache::{Clock, SystemClock};
use harbor_client::{
    CacheConfig, ConfigurationError, ResponseCache, RetryExecutor, RetryPolicy, StorageBackend, TierStrategy,
};

use crate::Harbor;

/// Fluent builder for [`Harbor`]
pub struct HarborBuilder {
    pub(crate) cache: CacheConfig,
    pub(crate) storage: Option<Box<dyn StorageBackend>>,
    pub(crate) clock: Arc<dyn Clock>,
    pub(crate) retry: RetryPolicy,
}

impl HarborBuilder {
    /// Start from a memory-only cache with default limits and the default
    /// retry policy
    #[must_use]
    pub fn new() -> Self {
        Self {
            cache: CacheConfig {
                tier_strategy: TierStrategy::MemoryOnly,
                ..CacheConfig::default()
            },
            storage: None,
            clock: Arc::new(SystemClock),
            retry: RetryPolicy::default(),
        }
    }

    /// Replace the cache configuration
    #[must_use]
    pub fn cache(mut self, config: CacheConfig) -> Self {
        self.cache = config;
        self
    }

    /// Disable response caching entirely
    #[must_use]
    pub fn no_cache(self) -> Self {
        self.cache(CacheConfig::no_cache())
    }

    /// Persistent tier backend, required when the tier strategy includes disk
    #[must_use]
    pub fn storage(mut self, backend: impl StorageBackend + 'static) -> Self {
        self.storage = Some(Box::new(backend));
        self
    }

    /// Time source for cache expiry
    #[must_use]
    pub fn clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    #[must_use]
    pub fn retry(mut self, policy: RetryPolicy) -> Self {
        self.retry = policy;
        self
    }

    /// Disable retries; every call makes exactly one attempt
    #[must_use]
    pub fn no_retry(self) -> Self {
        self.retry(RetryPolicy::no_retry())
    }

    /// Validate the configuration and assemble the orchestrator
    ///
    /// If a tokio runtime is current, the cache's periodic expiry sweep is
    /// started on it.
    ///
    /// # Errors
    ///
    /// Returns `ConfigurationError` if either configuration fails validation
    /// or the cache tier strategy needs a storage backend that was not set.
    pub fn build(self) -> Result<Harbor, ConfigurationError> {
        let retry = RetryExecutor::new(self.retry)?;
        let cache = ResponseCache::with_parts(self.cache, self.storage, self.clock)?;

        tracing::debug!(
            target: "harbor",
            tier_strategy = ?cache.config().tier_strategy,
            max_attempts = retry.policy().max_attempts,
            "Built harbor orchestrator"
        );
        Ok(Harbor::from_parts(cache, retry))
    }
}

impl Default for HarborBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for HarborBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HarborBuilder")
            .field("cache", &self.cache)
            .field("storage", &self.storage)
            .field("retry", &self.retry)
            .finish_non_exhaustive()
    }
}
