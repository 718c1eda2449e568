//! Composed cache and retry orchestrator
//!
//! Runs the request path: cache lookup, retry-wrapped executor on a miss,
//! then a cache write of the final outcome.

use std::future::Future;

use harbor_client::{
    Cancelled, CacheStatsSnapshot, Outcome, RequestDescriptor, ResponseCache, RetryExecutor, RetryStatsSnapshot,
};

use crate::builder::HarborBuilder;

/// Response cache in front of a retry orchestrator
///
/// Only `GET` and `HEAD` requests consult or populate the cache.
#[derive(Debug)]
pub struct Harbor {
    cache: ResponseCache,
    retry: RetryExecutor,
}

impl Harbor {
    #[must_use]
    pub fn builder() -> HarborBuilder {
        HarborBuilder::new()
    }

    pub(crate) fn from_parts(cache: ResponseCache, retry: RetryExecutor) -> Self {
        Self { cache, retry }
    }

    /// Serve `request` from cache, or run `executor` under the retry policy
    /// and cache whatever it finally returns.
    pub async fn execute<F, Fut>(&self, request: &RequestDescriptor, executor: F) -> Outcome
    where
        F: FnMut(RequestDescriptor) -> Fut,
        Fut: Future<Output = Outcome>,
    {
        if let Some(outcome) = self.lookup(request) {
            return outcome;
        }
        let outcome = self.retry.execute_with_retry(request, executor).await;
        self.remember(request, &outcome);
        outcome
    }

    /// Like [`execute`](Self::execute), but gives up as soon as `cancel`
    /// resolves. A cancelled call stores nothing.
    ///
    /// # Errors
    ///
    /// Returns `Cancelled` if `cancel` completes before a terminal outcome.
    pub async fn execute_with_cancel<F, Fut, C>(
        &self,
        request: &RequestDescriptor,
        executor: F,
        cancel: C,
    ) -> Result<Outcome, Cancelled>
    where
        F: FnMut(RequestDescriptor) -> Fut,
        Fut: Future<Output = Outcome>,
        C: Future<Output = ()>,
    {
        if let Some(outcome) = self.lookup(request) {
            return Ok(outcome);
        }
        let outcome = self.retry.execute_with_cancel(request, executor, cancel).await?;
        self.remember(request, &outcome);
        Ok(outcome)
    }

    fn lookup(&self, request: &RequestDescriptor) -> Option<Outcome> {
        if !request.is_cacheable_method() {
            return None;
        }
        let entry = self.cache.retrieve(request)?;
        tracing::debug!(target: "harbor", url = %request.url, "Served from cache");
        Some(entry.to_outcome())
    }

    fn remember(&self, request: &RequestDescriptor, outcome: &Outcome) {
        if request.is_cacheable_method() {
            self.cache.store(outcome, request, None);
        }
    }

    pub fn cache(&self) -> &ResponseCache {
        &self.cache
    }

    pub fn retry(&self) -> &RetryExecutor {
        &self.retry
    }

    pub fn cache_stats(&self) -> CacheStatsSnapshot {
        self.cache.stats()
    }

    pub fn retry_stats(&self) -> RetryStatsSnapshot {
        self.retry.stats()
    }
}
