//! Convenience functions for common retry scenarios
//!
//! Each helper builds a throwaway [`RetryExecutor`] from a preset policy.
//! Use a long-lived executor instead when statistics matter.

use std::future::Future;

use super::{RetryExecutor, RetryPolicy};
use crate::http::{Outcome, RequestDescriptor};

async fn execute_with_policy<F, Fut>(policy: RetryPolicy, request: &RequestDescriptor, executor: F) -> Outcome
where
    F: FnMut(RequestDescriptor) -> Fut,
    Fut: Future<Output = Outcome>,
{
    match RetryExecutor::new(policy) {
        Ok(retry) => retry.execute_with_retry(request, executor).await,
        // Presets always validate; fall back to a single attempt regardless.
        Err(e) => {
            tracing::error!(target: "harbor::retry", error = %e, "Invalid preset retry policy");
            let mut executor = executor;
            executor(request.clone()).await
        }
    }
}

/// Execute with the default policy (3 attempts, capped exponential backoff)
pub async fn execute_with_default_retry<F, Fut>(request: &RequestDescriptor, executor: F) -> Outcome
where
    F: FnMut(RequestDescriptor) -> Fut,
    Fut: Future<Output = Outcome>,
{
    execute_with_policy(RetryPolicy::default(), request, executor).await
}

/// Execute with the aggressive policy (5 attempts, short delays)
pub async fn execute_with_aggressive_retry<F, Fut>(request: &RequestDescriptor, executor: F) -> Outcome
where
    F: FnMut(RequestDescriptor) -> Fut,
    Fut: Future<Output = Outcome>,
{
    execute_with_policy(RetryPolicy::aggressive(), request, executor).await
}

/// Execute with the conservative policy (2 attempts, fixed delay)
pub async fn execute_with_conservative_retry<F, Fut>(request: &RequestDescriptor, executor: F) -> Outcome
where
    F: FnMut(RequestDescriptor) -> Fut,
    Fut: Future<Output = Outcome>,
{
    execute_with_policy(RetryPolicy::conservative(), request, executor).await
}

/// Execute exactly once
pub async fn execute_without_retry<F, Fut>(request: &RequestDescriptor, executor: F) -> Outcome
where
    F: FnMut(RequestDescriptor) -> Fut,
    Fut: Future<Output = Outcome>,
{
    execute_with_policy(RetryPolicy::no_retry(), request, executor).await
}
