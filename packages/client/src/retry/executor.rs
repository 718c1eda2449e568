//! Retry orchestrator driving a caller-supplied executor
//!
//! Attempts for one call are strictly sequential. The only suspension
//! between attempts is a `tokio::time::sleep`, so dropping the returned
//! future cancels the loop at its next wait without running another
//! attempt.

use std::future::Future;
use std::time::Duration;

use tokio::time::Instant;

use super::{RetryContext, RetryPolicy};
use crate::config::{ConfigResult, Validator};
use crate::error::Cancelled;
use crate::http::{Outcome, RequestDescriptor};
use crate::telemetry::{RetryStats, RetryStatsSnapshot};

/// Why a retry loop stopped
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Termination {
    Success,
    NotRetriable,
    ExhaustedRetries,
    BudgetExceeded,
}

/// Retry executor for request operations
#[derive(Debug)]
pub struct RetryExecutor {
    policy: RetryPolicy,
    stats: RetryStats,
}

impl RetryExecutor {
    /// Create a retry executor for `policy`
    ///
    /// # Errors
    ///
    /// Returns `ConfigurationError` if the policy fails validation.
    pub fn new(policy: RetryPolicy) -> ConfigResult<Self> {
        policy.validate()?;
        Ok(Self {
            policy,
            stats: RetryStats::default(),
        })
    }

    pub fn policy(&self) -> &RetryPolicy {
        &self.policy
    }

    pub fn stats(&self) -> RetryStatsSnapshot {
        self.stats.snapshot()
    }

    pub fn reset_stats(&self) {
        self.stats.reset();
    }

    /// Execute `executor` with retry logic.
    ///
    /// The executor receives its own copy of `request` on every attempt.
    /// Always returns the last real outcome: exhausting attempts or the
    /// time budget is not an error of its own.
    pub async fn execute_with_retry<F, Fut>(&self, request: &RequestDescriptor, mut executor: F) -> Outcome
    where
        F: FnMut(RequestDescriptor) -> Fut,
        Fut: Future<Output = Outcome>,
    {
        let started = Instant::now();
        let mut attempt: u32 = 1;
        let mut previous_delay = Duration::ZERO;

        loop {
            let outcome = executor(request.clone()).await;

            let context = RetryContext {
                attempt_number: attempt,
                total_attempts_allowed: self.policy.max_attempts,
                previous_delay,
                elapsed_since_start: started.elapsed(),
                max_total_duration: self.policy.max_total_duration,
                last_status_code: outcome.status_code,
                last_error: outcome.error_kind,
            };

            let termination = if outcome.is_success() {
                Some(Termination::Success)
            } else if !self.policy.is_retriable(&outcome, &context) {
                Some(Termination::NotRetriable)
            } else if context.is_last_attempt() {
                Some(Termination::ExhaustedRetries)
            } else {
                None
            };
            if let Some(termination) = termination {
                return self.finish(outcome, attempt, termination, request);
            }

            let delay = self.policy.calculate_delay(attempt, previous_delay);
            if context.elapsed_since_start.saturating_add(delay) > self.policy.max_total_duration {
                tracing::debug!(
                    target: "harbor::retry",
                    url = %request.url,
                    attempt,
                    delay_ms = delay.as_millis(),
                    remaining_ms = context.remaining_budget().as_millis(),
                    "Next delay exceeds retry budget"
                );
                return self.finish(outcome, attempt, Termination::BudgetExceeded, request);
            }

            tracing::debug!(
                target: "harbor::retry",
                url = %request.url,
                attempt,
                status = outcome.status_code,
                error = ?outcome.error_kind,
                delay_ms = delay.as_millis(),
                "Retrying request"
            );

            tokio::time::sleep(delay).await;
            attempt += 1;
            previous_delay = delay;
        }
    }

    /// Like [`execute_with_retry`](Self::execute_with_retry), but stops as
    /// soon as `cancel` resolves.
    ///
    /// # Errors
    ///
    /// Returns `Cancelled` if `cancel` completes first. Statistics are not
    /// updated for a cancelled call.
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
        tokio::select! {
            biased;
            () = cancel => {
                tracing::debug!(target: "harbor::retry", url = %request.url, "Retry loop cancelled");
                Err(Cancelled)
            }
            outcome = self.execute_with_retry(request, executor) => Ok(outcome),
        }
    }

    fn finish(
        &self,
        outcome: Outcome,
        attempt: u32,
        termination: Termination,
        request: &RequestDescriptor,
    ) -> Outcome {
        self.stats.record_completion(outcome.is_success(), attempt);
        match termination {
            Termination::Success | Termination::NotRetriable => {
                tracing::debug!(
                    target: "harbor::retry",
                    url = %request.url,
                    attempts = attempt,
                    status = outcome.status_code,
                    reason = ?termination,
                    "Request finished"
                );
            }
            Termination::ExhaustedRetries | Termination::BudgetExceeded => {
                tracing::warn!(
                    target: "harbor::retry",
                    url = %request.url,
                    attempts = attempt,
                    status = outcome.status_code,
                    error = ?outcome.error_kind,
                    reason = ?termination,
                    "Giving up on request"
                );
            }
        }
        outcome
    }
}
