//! Retry policy configuration with backoff, jitter and error classification
//!
//! Decides whether an outcome is worth another attempt and how long to
//! wait before it.

use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use super::{BackoffStrategy, JitterStrategy, RetryContext};
use crate::config::{ConfigResult, ConfigValidator, ConfigurationError, Validator};
use crate::error::ErrorKind;
use crate::http::Outcome;

/// Custom retry decision; when set it overrides every other rule
pub type RetryPredicate = Arc<dyn Fn(&Outcome, &RetryContext) -> bool + Send + Sync>;

/// Retry policy configuration
#[derive(Clone)]
pub struct RetryPolicy {
    /// Total attempts including the first; attempts beyond the first are retries
    pub max_attempts: u32,
    pub backoff: BackoffStrategy,
    pub jitter: JitterStrategy,
    /// Wall-clock budget for the whole call, waits included
    pub max_total_duration: Duration,
    pub retryable_status_codes: HashSet<u16>,
    pub retryable_error_kinds: HashSet<ErrorKind>,
    /// Gate for timeout errors, even when listed in `retryable_error_kinds`
    pub retry_on_timeout: bool,
    /// Gate for connection failures, even when listed in `retryable_error_kinds`
    pub retry_on_connection_error: bool,
    pub retry_predicate: Option<RetryPredicate>,
}

impl Default for RetryPolicy {
    /// Create default retry policy with balanced configuration
    ///
    /// Three attempts, capped exponential backoff from one second with full
    /// jitter, a 60 second budget, and the usual transient statuses.
    fn default() -> Self {
        Self {
            max_attempts: 3,
            backoff: BackoffStrategy::default(),
            jitter: JitterStrategy::Full,
            max_total_duration: Duration::from_secs(60),
            retryable_status_codes: HashSet::from([408, 429, 500, 502, 503, 504]),
            retryable_error_kinds: HashSet::from([
                ErrorKind::Timeout,
                ErrorKind::Connection,
                ErrorKind::Dns,
                ErrorKind::Network,
            ]),
            retry_on_timeout: true,
            retry_on_connection_error: true,
            retry_predicate: None,
        }
    }
}

impl RetryPolicy {
    /// Create aggressive retry policy for critical operations
    ///
    /// Uses faster retry cycles with more attempts for operations
    /// that must succeed and can tolerate increased retry overhead.
    #[must_use]
    pub fn aggressive() -> Self {
        Self {
            max_attempts: 5,
            backoff: BackoffStrategy::exponential_capped(
                Duration::from_millis(100),
                Duration::from_secs(10),
            ),
            jitter: JitterStrategy::Equal,
            max_total_duration: Duration::from_secs(120),
            ..Self::default()
        }
    }

    /// Create conservative retry policy for non-critical operations
    #[must_use]
    pub fn conservative() -> Self {
        Self {
            max_attempts: 2,
            backoff: BackoffStrategy::Fixed(Duration::from_secs(2)),
            jitter: JitterStrategy::None,
            max_total_duration: Duration::from_secs(30),
            retryable_status_codes: HashSet::from([502, 503, 504]),
            ..Self::default()
        }
    }

    /// Create no-retry policy (single attempt only)
    #[must_use]
    pub fn no_retry() -> Self {
        Self {
            max_attempts: 1,
            jitter: JitterStrategy::None,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_max_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = max_attempts;
        self
    }

    #[must_use]
    pub fn with_backoff(mut self, backoff: BackoffStrategy) -> Self {
        self.backoff = backoff;
        self
    }

    #[must_use]
    pub fn with_jitter(mut self, jitter: JitterStrategy) -> Self {
        self.jitter = jitter;
        self
    }

    #[must_use]
    pub fn with_max_total_duration(mut self, budget: Duration) -> Self {
        self.max_total_duration = budget;
        self
    }

    #[must_use]
    pub fn with_retryable_status_codes(mut self, codes: impl IntoIterator<Item = u16>) -> Self {
        self.retryable_status_codes = codes.into_iter().collect();
        self
    }

    #[must_use]
    pub fn with_retryable_error_kinds(mut self, kinds: impl IntoIterator<Item = ErrorKind>) -> Self {
        self.retryable_error_kinds = kinds.into_iter().collect();
        self
    }

    #[must_use]
    pub fn with_retry_predicate(
        mut self,
        predicate: impl Fn(&Outcome, &RetryContext) -> bool + Send + Sync + 'static,
    ) -> Self {
        self.retry_predicate = Some(Arc::new(predicate));
        self
    }

    /// Check if an outcome should trigger another attempt
    ///
    /// Successful outcomes never retry. A configured predicate is
    /// authoritative for everything else. Otherwise a listed status code
    /// retries regardless of the error kind; failing that, a listed error
    /// kind retries subject to the timeout and connection gates.
    /// Authentication and malformed-request errors never retry through the
    /// error-kind rule.
    #[must_use]
    pub fn is_retriable(&self, outcome: &Outcome, context: &RetryContext) -> bool {
        if outcome.is_success() {
            return false;
        }

        if let Some(predicate) = &self.retry_predicate {
            return predicate(outcome, context);
        }

        if self.retryable_status_codes.contains(&outcome.status_code) {
            return true;
        }

        match outcome.error_kind {
            Some(kind) if kind.is_permanent() => false,
            Some(kind) if self.retryable_error_kinds.contains(&kind) => {
                if kind.is_timeout() {
                    self.retry_on_timeout
                } else if kind.is_connection_failure() {
                    self.retry_on_connection_error
                } else {
                    true
                }
            }
            _ => false,
        }
    }

    /// Base delay for `attempt` with jitter applied
    #[must_use]
    pub fn calculate_delay(&self, attempt: u32, previous_delay: Duration) -> Duration {
        self.jitter.apply(self.backoff.delay(attempt), previous_delay)
    }
}

impl Validator for RetryPolicy {
    fn validate(&self) -> ConfigResult<()> {
        if self.max_attempts == 0 {
            return Err(ConfigurationError::InvalidParameter(
                "max_attempts must be at least 1".to_string(),
            ));
        }
        ConfigValidator::validate_non_zero(self.max_total_duration, "max_total_duration")?;
        if let BackoffStrategy::Exponential { base, cap: Some(cap) } = &self.backoff {
            if cap < base {
                return Err(ConfigurationError::Conflict(
                    "exponential backoff cap cannot be below its base delay".to_string(),
                ));
            }
        }
        Ok(())
    }
}

impl fmt::Debug for RetryPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RetryPolicy")
            .field("max_attempts", &self.max_attempts)
            .field("backoff", &self.backoff)
            .field("jitter", &self.jitter)
            .field("max_total_duration", &self.max_total_duration)
            .field("retryable_status_codes", &self.retryable_status_codes)
            .field("retryable_error_kinds", &self.retryable_error_kinds)
            .field("retry_on_timeout", &self.retry_on_timeout)
            .field("retry_on_connection_error", &self.retry_on_connection_error)
            .field("retry_predicate", &self.retry_predicate.as_ref().map(|_| ".."))
            .finish()
    }
}
