//! Base delay growth between retry attempts
//!
//! Backoff strategies are pure functions of the 1-indexed attempt number
//! that just failed. Randomization is applied afterwards by
//! [`JitterStrategy`](super::JitterStrategy).

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

/// Caller-supplied `attempt -> delay` function
pub type CustomBackoff = Arc<dyn Fn(u32) -> Duration + Send + Sync>;

/// Backoff strategy for computing the base delay after a failed attempt
#[derive(Clone)]
pub enum BackoffStrategy {
    /// Constant delay
    Fixed(Duration),
    /// `attempt * step`
    Linear(Duration),
    /// `base * 2^(attempt - 1)`, clamped to `cap` when set
    Exponential { base: Duration, cap: Option<Duration> },
    Custom(CustomBackoff),
}

impl BackoffStrategy {
    /// Exponential backoff without a cap
    pub fn exponential(base: Duration) -> Self {
        BackoffStrategy::Exponential { base, cap: None }
    }

    /// Exponential backoff clamped to `cap`
    pub fn exponential_capped(base: Duration, cap: Duration) -> Self {
        BackoffStrategy::Exponential { base, cap: Some(cap) }
    }

    pub fn custom(f: impl Fn(u32) -> Duration + Send + Sync + 'static) -> Self {
        BackoffStrategy::Custom(Arc::new(f))
    }

    /// Base delay after `attempt` (1-indexed; 0 is treated as 1).
    /// Saturates at `Duration::MAX` instead of overflowing.
    #[must_use]
    pub fn delay(&self, attempt: u32) -> Duration {
        let attempt = attempt.max(1);
        match self {
            BackoffStrategy::Fixed(delay) => *delay,
            BackoffStrategy::Linear(step) => step.saturating_mul(attempt),
            BackoffStrategy::Exponential { base, cap } => {
                let delay = 2u32
                    .checked_pow(attempt - 1)
                    .and_then(|factor| base.checked_mul(factor))
                    .unwrap_or(Duration::MAX);
                match cap {
                    Some(cap) => delay.min(*cap),
                    None => delay,
                }
            }
            BackoffStrategy::Custom(f) => f(attempt),
        }
    }
}

impl Default for BackoffStrategy {
    fn default() -> Self {
        BackoffStrategy::exponential_capped(Duration::from_secs(1), Duration::from_secs(30))
    }
}

impl fmt::Debug for BackoffStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BackoffStrategy::Fixed(delay) => f.debug_tuple("Fixed").field(delay).finish(),
            BackoffStrategy::Linear(step) => f.debug_tuple("Linear").field(step).finish(),
            BackoffStrategy::Exponential { base, cap } => f
                .debug_struct("Exponential")
                .field("base", base)
                .field("cap", cap)
                .finish(),
            BackoffStrategy::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}
