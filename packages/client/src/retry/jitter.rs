//! Randomized perturbation of backoff delays
//!
//! Spreads retries from many clients so they do not hit a recovering
//! server in lockstep.

use std::time::Duration;

use fastrand::Rng;

/// Lower bound for decorrelated jitter
const DECORRELATED_FLOOR: Duration = Duration::from_secs(1);

/// Jitter strategy applied to the base backoff delay
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum JitterStrategy {
    /// Use the base delay unchanged
    None,
    /// Uniform in `[0, delay]`
    #[default]
    Full,
    /// `delay/2 + uniform(0, delay/2)`, so always in `[delay/2, delay]`
    Equal,
    /// Uniform in `[max(1s, delay/3), previous * 3]`. Grows with the
    /// previous attempt's final delay rather than the attempt count.
    Decorrelated,
}

impl JitterStrategy {
    /// Apply jitter using a fresh random generator
    #[must_use]
    pub fn apply(self, delay: Duration, previous_delay: Duration) -> Duration {
        self.apply_with(&mut Rng::new(), delay, previous_delay)
    }

    /// Apply jitter drawing from `rng`
    #[must_use]
    pub fn apply_with(self, rng: &mut Rng, delay: Duration, previous_delay: Duration) -> Duration {
        match self {
            JitterStrategy::None => delay,
            JitterStrategy::Full => uniform(rng, Duration::ZERO, delay),
            JitterStrategy::Equal => {
                let half = delay / 2;
                // Keeps the upper bound at `delay` for odd nanosecond counts.
                uniform(rng, half, delay)
            }
            JitterStrategy::Decorrelated => {
                let low = DECORRELATED_FLOOR.max(delay / 3);
                let high = previous_delay.saturating_mul(3).max(low);
                uniform(rng, low, high)
            }
        }
    }
}

/// Uniform sample in `[low, high]`
fn uniform(rng: &mut Rng, low: Duration, high: Duration) -> Duration {
    if high <= low {
        return low;
    }
    let span = high - low;
    let offset = Duration::try_from_secs_f64(span.as_secs_f64() * rng.f64()).unwrap_or(span);
    low.saturating_add(offset.min(span))
}
