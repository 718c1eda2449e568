//! Per-call retry state handed to retry predicates

use std::time::Duration;

use crate::error::ErrorKind;

/// Snapshot of one in-flight retry loop after an attempt completed.
///
/// Created fresh for every attempt of every top-level call and never
/// persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryContext {
    /// 1-indexed number of the attempt that just completed
    pub attempt_number: u32,
    pub total_attempts_allowed: u32,
    /// Final (jittered) delay waited before this attempt; zero on the first
    pub previous_delay: Duration,
    /// Wall-clock time since the call started
    pub elapsed_since_start: Duration,
    pub max_total_duration: Duration,
    pub last_status_code: u16,
    pub last_error: Option<ErrorKind>,
}

impl RetryContext {
    /// Time left before the call's budget is spent
    pub fn remaining_budget(&self) -> Duration {
        self.max_total_duration.saturating_sub(self.elapsed_since_start)
    }

    /// True when no further attempt is allowed by the attempt limit
    pub fn is_last_attempt(&self) -> bool {
        self.attempt_number >= self.total_attempts_allowed
    }

    /// Number of retries performed so far
    pub fn retries_so_far(&self) -> u32 {
        self.attempt_number.saturating_sub(1)
    }
}
