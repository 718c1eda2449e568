//! Retry statistics for one orchestrator instance
//!
//! Atomic counters updated once per top-level call, when it reaches a
//! terminal outcome. Cancelled calls are never recorded.

use std::sync::atomic::{AtomicU64, Ordering};

/// Retry statistics for monitoring
#[derive(Debug, Default)]
pub struct RetryStats {
    total_requests: AtomicU64,
    successful_requests: AtomicU64,
    failed_requests: AtomicU64,
    total_retries: AtomicU64,
    requests_with_retries: AtomicU64,
}

/// Point-in-time copy of [`RetryStats`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RetryStatsSnapshot {
    pub total_requests: u64,
    pub successful_requests: u64,
    pub failed_requests: u64,
    pub total_retries: u64,
    pub requests_with_retries: u64,
}

impl RetryStats {
    /// Record the terminal outcome of one call
    ///
    /// `attempts` is the 1-indexed number of the final attempt; every
    /// attempt after the first counts as a retry.
    #[inline]
    pub fn record_completion(&self, success: bool, attempts: u32) {
        self.total_requests.fetch_add(1, Ordering::Relaxed);
        if success {
            self.successful_requests.fetch_add(1, Ordering::Relaxed);
        } else {
            self.failed_requests.fetch_add(1, Ordering::Relaxed);
        }
        let retries = u64::from(attempts.saturating_sub(1));
        self.total_retries.fetch_add(retries, Ordering::Relaxed);
        if retries > 0 {
            self.requests_with_retries.fetch_add(1, Ordering::Relaxed);
        }
    }

    /// Get current statistics snapshot
    #[inline]
    pub fn snapshot(&self) -> RetryStatsSnapshot {
        RetryStatsSnapshot {
            total_requests: self.total_requests.load(Ordering::Relaxed),
            successful_requests: self.successful_requests.load(Ordering::Relaxed),
            failed_requests: self.failed_requests.load(Ordering::Relaxed),
            total_retries: self.total_retries.load(Ordering::Relaxed),
            requests_with_retries: self.requests_with_retries.load(Ordering::Relaxed),
        }
    }

    /// Reset all statistics to zero
    ///
    /// Clears all counters for fresh monitoring periods.
    #[inline]
    pub fn reset(&self) {
        self.total_requests.store(0, Ordering::Relaxed);
        self.successful_requests.store(0, Ordering::Relaxed);
        self.failed_requests.store(0, Ordering::Relaxed);
        self.total_retries.store(0, Ordering::Relaxed);
        self.requests_with_retries.store(0, Ordering::Relaxed);
    }
}

impl RetryStatsSnapshot {
    /// Calculate success rate percentage
    #[allow(clippy::cast_precision_loss)]
    pub fn success_rate(&self) -> f64 {
        if self.total_requests > 0 {
            (self.successful_requests as f64 / self.total_requests as f64) * 100.0
        } else {
            0.0
        }
    }

    /// Calculate average retries per request
    #[allow(clippy::cast_precision_loss)]
    pub fn avg_retries_per_request(&self) -> f64 {
        if self.total_requests > 0 {
            self.total_retries as f64 / self.total_requests as f64
        } else {
            0.0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn completion_counts_retries_beyond_first_attempt() {
        let stats = RetryStats::default();
        stats.record_completion(true, 1);
        stats.record_completion(false, 3);
        stats.record_completion(true, 2);

        let snapshot = stats.snapshot();
        assert_eq!(snapshot.total_requests, 3);
        assert_eq!(snapshot.successful_requests, 2);
        assert_eq!(snapshot.failed_requests, 1);
        assert_eq!(snapshot.total_retries, 3);
        assert_eq!(snapshot.requests_with_retries, 2);
        assert!((snapshot.avg_retries_per_request() - 1.0).abs() < f64::EPSILON);
    }
}
