//! Cache eviction and cleanup operations
//!
//! Capacity-driven eviction happens inside the memory tier on insert; this
//! module holds the expiry sweep that both the sweeper task and callers use.

use super::core::{ResponseCache, Shared};

impl Shared {
    /// Remove every expired entry from both tiers
    pub(crate) fn sweep_expired(&self) -> usize {
        let now = self.clock.now();
        let mut state = self.lock_state();

        let from_memory = state.memory.remove_expired(now);
        let from_disk = state.disk.as_mut().map_or(0, |disk| disk.remove_expired(now));

        if from_memory + from_disk > 0 {
            tracing::debug!(
                target: "harbor::cache",
                from_memory,
                from_disk,
                "Swept expired cache entries"
            );
        }
        from_memory + from_disk
    }
}

impl ResponseCache {
    /// Clean up expired entries in both tiers.
    ///
    /// Runs automatically on `CacheConfig::sweep_interval`; returns the
    /// number of entries removed.
    pub fn sweep_expired(&self) -> usize {
        self.shared.sweep_expired()
    }
}
