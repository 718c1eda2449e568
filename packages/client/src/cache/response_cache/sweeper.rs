//! Periodic expiry sweep
//!
//! The task holds only a weak reference to the cache state, so it stops on
//! its own once the cache is gone even if the abort on drop is missed.
//! Sweeps that touch the disk tier run on the blocking pool.

use std::sync::Weak;
use std::time::Duration;

use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info, warn};

use super::core::Shared;

/// Spawn the sweep loop on the current runtime, if there is one
pub(super) fn spawn(shared: Weak<Shared>, interval: Duration) -> Option<JoinHandle<()>> {
    let Ok(runtime) = Handle::try_current() else {
        debug!(
            target: "harbor::cache::sweeper",
            "No tokio runtime available, background expiry sweep disabled"
        );
        return None;
    };

    Some(runtime.spawn(async move {
        let mut ticker = tokio::time::interval(interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        // The first tick completes immediately.
        ticker.tick().await;

        info!(
            target: "harbor::cache::sweeper",
            interval_secs = interval.as_secs(),
            "Starting cache expiry sweep"
        );

        loop {
            ticker.tick().await;
            let Some(shared) = shared.upgrade() else {
                break;
            };
            let removed = if shared.config.tier_strategy.uses_disk() {
                // Disk sweeps scan the backend; keep that off the async workers.
                match tokio::task::spawn_blocking(move || shared.sweep_expired()).await {
                    Ok(removed) => removed,
                    Err(e) => {
                        warn!(target: "harbor::cache::sweeper", error = %e, "Expiry sweep task failed");
                        continue;
                    }
                }
            } else {
                shared.sweep_expired()
            };
            if removed > 0 {
                info!(target: "harbor::cache::sweeper", removed, "Expiry sweep removed entries");
            } else {
                debug!(target: "harbor::cache::sweeper", "Expiry sweep found no expired entries");
            }
        }
    }))
}
