//! Core ResponseCache structure and initialization
//!
//! Provides the main ResponseCache struct. Tier state lives behind one
//! mutex shared with the background sweeper; statistics are atomic
//! counters updated while that mutex is held.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tokio::task::JoinHandle;

use super::sweeper;
use crate::cache::cache_config::CacheConfig;
use crate::cache::clock::{Clock, SystemClock};
use crate::cache::storage::StorageBackend;
use crate::cache::tiers::{DiskTier, MemoryTier};
use crate::config::{ConfigResult, ConfigurationError, Validator};
use crate::telemetry::{CacheStats, CacheStatsSnapshot};

/// Mutable tier state, guarded by [`Shared::state`]
#[derive(Debug)]
pub(crate) struct CacheState {
    pub(crate) memory: MemoryTier,
    pub(crate) disk: Option<DiskTier>,
}

/// State shared between the cache handle and its sweeper task
#[derive(Debug)]
pub(crate) struct Shared {
    pub(crate) config: CacheConfig,
    pub(crate) clock: Arc<dyn Clock>,
    pub(crate) state: Mutex<CacheState>,
    pub(crate) stats: CacheStats,
}

impl Shared {
    pub(crate) fn lock_state(&self) -> MutexGuard<'_, CacheState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Multi-tier HTTP response cache
///
/// Dropping the cache stops its background sweep.
#[derive(Debug)]
pub struct ResponseCache {
    pub(crate) shared: Arc<Shared>,
    sweeper: Option<JoinHandle<()>>,
}

impl ResponseCache {
    /// Create a cache without a persistent tier.
    ///
    /// # Errors
    ///
    /// Fails if the configuration is invalid or its tier strategy needs a
    /// disk tier.
    pub fn new(config: CacheConfig) -> ConfigResult<Self> {
        Self::with_parts(config, None, Arc::new(SystemClock))
    }

    /// Create a cache whose persistent tier writes to `backend`.
    ///
    /// # Errors
    ///
    /// Fails if the configuration is invalid.
    pub fn with_storage(config: CacheConfig, backend: impl StorageBackend + 'static) -> ConfigResult<Self> {
        Self::with_parts(config, Some(Box::new(backend)), Arc::new(SystemClock))
    }

    /// Create a cache from explicit parts.
    ///
    /// If `config.sweep_interval` is set and a tokio runtime is available,
    /// a periodic expiry sweep is started and tied to this instance.
    ///
    /// # Errors
    ///
    /// Returns `ConfigurationError` if the configuration fails validation or
    /// the tier strategy includes disk but no backend is supplied.
    pub fn with_parts(
        config: CacheConfig,
        storage: Option<Box<dyn StorageBackend>>,
        clock: Arc<dyn Clock>,
    ) -> ConfigResult<Self> {
        config.validate()?;

        let disk = if config.tier_strategy.uses_disk() {
            let Some(backend) = storage else {
                return Err(ConfigurationError::Conflict(format!(
                    "tier strategy {:?} requires a storage backend",
                    config.tier_strategy
                )));
            };
            Some(DiskTier::open(
                backend,
                config.disk_capacity_bytes,
                config.enforce_disk_capacity,
            ))
        } else {
            None
        };

        let shared = Arc::new(Shared {
            state: Mutex::new(CacheState {
                memory: MemoryTier::new(config.memory_capacity_bytes),
                disk,
            }),
            config,
            clock,
            stats: CacheStats::default(),
        });

        let sweeper = if shared.config.tier_strategy.is_enabled() {
            shared
                .config
                .sweep_interval
                .and_then(|interval| sweeper::spawn(Arc::downgrade(&shared), interval))
        } else {
            None
        };

        Ok(Self { shared, sweeper })
    }

    pub fn config(&self) -> &CacheConfig {
        &self.shared.config
    }

    /// Get cache statistics
    pub fn stats(&self) -> CacheStatsSnapshot {
        self.shared.stats.snapshot()
    }

    /// Reset cumulative statistics. Entries are untouched.
    pub fn reset_stats(&self) {
        self.shared.stats.reset();
    }

    /// Get current cache size information:
    /// (memory entries, memory bytes, disk entries)
    pub fn size_info(&self) -> (usize, u64, usize) {
        let state = self.shared.lock_state();
        let disk_entries = state.disk.as_ref().map_or(0, DiskTier::len);
        (state.memory.len(), state.memory.bytes(), disk_entries)
    }

    /// Bytes currently tracked by the disk tier
    pub fn disk_bytes(&self) -> u64 {
        self.shared.lock_state().disk.as_ref().map_or(0, DiskTier::bytes)
    }

    /// Returns true while the background sweep task is running
    pub fn has_sweeper(&self) -> bool {
        self.sweeper.as_ref().is_some_and(|handle| !handle.is_finished())
    }
}

impl Drop for ResponseCache {
    fn drop(&mut self) {
        if let Some(handle) = self.sweeper.take() {
            handle.abort();
        }
    }
}
