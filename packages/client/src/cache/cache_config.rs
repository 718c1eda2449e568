//! Cache configuration and preset policies
//!
//! Provides `CacheConfig` for configuring tier selection, capacity limits,
//! TTL defaults, eviction and compression behavior.

use std::time::Duration;

use super::eviction_policy::EvictionPolicy;
use crate::config::{ConfigResult, ConfigValidator, ConfigurationError, Validator};

/// Which storage tiers the cache writes to and reads from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TierStrategy {
    /// Fast volatile tier only
    MemoryOnly,
    /// Persistent tier only
    DiskOnly,
    /// Memory in front of disk, with promotion on disk hits
    #[default]
    Both,
    /// Caching disabled
    None,
}

impl TierStrategy {
    #[inline]
    pub fn uses_memory(self) -> bool {
        matches!(self, TierStrategy::MemoryOnly | TierStrategy::Both)
    }

    #[inline]
    pub fn uses_disk(self) -> bool {
        matches!(self, TierStrategy::DiskOnly | TierStrategy::Both)
    }

    #[inline]
    pub fn is_enabled(self) -> bool {
        !matches!(self, TierStrategy::None)
    }
}

/// Cache configuration and limits
#[derive(Debug, Clone)]
pub struct CacheConfig {
    /// Maximum bytes tracked by the memory tier
    pub memory_capacity_bytes: u64,
    /// Maximum bytes tracked by the disk tier
    pub disk_capacity_bytes: u64,
    /// TTL for entries stored without an override or `max-age`
    pub default_ttl: Duration,
    pub tier_strategy: TierStrategy,
    /// Victim selection when the memory tier is over capacity
    pub eviction_policy: EvictionPolicy,
    /// Store 4xx/5xx and transport-failure outcomes too
    pub cache_error_responses: bool,
    pub compression_enabled: bool,
    /// Payloads larger than this are gzip-compressed when compression is on
    pub compression_threshold_bytes: usize,
    /// Remove the oldest disk entries once `disk_capacity_bytes` is exceeded
    pub enforce_disk_capacity: bool,
    /// Period of the background expiry sweep; `None` disables it
    pub sweep_interval: Option<Duration>,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            memory_capacity_bytes: 50 * 1024 * 1024, // 50MB
            disk_capacity_bytes: 200 * 1024 * 1024,  // 200MB
            default_ttl: Duration::from_secs(300),   // 5 minutes
            tier_strategy: TierStrategy::Both,
            eviction_policy: EvictionPolicy::Lru,
            cache_error_responses: false,
            compression_enabled: true,
            compression_threshold_bytes: 8 * 1024,
            enforce_disk_capacity: true,
            sweep_interval: Some(Duration::from_secs(300)),
        }
    }
}

impl CacheConfig {
    /// Create aggressive caching configuration
    #[must_use]
    pub fn aggressive() -> Self {
        Self {
            memory_capacity_bytes: 200 * 1024 * 1024, // 200MB
            disk_capacity_bytes: 1024 * 1024 * 1024,  // 1GB
            default_ttl: Duration::from_secs(3600),   // 1 hour
            eviction_policy: EvictionPolicy::Lfu,
            sweep_interval: Some(Duration::from_secs(120)),
            ..Self::default()
        }
    }

    /// Create conservative caching configuration
    #[must_use]
    pub fn conservative() -> Self {
        Self {
            memory_capacity_bytes: 10 * 1024 * 1024, // 10MB
            disk_capacity_bytes: 50 * 1024 * 1024,   // 50MB
            default_ttl: Duration::from_secs(60),    // 1 minute
            tier_strategy: TierStrategy::MemoryOnly,
            eviction_policy: EvictionPolicy::TtlFirst,
            ..Self::default()
        }
    }

    /// Create memory-only configuration with no background sweep
    #[must_use]
    pub fn memory_only(capacity_bytes: u64) -> Self {
        Self {
            memory_capacity_bytes: capacity_bytes,
            tier_strategy: TierStrategy::MemoryOnly,
            compression_enabled: false,
            sweep_interval: None,
            ..Self::default()
        }
    }

    /// Create no-cache configuration (disabled caching)
    #[must_use]
    pub fn no_cache() -> Self {
        Self {
            tier_strategy: TierStrategy::None,
            sweep_interval: None,
            ..Self::default()
        }
    }
}

impl Validator for CacheConfig {
    fn validate(&self) -> ConfigResult<()> {
        if !self.tier_strategy.is_enabled() {
            return Ok(());
        }
        if self.tier_strategy.uses_memory() {
            ConfigValidator::validate_capacity(self.memory_capacity_bytes, "memory_capacity_bytes")?;
        }
        if self.tier_strategy.uses_disk() {
            ConfigValidator::validate_capacity(self.disk_capacity_bytes, "disk_capacity_bytes")?;
        }
        ConfigValidator::validate_ttl(self.default_ttl, "default_ttl")?;
        if let Some(interval) = self.sweep_interval {
            ConfigValidator::validate_non_zero(interval, "sweep_interval")?;
        }
        if self.compression_enabled && self.compression_threshold_bytes == 0 {
            return Err(ConfigurationError::InvalidParameter(
                "compression_threshold_bytes must be greater than zero when compression is enabled"
                    .to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn presets_are_valid() {
        for config in [
            CacheConfig::default(),
            CacheConfig::aggressive(),
            CacheConfig::conservative(),
            CacheConfig::memory_only(1024),
            CacheConfig::no_cache(),
        ] {
            assert!(config.validate().is_ok(), "{config:?}");
        }
    }

    #[test]
    fn zero_memory_capacity_fails_fast() {
        let config = CacheConfig {
            memory_capacity_bytes: 0,
            ..CacheConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigurationError::InvalidCapacity(_))
        ));
    }

    #[test]
    fn disk_capacity_ignored_for_memory_only() {
        let config = CacheConfig {
            disk_capacity_bytes: 0,
            ..CacheConfig::memory_only(4096)
        };
        assert!(config.validate().is_ok());
    }
}
