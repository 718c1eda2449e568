//! Cache operations for store, retrieve and invalidation
//!
//! Every operation here is best-effort: storage failures are logged,
//! counted, and degrade to a miss or a no-op store. Nothing is returned to
//! the caller as an error.

use std::time::Duration;

use bytes::Bytes;
use chrono::{DateTime, Utc};

use super::core::{CacheState, ResponseCache};
use crate::cache::cache_entry::{CacheEntry, ResponseMetadata};
use crate::cache::cache_key::CacheKey;
use crate::cache::cache_config::TierStrategy;
use crate::cache::clock::add_duration;
use crate::error::StorageResult;
use crate::http::compression::compress_if_smaller;
use crate::http::{Outcome, RequestDescriptor};

impl ResponseCache {
    /// Store an outcome under the fingerprint of `request`.
    ///
    /// The TTL is `ttl_override`, else the response's `Cache-Control:
    /// max-age`, else `CacheConfig::default_ttl`.
    pub fn store(&self, outcome: &Outcome, request: &RequestDescriptor, ttl_override: Option<Duration>) {
        let config = &self.shared.config;
        if !config.tier_strategy.is_enabled() || !self.should_cache(outcome) {
            return;
        }

        let ttl = ttl_override
            .or_else(|| outcome.header("cache-control").and_then(parse_max_age))
            .unwrap_or(config.default_ttl);
        if ttl.is_zero() {
            tracing::debug!(target: "harbor::cache", url = %request.url, "Zero TTL, not caching");
            return;
        }

        let key = CacheKey::from_request(request).hash_key();
        let now = self.shared.clock.now();
        let entry = match self.build_entry(key.clone(), outcome, now, ttl) {
            Ok(entry) => entry,
            Err(e) => {
                self.shared.stats.record_error();
                tracing::warn!(target: "harbor::cache", key = %key, error = %e, "Failed to build cache entry");
                return;
            }
        };

        let mut state = self.shared.lock_state();
        let mut stored = false;

        if config.tier_strategy.uses_memory() {
            let insertion = state.memory.insert(entry.clone(), config.eviction_policy, now);
            if !insertion.evicted.is_empty() {
                tracing::debug!(
                    target: "harbor::cache",
                    evicted_count = insertion.evicted.len(),
                    memory_bytes = state.memory.bytes(),
                    max_memory = config.memory_capacity_bytes,
                    "Cache evicted entries due to memory limit"
                );
                self.shared.stats.record_evictions(insertion.evicted.len() as u64);
            }
            if insertion.stored {
                stored = true;
            } else {
                tracing::debug!(
                    target: "harbor::cache",
                    key = %key,
                    entry_size = entry.size_bytes(),
                    "Entry larger than memory tier, skipped"
                );
            }
        }

        if config.tier_strategy.uses_disk() {
            if let Some(disk) = state.disk.as_mut() {
                match disk.write(&entry) {
                    Ok(removed) => {
                        stored = true;
                        if !removed.is_empty() {
                            tracing::debug!(
                                target: "harbor::cache",
                                evicted_count = removed.len(),
                                "Disk tier evicted entries due to capacity limit"
                            );
                            self.shared.stats.record_evictions(removed.len() as u64);
                        }
                    }
                    Err(e) => {
                        self.shared.stats.record_error();
                        tracing::warn!(target: "harbor::cache", key = %key, error = %e, "Disk tier write failed");
                    }
                }
            }
        }

        if stored {
            self.shared.stats.record_store();
            tracing::debug!(target: "harbor::cache", key = %key, ttl_secs = ttl.as_secs(), "Stored response");
        }
    }

    fn build_entry(
        &self,
        key: String,
        outcome: &Outcome,
        now: DateTime<Utc>,
        ttl: Duration,
    ) -> StorageResult<CacheEntry> {
        let config = &self.shared.config;
        let body = outcome.body();

        let (payload, is_compressed) =
            if config.compression_enabled && body.len() > config.compression_threshold_bytes {
                match compress_if_smaller(&body)? {
                    Some(compressed) => (Bytes::from(compressed), true),
                    None => (body, false),
                }
            } else {
                (body, false)
            };

        Ok(CacheEntry::new(
            key,
            payload,
            ResponseMetadata {
                status_code: outcome.status_code,
                headers: outcome.headers.clone(),
            },
            now,
            add_duration(now, ttl),
            is_compressed,
        ))
    }

    /// Look up a cached entry for `request`.
    ///
    /// The memory tier is checked first; a disk hit is promoted into memory
    /// when both tiers are in use. The returned entry always carries a
    /// decompressed payload.
    pub fn retrieve(&self, request: &RequestDescriptor) -> Option<CacheEntry> {
        let strategy = self.shared.config.tier_strategy;
        if !strategy.is_enabled() {
            return None;
        }

        let key = CacheKey::from_request(request).hash_key();
        let now = self.shared.clock.now();
        let mut state = self.shared.lock_state();

        if strategy.uses_memory() {
            if let Some(entry) = self.memory_hit(&mut state, &key, now) {
                self.shared.stats.record_hit();
                tracing::debug!(target: "harbor::cache", key = %key, tier = "memory", "Cache hit");
                return Some(entry);
            }
        }

        if strategy.uses_disk() {
            if let Some(entry) = self.disk_hit(&mut state, &key, now, strategy) {
                self.shared.stats.record_hit();
                tracing::debug!(target: "harbor::cache", key = %key, tier = "disk", "Cache hit");
                return Some(entry);
            }
        }

        self.shared.stats.record_miss();
        tracing::debug!(target: "harbor::cache", key = %key, "Cache miss");
        None
    }

    fn memory_hit(&self, state: &mut CacheState, key: &str, now: DateTime<Utc>) -> Option<CacheEntry> {
        if state.memory.get(key)?.is_expired_at(now) {
            state.memory.remove(key);
            tracing::debug!(target: "harbor::cache", key = %key, "Removed expired memory entry");
            return None;
        }

        let entry = state.memory.touch(key, now)?.clone();
        match entry.decoded() {
            Ok(decoded) => Some(decoded),
            Err(e) => {
                state.memory.remove(key);
                self.shared.stats.record_error();
                tracing::warn!(target: "harbor::cache", key = %key, error = %e, "Dropped corrupted memory entry");
                None
            }
        }
    }

    fn disk_hit(
        &self,
        state: &mut CacheState,
        key: &str,
        now: DateTime<Utc>,
        strategy: TierStrategy,
    ) -> Option<CacheEntry> {
        let disk = state.disk.as_mut()?;

        let mut entry = match disk.read(key) {
            Ok(Some(entry)) => entry,
            Ok(None) => return None,
            Err(e) => {
                self.shared.stats.record_error();
                tracing::warn!(target: "harbor::cache", key = %key, error = %e, "Disk tier read failed");
                return None;
            }
        };

        if entry.is_expired_at(now) {
            if let Err(e) = disk.remove(key) {
                self.shared.stats.record_error();
                tracing::warn!(target: "harbor::cache", key = %key, error = %e, "Failed to remove expired disk entry");
            }
            return None;
        }

        entry.record_access(now);
        let decoded = match entry.decoded() {
            Ok(decoded) => decoded,
            Err(e) => {
                self.shared.stats.record_error();
                tracing::warn!(target: "harbor::cache", key = %key, error = %e, "Dropped corrupted disk entry");
                if let Err(e) = disk.remove(key) {
                    tracing::warn!(target: "harbor::cache", key = %key, error = %e, "Failed to remove corrupted disk entry");
                }
                return None;
            }
        };

        if strategy == TierStrategy::Both {
            let insertion = state
                .memory
                .insert(entry, self.shared.config.eviction_policy, now);
            if !insertion.evicted.is_empty() {
                self.shared.stats.record_evictions(insertion.evicted.len() as u64);
            }
            if insertion.stored {
                self.shared.stats.record_promotion();
                tracing::debug!(target: "harbor::cache", key = %key, "Promoted disk entry to memory");
            }
        } else if let Err(e) = disk.write(&entry) {
            self.shared.stats.record_error();
            tracing::warn!(target: "harbor::cache", key = %key, error = %e, "Failed to persist access metadata");
        }

        Some(decoded)
    }

    /// Check for a live entry without touching statistics or access metadata
    pub fn contains(&self, request: &RequestDescriptor) -> bool {
        let strategy = self.shared.config.tier_strategy;
        if !strategy.is_enabled() {
            return false;
        }
        let key = CacheKey::from_request(request).hash_key();
        let now = self.shared.clock.now();
        let mut state = self.shared.lock_state();

        if strategy.uses_memory() {
            if let Some(entry) = state.memory.get(&key) {
                if !entry.is_expired_at(now) {
                    return true;
                }
            }
        }
        if strategy.uses_disk() {
            if let Some(disk) = state.disk.as_mut() {
                return matches!(disk.read(&key), Ok(Some(entry)) if !entry.is_expired_at(now));
            }
        }
        false
    }

    /// Remove the entry for `request` from both tiers.
    /// Returns true if either tier held it.
    pub fn invalidate(&self, request: &RequestDescriptor) -> bool {
        let key = CacheKey::from_request(request).hash_key();
        let mut state = self.shared.lock_state();

        let mut removed = state.memory.remove(&key).is_some();
        if let Some(disk) = state.disk.as_mut() {
            match disk.read(&key) {
                Ok(Some(_)) => {
                    removed = true;
                    if let Err(e) = disk.remove(&key) {
                        self.shared.stats.record_error();
                        tracing::warn!(target: "harbor::cache", key = %key, error = %e, "Failed to invalidate disk entry");
                    }
                }
                Ok(None) => {}
                Err(e) => {
                    tracing::warn!(target: "harbor::cache", key = %key, error = %e, "Disk tier read failed during invalidation");
                }
            }
        }
        removed
    }

    /// Clear all cached entries in both tiers.
    ///
    /// Access-order and frequency bookkeeping is reset; cumulative
    /// statistics are not.
    pub fn invalidate_all(&self) {
        let mut state = self.shared.lock_state();
        state.memory.clear();
        if let Some(disk) = state.disk.as_mut() {
            if let Err(e) = disk.clear() {
                self.shared.stats.record_error();
                tracing::warn!(target: "harbor::cache", error = %e, "Failed to clear disk tier");
            }
        }
        tracing::debug!(target: "harbor::cache", "Invalidated all cache entries");
    }

    /// Check if an outcome may be cached under the current configuration
    pub fn should_cache(&self, outcome: &Outcome) -> bool {
        if outcome.status_code().is_none() {
            return false;
        }
        if outcome.is_error() && !self.shared.config.cache_error_responses {
            return false;
        }

        if let Some(cache_control) = outcome.header("cache-control") {
            let cache_control_lower = cache_control.to_ascii_lowercase();
            if cache_control_lower.contains("no-store") || cache_control_lower.contains("no-cache") {
                tracing::debug!(
                    target: "harbor::cache",
                    cache_control = cache_control,
                    "Response marked as not cacheable by Cache-Control header"
                );
                return false;
            }
            if parse_max_age(&cache_control_lower) == Some(Duration::ZERO) {
                tracing::debug!(target: "harbor::cache", "Response has max-age=0, not caching");
                return false;
            }
        }

        // Pragma: no-cache (HTTP/1.0 legacy)
        if outcome
            .header("pragma")
            .is_some_and(|pragma| pragma.to_ascii_lowercase().contains("no-cache"))
        {
            tracing::debug!(target: "harbor::cache", "Response has Pragma: no-cache, not caching");
            return false;
        }

        true
    }
}

/// Parse max-age value from Cache-Control header
fn parse_max_age(cache_control: &str) -> Option<Duration> {
    cache_control
        .split(',')
        .map(str::trim)
        .find_map(|directive| {
            let (name, value) = directive.split_once('=')?;
            if name.trim().eq_ignore_ascii_case("max-age") {
                value.trim().trim_matches('"').parse::<u64>().ok()
            } else {
                None
            }
        })
        .map(Duration::from_secs)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_max_age_directive() {
        assert_eq!(parse_max_age("public, max-age=120"), Some(Duration::from_secs(120)));
        assert_eq!(parse_max_age("Max-Age=\"5\""), Some(Duration::from_secs(5)));
        assert_eq!(parse_max_age("s-maxage=10, public"), None);
        assert_eq!(parse_max_age("max-age=abc"), None);
    }
}
