//! Memory and disk tiers behind the response cache
//!
//! Neither tier locks on its own; both are only ever touched while the
//! owning `ResponseCache` holds its state mutex.

use std::collections::HashMap;

use chrono::{DateTime, Utc};

use super::cache_entry::CacheEntry;
use super::eviction_policy::{EvictionCandidate, EvictionPolicy};
use super::storage::StorageBackend;
use crate::error::{StorageError, StorageResult};

#[derive(Debug)]
pub(crate) struct MemorySlot {
    pub(crate) entry: CacheEntry,
    size_bytes: u64,
    inserted_seq: u64,
    touched_seq: u64,
}

/// Result of a memory-tier insert
#[derive(Debug, Default)]
pub(crate) struct Insertion {
    pub(crate) stored: bool,
    pub(crate) evicted: Vec<String>,
}

/// Fast volatile tier with byte-capacity enforcement
#[derive(Debug)]
pub(crate) struct MemoryTier {
    slots: HashMap<String, MemorySlot>,
    bytes: u64,
    capacity: u64,
    /// Monotonic operation counter giving a total access/insert order
    seq: u64,
}

impl MemoryTier {
    pub(crate) fn new(capacity: u64) -> Self {
        Self {
            slots: HashMap::new(),
            bytes: 0,
            capacity,
            seq: 0,
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.slots.len()
    }

    pub(crate) fn bytes(&self) -> u64 {
        self.bytes
    }

    pub(crate) fn contains(&self, key: &str) -> bool {
        self.slots.contains_key(key)
    }

    pub(crate) fn get(&self, key: &str) -> Option<&CacheEntry> {
        self.slots.get(key).map(|slot| &slot.entry)
    }

    fn next_seq(&mut self) -> u64 {
        self.seq += 1;
        self.seq
    }

    /// Record a hit and return the updated entry
    pub(crate) fn touch(&mut self, key: &str, now: DateTime<Utc>) -> Option<&CacheEntry> {
        let seq = self.next_seq();
        let slot = self.slots.get_mut(key)?;
        slot.entry.record_access(now);
        slot.touched_seq = seq;
        Some(&slot.entry)
    }

    pub(crate) fn remove(&mut self, key: &str) -> Option<CacheEntry> {
        let slot = self.slots.remove(key)?;
        self.bytes -= slot.size_bytes;
        Some(slot.entry)
    }

    /// Insert `entry`, evicting under `policy` until it fits.
    ///
    /// An entry larger than the whole tier is not stored. After this returns
    /// the tracked bytes never exceed capacity.
    pub(crate) fn insert(
        &mut self,
        entry: CacheEntry,
        policy: EvictionPolicy,
        now: DateTime<Utc>,
    ) -> Insertion {
        let key = entry.key.clone();
        self.remove(&key);

        let size_bytes = entry.size_bytes();
        if size_bytes > self.capacity {
            return Insertion::default();
        }

        let mut evicted = Vec::new();
        if self.bytes + size_bytes > self.capacity {
            let bytes_to_free = self.bytes + size_bytes - self.capacity;
            for victim in policy.select_victims(self.candidates(), bytes_to_free, now) {
                if self.remove(&victim).is_some() {
                    evicted.push(victim);
                }
            }
        }

        let seq = self.next_seq();
        self.bytes += size_bytes;
        self.slots.insert(
            key,
            MemorySlot {
                entry,
                size_bytes,
                inserted_seq: seq,
                touched_seq: seq,
            },
        );

        Insertion {
            stored: true,
            evicted,
        }
    }

    fn candidates(&self) -> Vec<EvictionCandidate> {
        self.slots
            .iter()
            .map(|(key, slot)| EvictionCandidate {
                key: key.clone(),
                size_bytes: slot.size_bytes,
                created_at: slot.entry.created_at,
                expires_at: slot.entry.expires_at,
                last_accessed_at: slot.entry.last_accessed_at,
                access_count: slot.entry.access_count,
                inserted_seq: slot.inserted_seq,
                touched_seq: slot.touched_seq,
            })
            .collect()
    }

    /// Drop every expired entry, returning how many were removed
    pub(crate) fn remove_expired(&mut self, now: DateTime<Utc>) -> usize {
        let expired: Vec<String> = self
            .slots
            .iter()
            .filter(|(_, slot)| slot.entry.is_expired_at(now))
            .map(|(key, _)| key.clone())
            .collect();
        for key in &expired {
            self.remove(key);
        }
        expired.len()
    }

    /// Remove all entries and reset access-order bookkeeping
    pub(crate) fn clear(&mut self) {
        self.slots.clear();
        self.bytes = 0;
        self.seq = 0;
    }
}

#[derive(Debug, Clone, Copy)]
struct DiskRecord {
    size_bytes: u64,
    created_at: DateTime<Utc>,
}

/// Persistent tier storing JSON-serialized entries in a [`StorageBackend`]
#[derive(Debug)]
pub(crate) struct DiskTier {
    backend: Box<dyn StorageBackend>,
    index: HashMap<String, DiskRecord>,
    bytes: u64,
    capacity: u64,
    enforce_capacity: bool,
}

impl DiskTier {
    /// Open the tier and index whatever the backend already holds.
    /// Unreadable entries are deleted while indexing.
    pub(crate) fn open(backend: Box<dyn StorageBackend>, capacity: u64, enforce_capacity: bool) -> Self {
        let mut tier = Self {
            backend,
            index: HashMap::new(),
            bytes: 0,
            capacity,
            enforce_capacity,
        };
        tier.rebuild_index();
        tier
    }

    fn rebuild_index(&mut self) {
        self.index.clear();
        self.bytes = 0;
        let keys = match self.backend.keys() {
            Ok(keys) => keys,
            Err(e) => {
                tracing::warn!(target: "harbor::cache", error = %e, "Failed to list disk tier entries");
                return;
            }
        };
        for key in keys {
            match self.read(&key) {
                Ok(Some(entry)) => {
                    let size_bytes = self.stored_size(&entry);
                    self.track(key, size_bytes, entry.created_at);
                }
                Ok(None) => {}
                Err(e) => {
                    tracing::warn!(target: "harbor::cache", key = %key, error = %e, "Dropped unreadable disk entry");
                }
            }
        }
    }

    fn stored_size(&self, entry: &CacheEntry) -> u64 {
        serde_json::to_vec(entry).map_or_else(|_| entry.size_bytes(), |bytes| bytes.len() as u64)
    }

    fn track(&mut self, key: String, size_bytes: u64, created_at: DateTime<Utc>) {
        if let Some(previous) = self.index.insert(key, DiskRecord { size_bytes, created_at }) {
            self.bytes -= previous.size_bytes;
        }
        self.bytes += size_bytes;
    }

    fn untrack(&mut self, key: &str) {
        if let Some(record) = self.index.remove(key) {
            self.bytes -= record.size_bytes;
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.index.len()
    }

    pub(crate) fn bytes(&self) -> u64 {
        self.bytes
    }

    /// Read and deserialize an entry.
    ///
    /// A payload that fails to deserialize is removed from the backend and
    /// reported as `StorageError::Corrupted`.
    pub(crate) fn read(&mut self, key: &str) -> StorageResult<Option<CacheEntry>> {
        let Some(bytes) = self.backend.read(key)? else {
            self.untrack(key);
            return Ok(None);
        };
        match serde_json::from_slice::<CacheEntry>(&bytes) {
            Ok(entry) if entry.key == key => Ok(Some(entry)),
            _ => {
                self.remove(key)?;
                Err(StorageError::Corrupted(key.to_string()))
            }
        }
    }

    /// Serialize and persist an entry, then enforce capacity if enabled.
    /// Returns the keys removed to make room.
    pub(crate) fn write(&mut self, entry: &CacheEntry) -> StorageResult<Vec<String>> {
        let bytes = serde_json::to_vec(entry)?;
        self.backend.write(&entry.key, &bytes)?;
        self.track(entry.key.clone(), bytes.len() as u64, entry.created_at);

        if self.enforce_capacity && self.bytes > self.capacity {
            return Ok(self.shrink_to_capacity(&entry.key));
        }
        Ok(Vec::new())
    }

    /// Remove oldest-created entries until under capacity, never touching
    /// the entry that was just written.
    fn shrink_to_capacity(&mut self, keep: &str) -> Vec<String> {
        let mut by_age: Vec<(String, DateTime<Utc>)> = self
            .index
            .iter()
            .filter(|(key, _)| key.as_str() != keep)
            .map(|(key, record)| (key.clone(), record.created_at))
            .collect();
        by_age.sort_by(|a, b| a.1.cmp(&b.1).then_with(|| a.0.cmp(&b.0)));

        let mut removed = Vec::new();
        for (key, _) in by_age {
            if self.bytes <= self.capacity {
                break;
            }
            match self.remove(&key) {
                Ok(()) => removed.push(key),
                Err(e) => {
                    tracing::warn!(target: "harbor::cache", key = %key, error = %e, "Failed to evict disk entry");
                }
            }
        }
        removed
    }

    pub(crate) fn remove(&mut self, key: &str) -> StorageResult<()> {
        self.untrack(key);
        self.backend.remove(key)
    }

    /// Remove every expired entry (and every unreadable one)
    pub(crate) fn remove_expired(&mut self, now: DateTime<Utc>) -> usize {
        let keys = match self.backend.keys() {
            Ok(keys) => keys,
            Err(e) => {
                tracing::warn!(target: "harbor::cache", error = %e, "Failed to list disk tier entries");
                return 0;
            }
        };
        let mut removed = 0;
        for key in keys {
            match self.read(&key) {
                Ok(Some(entry)) if entry.is_expired_at(now) => {
                    if let Err(e) = self.remove(&key) {
                        tracing::warn!(target: "harbor::cache", key = %key, error = %e, "Failed to remove expired disk entry");
                    } else {
                        removed += 1;
                    }
                }
                Ok(_) => {}
                Err(e) => {
                    tracing::warn!(target: "harbor::cache", key = %key, error = %e, "Dropped unreadable disk entry");
                    removed += 1;
                }
            }
        }
        removed
    }

    pub(crate) fn clear(&mut self) -> StorageResult<()> {
        self.index.clear();
        self.bytes = 0;
        self.backend.clear()
    }
}
