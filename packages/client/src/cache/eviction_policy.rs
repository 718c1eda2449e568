//! Victim selection for capacity-driven eviction
//!
//! The memory tier hands every resident entry to [`EvictionPolicy::select_victims`]
//! as an [`EvictionCandidate`] and removes the returned keys in order.

use chrono::{DateTime, Utc};

/// Eviction policy applied when a memory-tier write would exceed capacity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EvictionPolicy {
    /// Least recently accessed first
    #[default]
    Lru,
    /// Least frequently accessed first
    Lfu,
    /// Oldest created first
    Fifo,
    /// Every expired entry first, then least recently accessed
    TtlFirst,
}

/// Snapshot of the bookkeeping for one resident entry
#[derive(Debug, Clone)]
pub struct EvictionCandidate {
    pub key: String,
    pub size_bytes: u64,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
    pub last_accessed_at: DateTime<Utc>,
    pub access_count: u64,
    /// Tier-local insertion sequence; breaks ties between equal `created_at`
    pub inserted_seq: u64,
    /// Tier-local access sequence; breaks ties between equal `last_accessed_at`
    pub touched_seq: u64,
}

impl EvictionPolicy {
    /// Pick the keys to remove so that at least `bytes_to_free` bytes are
    /// released. Returns keys in removal order; may free less than requested
    /// only when the candidates run out.
    pub fn select_victims(
        self,
        mut candidates: Vec<EvictionCandidate>,
        bytes_to_free: u64,
        now: DateTime<Utc>,
    ) -> Vec<String> {
        let mut victims = Vec::new();
        let mut freed = 0u64;

        if self == EvictionPolicy::TtlFirst {
            let (expired, live): (Vec<_>, Vec<_>) = candidates
                .into_iter()
                .partition(|c| now > c.expires_at);
            for candidate in expired {
                freed += candidate.size_bytes;
                victims.push(candidate.key);
            }
            candidates = live;
        }

        if freed >= bytes_to_free {
            return victims;
        }

        match self {
            EvictionPolicy::Lru | EvictionPolicy::TtlFirst => {
                candidates.sort_by_key(|c| (c.last_accessed_at, c.touched_seq));
            }
            EvictionPolicy::Lfu => {
                candidates.sort_by_key(|c| (c.access_count, c.last_accessed_at, c.touched_seq));
            }
            EvictionPolicy::Fifo => {
                candidates.sort_by_key(|c| (c.created_at, c.inserted_seq));
            }
        }

        for candidate in candidates {
            if freed >= bytes_to_free {
                break;
            }
            freed += candidate.size_bytes;
            victims.push(candidate.key);
        }

        victims
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeDelta;

    use super::*;

    fn candidate(key: &str, offset_secs: i64, accessed_secs: i64, hits: u64, seq: u64) -> EvictionCandidate {
        let base = DateTime::<Utc>::UNIX_EPOCH;
        EvictionCandidate {
            key: key.to_string(),
            size_bytes: 10,
            created_at: base + TimeDelta::seconds(offset_secs),
            expires_at: base + TimeDelta::seconds(offset_secs + 100),
            last_accessed_at: base + TimeDelta::seconds(accessed_secs),
            access_count: hits,
            inserted_seq: seq,
            touched_seq: seq,
        }
    }

    fn now() -> DateTime<Utc> {
        DateTime::<Utc>::UNIX_EPOCH + TimeDelta::seconds(50)
    }

    #[test]
    fn lru_removes_least_recently_accessed() {
        let candidates = vec![
            candidate("a", 0, 30, 1, 0),
            candidate("b", 1, 1, 0, 1),
            candidate("c", 2, 2, 0, 2),
        ];
        assert_eq!(EvictionPolicy::Lru.select_victims(candidates, 10, now()), vec!["b"]);
    }

    #[test]
    fn lfu_removes_least_frequently_accessed() {
        let candidates = vec![
            candidate("a", 0, 0, 5, 0),
            candidate("b", 1, 1, 2, 1),
            candidate("c", 2, 2, 9, 2),
        ];
        assert_eq!(EvictionPolicy::Lfu.select_victims(candidates, 15, now()), vec!["b", "a"]);
    }

    #[test]
    fn fifo_removes_oldest_created() {
        let candidates = vec![
            candidate("late", 5, 0, 0, 2),
            candidate("early", 1, 40, 7, 0),
            candidate("mid", 3, 0, 0, 1),
        ];
        assert_eq!(EvictionPolicy::Fifo.select_victims(candidates, 10, now()), vec!["early"]);
    }

    #[test]
    fn ttl_first_drops_all_expired_before_falling_back_to_lru() {
        let mut expired_a = candidate("expired-a", 0, 0, 0, 0);
        expired_a.expires_at = DateTime::<Utc>::UNIX_EPOCH + TimeDelta::seconds(10);
        let mut expired_b = candidate("expired-b", 0, 0, 0, 1);
        expired_b.expires_at = DateTime::<Utc>::UNIX_EPOCH + TimeDelta::seconds(20);
        let candidates = vec![expired_a, candidate("live", 3, 3, 0, 2), expired_b];

        let victims = EvictionPolicy::TtlFirst.select_victims(candidates.clone(), 5, now());
        assert_eq!(victims, vec!["expired-a", "expired-b"]);

        let victims = EvictionPolicy::TtlFirst.select_victims(candidates, 30, now());
        assert_eq!(victims, vec!["expired-a", "expired-b", "live"]);
    }
}
