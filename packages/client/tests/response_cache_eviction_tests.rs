use std::sync::Arc;
use std::time::Duration;

use harbor_client::cache::ManualClock;
use harbor_client::prelude::*;

/// Every entry below is 100 payload bytes plus a 64 byte key.
const ENTRY_BYTES: u64 = 164;

fn body() -> String {
    "x".repeat(100)
}

fn get(path: &str) -> RequestDescriptor {
    RequestDescriptor::get(format!("https://example.com/{path}"))
}

fn bounded_cache(policy: EvictionPolicy, entries: u64, clock: Arc<ManualClock>) -> ResponseCache {
    let config = CacheConfig {
        eviction_policy: policy,
        ..CacheConfig::memory_only(ENTRY_BYTES * entries + ENTRY_BYTES / 2)
    };
    ResponseCache::with_parts(config, None, clock).expect("valid config")
}

#[test]
fn test_lru_evicts_least_recently_read() {
    let clock = Arc::new(ManualClock::starting_now());
    let cache = bounded_cache(EvictionPolicy::Lru, 3, clock.clone());

    for path in ["a", "b", "c"] {
        cache.store(&Outcome::ok(body()), &get(path), None);
        clock.advance(Duration::from_secs(1));
    }
    assert!(cache.retrieve(&get("a")).is_some());
    clock.advance(Duration::from_secs(1));

    cache.store(&Outcome::ok(body()), &get("d"), None);

    assert!(cache.contains(&get("a")));
    assert!(!cache.contains(&get("b")));
    assert!(cache.contains(&get("c")));
    assert!(cache.contains(&get("d")));
    assert_eq!(cache.stats().evictions, 1);
}

#[test]
fn test_lru_tie_breaks_on_access_order() {
    // All operations happen at the same instant; ordering must still hold.
    let clock = Arc::new(ManualClock::starting_now());
    let cache = bounded_cache(EvictionPolicy::Lru, 2, clock);

    cache.store(&Outcome::ok(body()), &get("a"), None);
    cache.store(&Outcome::ok(body()), &get("b"), None);
    cache.retrieve(&get("a"));
    cache.store(&Outcome::ok(body()), &get("c"), None);

    assert!(cache.contains(&get("a")));
    assert!(!cache.contains(&get("b")));
}

#[test]
fn test_lfu_evicts_least_frequently_read() {
    let clock = Arc::new(ManualClock::starting_now());
    let cache = bounded_cache(EvictionPolicy::Lfu, 3, clock.clone());

    for path in ["a", "b", "c"] {
        cache.store(&Outcome::ok(body()), &get(path), None);
    }
    for _ in 0..3 {
        cache.retrieve(&get("a"));
        cache.retrieve(&get("b"));
    }
    cache.retrieve(&get("c"));
    clock.advance(Duration::from_secs(1));

    cache.store(&Outcome::ok(body()), &get("d"), None);

    assert!(cache.contains(&get("a")));
    assert!(cache.contains(&get("b")));
    assert!(!cache.contains(&get("c")));
    assert!(cache.contains(&get("d")));
}

#[test]
fn test_fifo_ignores_reads() {
    let clock = Arc::new(ManualClock::starting_now());
    let cache = bounded_cache(EvictionPolicy::Fifo, 3, clock.clone());

    for path in ["a", "b", "c"] {
        cache.store(&Outcome::ok(body()), &get(path), None);
        clock.advance(Duration::from_secs(1));
    }
    cache.retrieve(&get("a"));

    cache.store(&Outcome::ok(body()), &get("d"), None);

    assert!(!cache.contains(&get("a")));
    assert!(cache.contains(&get("b")));
}

#[test]
fn test_ttl_first_prefers_expired_entries() {
    let clock = Arc::new(ManualClock::starting_now());
    let cache = bounded_cache(EvictionPolicy::TtlFirst, 3, clock.clone());

    cache.store(&Outcome::ok(body()), &get("a"), Some(Duration::from_secs(600)));
    cache.store(&Outcome::ok(body()), &get("b"), Some(Duration::from_secs(5)));
    cache.store(&Outcome::ok(body()), &get("c"), Some(Duration::from_secs(600)));
    clock.advance(Duration::from_secs(10));

    cache.store(&Outcome::ok(body()), &get("d"), Some(Duration::from_secs(600)));

    assert!(cache.contains(&get("a")));
    assert!(cache.contains(&get("c")));
    assert!(cache.contains(&get("d")));
    assert_eq!(cache.size_info().0, 3);
}

#[test]
fn test_memory_never_exceeds_capacity() {
    let clock = Arc::new(ManualClock::starting_now());
    let capacity = 1_000;
    let cache = ResponseCache::with_parts(CacheConfig::memory_only(capacity), None, clock.clone()).unwrap();

    for i in 0..50 {
        let payload = "y".repeat(50 + (i * 37) % 300);
        cache.store(&Outcome::ok(payload), &get(&format!("item/{i}")), None);
        clock.advance(Duration::from_millis(10));

        let (_, bytes, _) = cache.size_info();
        assert!(bytes <= capacity, "memory tier holds {bytes} bytes, capacity {capacity}");
    }
    assert!(cache.stats().evictions > 0);
}

#[test]
fn test_oversized_entry_is_not_stored_in_memory() {
    let cache = ResponseCache::with_parts(
        CacheConfig::memory_only(128),
        None,
        Arc::new(ManualClock::starting_now()),
    )
    .unwrap();
    let request = get("huge");

    cache.store(&Outcome::ok("z".repeat(4096)), &request, None);

    assert!(!cache.contains(&request));
    assert_eq!(cache.stats().stores, 0);
}

#[test]
fn test_disk_capacity_removes_oldest_entries() {
    let clock = Arc::new(ManualClock::starting_now());
    let config = CacheConfig {
        tier_strategy: TierStrategy::DiskOnly,
        disk_capacity_bytes: 2_048,
        compression_enabled: false,
        sweep_interval: None,
        ..CacheConfig::default()
    };
    let cache = ResponseCache::with_parts(config, Some(Box::new(MemoryBackend::new())), clock.clone()).unwrap();

    for i in 0..10 {
        cache.store(&Outcome::ok(body()), &get(&format!("disk/{i}")), None);
        clock.advance(Duration::from_secs(1));
        assert!(cache.disk_bytes() <= 2_048);
    }

    assert!(!cache.contains(&get("disk/0")));
    assert!(cache.contains(&get("disk/9")));
    assert!(cache.stats().evictions > 0);
}

#[test]
fn test_sweep_removes_expired_from_every_tier() {
    let clock = Arc::new(ManualClock::starting_now());
    let config = CacheConfig {
        sweep_interval: None,
        ..CacheConfig::default()
    };
    let cache = ResponseCache::with_parts(config, Some(Box::new(MemoryBackend::new())), clock.clone()).unwrap();

    cache.store(&Outcome::ok("short"), &get("short"), Some(Duration::from_secs(1)));
    cache.store(&Outcome::ok("long"), &get("long"), Some(Duration::from_secs(600)));
    assert_eq!(cache.size_info().0, 2);
    assert_eq!(cache.size_info().2, 2);

    clock.advance(Duration::from_secs(2));
    let removed = cache.sweep_expired();

    assert_eq!(removed, 2);
    assert_eq!(cache.size_info().0, 1);
    assert_eq!(cache.size_info().2, 1);
    assert!(cache.contains(&get("long")));
}

#[tokio::test(start_paused = true)]
async fn test_background_sweeper_expires_entries() {
    let clock = Arc::new(ManualClock::starting_now());
    let config = CacheConfig {
        sweep_interval: Some(Duration::from_secs(1)),
        ..CacheConfig::memory_only(1024 * 1024)
    };
    let cache = ResponseCache::with_parts(config, None, clock.clone()).unwrap();
    assert!(cache.has_sweeper());

    cache.store(&Outcome::ok("short"), &get("short"), Some(Duration::from_secs(1)));
    clock.advance(Duration::from_secs(5));

    tokio::time::sleep(Duration::from_millis(1_500)).await;
    tokio::task::yield_now().await;

    assert_eq!(cache.size_info().0, 0);
}

#[tokio::test(start_paused = true)]
async fn test_background_sweeper_covers_disk_tier() {
    let clock = Arc::new(ManualClock::starting_now());
    let config = CacheConfig {
        sweep_interval: Some(Duration::from_secs(1)),
        ..CacheConfig::default()
    };
    let cache = ResponseCache::with_parts(config, Some(Box::new(MemoryBackend::new())), clock.clone()).unwrap();

    cache.store(&Outcome::ok("short"), &get("short"), Some(Duration::from_secs(1)));
    assert_eq!(cache.size_info().2, 1);
    clock.advance(Duration::from_secs(5));

    for _ in 0..10 {
        tokio::time::sleep(Duration::from_secs(1)).await;
        if cache.size_info() == (0, 0, 0) {
            break;
        }
    }
    assert_eq!(cache.size_info(), (0, 0, 0));
}

#[test]
fn test_no_sweeper_without_runtime() {
    let config = CacheConfig {
        sweep_interval: Some(Duration::from_secs(1)),
        ..CacheConfig::memory_only(1024)
    };
    let cache = ResponseCache::new(config).unwrap();
    assert!(!cache.has_sweeper());
}
