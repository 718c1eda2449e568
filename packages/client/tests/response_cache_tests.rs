use std::sync::Arc;
use std::time::Duration;

use harbor_client::cache::{CacheKey, Clock, ManualClock, StorageBackend};
use harbor_client::prelude::*;

fn clock() -> Arc<ManualClock> {
    Arc::new(ManualClock::starting_now())
}

fn memory_cache(clock: Arc<ManualClock>) -> ResponseCache {
    ResponseCache::with_parts(CacheConfig::memory_only(1024 * 1024), None, clock)
        .expect("valid memory-only config")
}

fn tiered_cache(
    strategy: TierStrategy,
    backend: Arc<MemoryBackend>,
    clock: Arc<ManualClock>,
) -> ResponseCache {
    let config = CacheConfig {
        tier_strategy: strategy,
        sweep_interval: None,
        ..CacheConfig::default()
    };
    ResponseCache::with_parts(config, Some(Box::new(backend)), clock).expect("valid tiered config")
}

fn get(path: &str) -> RequestDescriptor {
    RequestDescriptor::get(format!("https://example.com{path}"))
}

#[test]
fn test_store_then_retrieve_counts_hit() {
    let cache = memory_cache(clock());
    let request = get("/x");

    cache.store(&Outcome::ok("abc"), &request, Some(Duration::from_secs(300)));
    let entry = cache.retrieve(&request).expect("entry should be cached");

    assert_eq!(entry.payload.as_ref(), b"abc");
    assert_eq!(entry.response_metadata.status_code, 200);
    assert_eq!(entry.access_count, 1);

    let stats = cache.stats();
    assert_eq!(stats.hits, 1);
    assert_eq!(stats.misses, 0);
    assert_eq!(stats.stores, 1);
}

#[test]
fn test_retrieve_unknown_key_is_miss() {
    let cache = memory_cache(clock());

    assert!(cache.retrieve(&get("/never-stored")).is_none());

    let stats = cache.stats();
    assert_eq!(stats.misses, 1);
    assert_eq!(stats.hits, 0);
}

#[test]
fn test_ttl_boundary() {
    let clock = clock();
    let cache = memory_cache(clock.clone());
    let request = get("/ttl");

    cache.store(&Outcome::ok("body"), &request, Some(Duration::from_secs(10)));

    clock.advance(Duration::from_secs(10) - Duration::from_millis(1));
    assert!(cache.retrieve(&request).is_some());

    clock.advance(Duration::from_millis(2));
    assert!(cache.retrieve(&request).is_none());

    // The expired entry was physically removed on read.
    let (entries, bytes, _) = cache.size_info();
    assert_eq!(entries, 0);
    assert_eq!(bytes, 0);
}

#[test]
fn test_default_ttl_and_max_age() {
    let clock = clock();
    let config = CacheConfig {
        default_ttl: Duration::from_secs(60),
        ..CacheConfig::memory_only(1024 * 1024)
    };
    let cache = ResponseCache::with_parts(config, None, clock.clone()).unwrap();

    let plain = get("/plain");
    let short = get("/short");
    cache.store(&Outcome::ok("a"), &plain, None);
    cache.store(&Outcome::ok("b").with_header("Cache-Control", "public, max-age=5"), &short, None);

    clock.advance(Duration::from_secs(6));
    assert!(cache.retrieve(&short).is_none());
    assert!(cache.retrieve(&plain).is_some());
}

#[test]
fn test_key_ignores_authorization() {
    let cache = memory_cache(clock());
    let alice = get("/profile").with_header("Authorization", "Bearer alice");
    let bob = get("/profile").with_header("authorization", "Bearer bob");

    assert_eq!(
        CacheKey::from_request(&alice).hash_key(),
        CacheKey::from_request(&bob).hash_key()
    );

    cache.store(&Outcome::ok("shared"), &alice, None);
    let entry = cache.retrieve(&bob).expect("entry is shared across credentials");
    assert_eq!(entry.payload.as_ref(), b"shared");
}

#[test]
fn test_error_responses_respect_config() {
    let cache = memory_cache(clock());
    let request = get("/broken");

    cache.store(&Outcome::status(500), &request, None);
    assert!(!cache.contains(&request));
    assert_eq!(cache.stats().stores, 0);

    let config = CacheConfig {
        cache_error_responses: true,
        ..CacheConfig::memory_only(1024 * 1024)
    };
    let caching_errors = ResponseCache::with_parts(config, None, clock()).unwrap();
    caching_errors.store(&Outcome::status(500), &request, None);
    let entry = caching_errors.retrieve(&request).unwrap();
    assert_eq!(entry.response_metadata.status_code, 500);

    // Transport failures have no response to rebuild.
    let failed = get("/unreachable");
    caching_errors.store(&Outcome::failure(ErrorKind::Connection), &failed, None);
    assert!(!caching_errors.contains(&failed));
}

#[test]
fn test_no_store_directives_are_honoured() {
    let cache = memory_cache(clock());
    let request = get("/private");

    cache.store(&Outcome::ok("x").with_header("Cache-Control", "no-store"), &request, None);
    cache.store(&Outcome::ok("x").with_header("Pragma", "no-cache"), &request, None);
    cache.store(&Outcome::ok("x").with_header("Cache-Control", "max-age=0"), &request, None);

    assert!(!cache.contains(&request));
    assert_eq!(cache.stats().stores, 0);
}

#[test]
fn test_tier_none_is_a_no_op() {
    let cache = ResponseCache::new(CacheConfig::no_cache()).unwrap();
    let request = get("/x");

    cache.store(&Outcome::ok("abc"), &request, None);
    assert!(cache.retrieve(&request).is_none());

    let stats = cache.stats();
    assert_eq!(stats.stores, 0);
    assert_eq!(stats.misses, 0);
}

#[test]
fn test_disk_strategy_requires_backend() {
    let config = CacheConfig {
        tier_strategy: TierStrategy::DiskOnly,
        ..CacheConfig::default()
    };
    assert!(matches!(
        ResponseCache::new(config),
        Err(ConfigurationError::Conflict(_))
    ));
}

#[test]
fn test_disk_entry_is_promoted_into_memory() {
    let clock = clock();
    let backend = Arc::new(MemoryBackend::new());
    let request = get("/promote");

    let writer = tiered_cache(TierStrategy::DiskOnly, backend.clone(), clock.clone());
    writer.store(&Outcome::ok("from disk"), &request, None);
    drop(writer);

    let cache = tiered_cache(TierStrategy::Both, backend.clone(), clock);
    assert_eq!(cache.size_info(), (0, 0, 1));

    let entry = cache.retrieve(&request).expect("disk hit");
    assert_eq!(entry.payload.as_ref(), b"from disk");
    assert_eq!(cache.stats().promotions, 1);
    assert_eq!(cache.size_info().0, 1);

    // Remove the persisted copy; the promoted copy must still serve reads.
    backend.clear().unwrap();
    let entry = cache.retrieve(&request).expect("memory hit after promotion");
    assert_eq!(entry.payload.as_ref(), b"from disk");
    assert_eq!(cache.stats().hits, 2);
}

#[test]
fn test_disk_only_does_not_promote() {
    let backend = Arc::new(MemoryBackend::new());
    let cache = tiered_cache(TierStrategy::DiskOnly, backend, clock());
    let request = get("/disk-only");

    cache.store(&Outcome::ok("payload"), &request, None);
    let first = cache.retrieve(&request).unwrap();
    let second = cache.retrieve(&request).unwrap();

    assert_eq!(first.access_count, 1);
    assert_eq!(second.access_count, 2);
    assert_eq!(cache.size_info().0, 0);
    assert_eq!(cache.stats().promotions, 0);
}

#[test]
fn test_corrupted_disk_entry_is_deleted() {
    let backend = Arc::new(MemoryBackend::new());
    let cache = tiered_cache(TierStrategy::Both, backend.clone(), clock());
    let request = get("/corrupt");
    let key = CacheKey::from_request(&request).hash_key();

    backend.write(&key, b"{ not json").unwrap();

    assert!(cache.retrieve(&request).is_none());
    assert_eq!(backend.read(&key).unwrap(), None);

    let stats = cache.stats();
    assert_eq!(stats.errors, 1);
    assert_eq!(stats.misses, 1);
}

#[test]
fn test_compressed_payload_round_trips_through_disk() {
    let backend = Arc::new(MemoryBackend::new());
    let config = CacheConfig {
        tier_strategy: TierStrategy::DiskOnly,
        compression_enabled: true,
        compression_threshold_bytes: 64,
        sweep_interval: None,
        ..CacheConfig::default()
    };
    let cache = ResponseCache::with_parts(config, Some(Box::new(backend.clone())), clock()).unwrap();
    let request = get("/large");
    let body = "repeated response text ".repeat(200);

    cache.store(&Outcome::ok(body.clone()), &request, None);

    let key = CacheKey::from_request(&request).hash_key();
    let raw = backend.read(&key).unwrap().unwrap();
    let persisted: serde_json::Value = serde_json::from_slice(&raw).unwrap();
    assert_eq!(persisted["is_compressed"], serde_json::Value::Bool(true));

    let entry = cache.retrieve(&request).unwrap();
    assert!(!entry.is_compressed);
    assert_eq!(entry.payload.as_ref(), body.as_bytes());
}

#[test]
fn test_invalidate_single_entry() {
    let cache = memory_cache(clock());
    let keep = get("/keep");
    let drop_me = get("/drop");

    cache.store(&Outcome::ok("k"), &keep, None);
    cache.store(&Outcome::ok("d"), &drop_me, None);

    assert!(cache.invalidate(&drop_me));
    assert!(!cache.invalidate(&drop_me));
    assert!(cache.contains(&keep));
    assert!(!cache.contains(&drop_me));
}

#[test]
fn test_invalidate_all_keeps_statistics() {
    let backend = Arc::new(MemoryBackend::new());
    let cache = tiered_cache(TierStrategy::Both, backend.clone(), clock());
    let request = get("/x");

    cache.store(&Outcome::ok("abc"), &request, None);
    cache.retrieve(&request);
    cache.retrieve(&get("/missing"));

    cache.invalidate_all();

    assert_eq!(cache.size_info(), (0, 0, 0));
    assert!(backend.keys().unwrap().is_empty());
    assert!(cache.retrieve(&request).is_none());

    let stats = cache.stats();
    assert_eq!(stats.stores, 1);
    assert_eq!(stats.hits, 1);
    assert_eq!(stats.misses, 2);

    cache.reset_stats();
    assert_eq!(cache.stats(), CacheStatsSnapshot::default());
}

#[test]
fn test_contains_has_no_side_effects() {
    let cache = memory_cache(clock());
    let request = get("/peek");
    cache.store(&Outcome::ok("abc"), &request, None);

    assert!(cache.contains(&request));
    assert!(!cache.contains(&get("/other")));

    let stats = cache.stats();
    assert_eq!(stats.hits, 0);
    assert_eq!(stats.misses, 0);
    assert_eq!(cache.retrieve(&request).unwrap().access_count, 1);
}

#[test]
fn test_filesystem_tier_survives_restart() {
    let dir = tempfile::tempdir().unwrap();
    let config = CacheConfig {
        tier_strategy: TierStrategy::DiskOnly,
        sweep_interval: None,
        ..CacheConfig::default()
    };
    let request = get("/persisted").with_header("Accept", "application/json");

    {
        let backend = FileSystemBackend::open(dir.path()).unwrap();
        let cache = ResponseCache::with_storage(config.clone(), backend).unwrap();
        cache.store(&Outcome::ok("{\"ok\":true}").with_header("etag", "\"v1\""), &request, None);
    }

    let backend = FileSystemBackend::open(dir.path()).unwrap();
    let cache = ResponseCache::with_storage(config, backend).unwrap();
    let outcome = cache.retrieve(&request).expect("entry persisted on disk").to_outcome();
    assert!(outcome.is_success());
    assert_eq!(outcome.body().as_ref(), b"{\"ok\":true}");
    assert_eq!(outcome.header("ETag"), Some("\"v1\""));
}

#[test]
fn test_manual_clock_is_shared() {
    let clock = clock();
    let before = clock.now();
    clock.advance(Duration::from_secs(3));
    assert_eq!((clock.now() - before).num_seconds(), 3);
}
