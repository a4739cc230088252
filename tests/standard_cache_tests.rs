//! Container behavior under the base (FIFO) policy: capacity, eviction,
//! clearing, and disposal.

use std::time::Duration;

use stratacache::{Cache, CacheConfig, ConfigError};

fn config(capacity: usize) -> CacheConfig {
    CacheConfig {
        capacity: Some(capacity),
        ttl: Some(Duration::from_secs(60)),
        ..CacheConfig::default()
    }
}

#[test]
fn initializes_with_correct_options() {
    let cache: Cache<String> = Cache::new(CacheConfig {
        capacity: Some(50),
        ttl: Some(Duration::from_secs(60)),
        cleanup_period: Duration::from_secs(10),
        ..CacheConfig::default()
    })
    .unwrap();

    assert_eq!(cache.capacity(), Some(50));
    assert_eq!(cache.ttl(), Some(Duration::from_secs(60)));
    assert_eq!(cache.cleanup_period(), Duration::from_secs(10));
    assert_eq!(cache.size(), 0);
    assert!(!cache.is_disposed());
    cache.dispose();
}

#[test]
fn rejects_invalid_options() {
    assert_eq!(
        Cache::<String>::new(CacheConfig {
            capacity: Some(0),
            ..CacheConfig::default()
        })
        .err(),
        Some(ConfigError::InvalidCapacity)
    );
    assert_eq!(
        Cache::<String>::new(CacheConfig {
            ttl: Some(Duration::ZERO),
            ..CacheConfig::default()
        })
        .err(),
        Some(ConfigError::InvalidTtl)
    );
}

#[test]
fn size_never_exceeds_capacity() {
    let cache: Cache<String> = Cache::new(config(50)).unwrap();
    for i in 1..=55 {
        cache.write(&format!("key{i}"), format!("value{i}"));
    }
    assert_eq!(cache.size(), 50);
    assert_eq!(cache.stats().evictions(), 5);
    cache.dispose();
}

#[test]
fn fifo_evicts_earliest_inserted_first() {
    let cache: Cache<i32> = Cache::new(config(3)).unwrap();
    for i in 1..=6 {
        cache.write(&format!("k{i}"), i);
    }

    // The resident set is the last `capacity` keys inserted.
    assert_eq!(cache.read("k1"), None);
    assert_eq!(cache.read("k2"), None);
    assert_eq!(cache.read("k3"), None);
    assert_eq!(cache.read("k4"), Some(4));
    assert_eq!(cache.read("k5"), Some(5));
    assert_eq!(cache.read("k6"), Some(6));
    cache.dispose();
}

#[test]
fn evicted_key_is_never_retrievable() {
    let cache: Cache<i32> = Cache::new(config(2)).unwrap();
    cache.write("a", 1);
    cache.write("b", 2);
    cache.write("c", 3);

    assert_eq!(cache.size(), 2);
    assert_eq!(cache.read("a"), None);
    assert_eq!(cache.read("b"), Some(2));
    assert_eq!(cache.read("c"), Some(3));
    cache.dispose();
}

#[test]
fn fifo_read_does_not_refresh_position() {
    let cache: Cache<i32> = Cache::new(config(2)).unwrap();
    cache.write("k1", 1);
    cache.write("k2", 2);

    // A hit does not protect k1 under FIFO.
    assert_eq!(cache.read("k1"), Some(1));
    cache.write("k3", 3);

    assert_eq!(cache.read("k1"), None);
    assert_eq!(cache.read("k2"), Some(2));
    assert_eq!(cache.read("k3"), Some(3));
    cache.dispose();
}

#[test]
fn remove_deletes_and_returns_value() {
    let cache: Cache<i32> = Cache::new(config(10)).unwrap();
    cache.write("k1", 1);
    cache.write("k2", 2);

    assert_eq!(cache.remove("k1"), Some(1));
    assert_eq!(cache.size(), 1);
    assert_eq!(cache.read("k1"), None);
    assert_eq!(cache.remove("missing"), None);
    cache.dispose();
}

#[test]
fn clear_empties_the_cache() {
    let cache: Cache<i32> = Cache::new(config(10)).unwrap();
    for i in 0..5 {
        cache.write(&format!("k{i}"), i);
    }

    cache.clear();
    assert_eq!(cache.size(), 0);
    for i in 0..5 {
        assert_eq!(cache.read(&format!("k{i}")), None);
    }

    // Cache stays usable after a clear.
    cache.write("fresh", 42);
    assert_eq!(cache.read("fresh"), Some(42));
    cache.dispose();
}

#[test]
fn repeated_clear_is_safe() {
    let cache: Cache<i32> = Cache::new(config(10)).unwrap();
    cache.write("k1", 1);
    cache.clear();
    cache.clear();
    assert_eq!(cache.size(), 0);
    cache.dispose();
}

#[test]
fn dispose_makes_every_operation_a_noop() {
    let cache: Cache<i32> = Cache::new(config(10)).unwrap();
    cache.write("k1", 1);
    cache.dispose();

    assert!(cache.is_disposed());
    assert_eq!(cache.size(), 0);

    cache.write("k2", 2);
    assert_eq!(cache.size(), 0);
    assert_eq!(cache.read("k2"), None);
    assert_eq!(cache.remove("k1"), None);
    cache.clear();
    assert!(cache.is_disposed());

    // Second dispose is a no-op, not an error.
    cache.dispose();
}

#[test]
fn stats_track_hits_and_misses() {
    let cache: Cache<i32> = Cache::new(config(10)).unwrap();
    cache.write("k1", 1);
    cache.write("k2", 2);

    let _ = cache.read("k1"); // hit
    let _ = cache.read("k2"); // hit
    let _ = cache.read("k3"); // miss

    let stats = cache.stats();
    assert_eq!(stats.hits(), 2);
    assert_eq!(stats.misses(), 1);
    assert_eq!(stats.total_accesses(), 3);
    assert!((stats.hit_rate() - 0.6666).abs() < 0.001);
    cache.dispose();
}

#[test]
fn unbounded_cache_never_evicts() {
    let cache: Cache<i32> = Cache::new(CacheConfig::default()).unwrap();
    for i in 0..100 {
        cache.write(&format!("k{i}"), i);
    }
    assert_eq!(cache.size(), 100);
    assert_eq!(cache.stats().evictions(), 0);
    for i in 0..100 {
        assert_eq!(cache.read(&format!("k{i}")), Some(i));
    }
    cache.dispose();
}
