//! Correctness Tests for Cache Eviction Policies
//!
//! This module validates the fundamental correctness of each eviction policy
//! using simple, predictable access patterns. Each test explicitly validates
//! which specific key gets evicted when a set causes an eviction.
//!
//! ## Test Strategy
//! - Small cache sizes (1-3 entries) for predictable behavior
//! - Simple, deterministic access patterns
//! - Each test validates the core eviction policy of the engine
//! - Eviction hooks double as eviction observers

use bounded_cache::{Cache, LfuCache, LruCache};
use std::num::NonZeroUsize;
use std::sync::{Arc, Mutex};

/// Helper to create an LruCache with the given capacity.
fn make_lru<K: std::hash::Hash + Eq + Clone, V: Clone>(cap: usize) -> LruCache<K, V> {
    LruCache::new(NonZeroUsize::new(cap).unwrap())
}

/// Helper to create an LfuCache with the given capacity.
fn make_lfu<K: std::hash::Hash + Eq + Clone, V: Clone>(cap: usize) -> LfuCache<K, V> {
    LfuCache::new(NonZeroUsize::new(cap).unwrap())
}

/// Installs a hook that records every removed pair in order.
fn record_removals<C: Cache<&'static str, &'static str> + ?Sized>(
    cache: &C,
) -> Arc<Mutex<Vec<(&'static str, &'static str)>>> {
    let log = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&log);
    cache.set_eviction_hook(Some(Box::new(move |key, value| {
        sink.lock().unwrap().push((key, value));
    })));
    log
}

// ============================================================================
// SHARED CONTRACT
// ============================================================================

fn basic_contract(cache: &dyn Cache<&'static str, &'static str>) {
    // Round trip.
    cache.set("key", "value").unwrap();
    assert_eq!(cache.get(&"key").unwrap(), Some("value"));

    // Replacement.
    cache.set("key", "value2").unwrap();
    assert_eq!(cache.get(&"key").unwrap(), Some("value2"));

    // Absence is a result, not an error.
    assert_eq!(cache.get(&"missing").unwrap(), None);

    // Delete, then the key reads as absent; a second delete is a no-op.
    assert!(cache.delete(&"key").unwrap());
    assert_eq!(cache.get(&"key").unwrap(), None);
    assert!(!cache.delete(&"key").unwrap());

    assert!(cache.is_empty());
}

#[test]
fn test_basic_contract_lru() {
    basic_contract(&make_lru(2));
}

#[test]
fn test_basic_contract_lfu() {
    basic_contract(&make_lfu(2));
}

#[test]
fn test_polymorphic_use_through_trait_objects() {
    let caches: Vec<Box<dyn Cache<String, u64>>> = vec![
        Box::new(make_lru(4)),
        Box::new(make_lfu(4)),
    ];

    for cache in &caches {
        for i in 0..8u64 {
            cache.set(format!("key{i}"), i).unwrap();
        }
        assert_eq!(cache.len(), 4);

        let mut keys = cache.keys();
        keys.sort_unstable();
        assert_eq!(keys.len(), 4);
        keys.dedup();
        assert_eq!(keys.len(), 4, "keys snapshot must not contain duplicates");
    }
}

// ============================================================================
// LRU EVICTION POLICY
// ============================================================================

#[test]
fn test_lru_evicts_least_recently_used() {
    let cache = make_lru(2);
    cache.set("key1", "v1").unwrap();
    cache.set("key2", "v2").unwrap();
    cache.set("key3", "v3").unwrap();

    assert_eq!(cache.get(&"key1").unwrap(), None);
    assert_eq!(cache.get(&"key2").unwrap(), Some("v2"));
    assert_eq!(cache.get(&"key3").unwrap(), Some("v3"));
    assert_eq!(cache.len(), 2);
}

#[test]
fn test_lru_get_refreshes_recency() {
    let cache = make_lru(2);
    cache.set("key1", "v1").unwrap();
    cache.set("key2", "v2").unwrap();

    // Touch key1, making key2 the victim.
    assert_eq!(cache.get(&"key1").unwrap(), Some("v1"));
    cache.set("key3", "v3").unwrap();

    assert_eq!(cache.get(&"key2").unwrap(), None);
    assert_eq!(cache.get(&"key1").unwrap(), Some("v1"));
    assert_eq!(cache.get(&"key3").unwrap(), Some("v3"));
}

#[test]
fn test_lru_set_refreshes_recency() {
    let cache = make_lru(2);
    cache.set("key1", "v1").unwrap();
    cache.set("key2", "v2").unwrap();

    // Rewriting key1 is also a touch.
    cache.set("key1", "v1b").unwrap();
    cache.set("key3", "v3").unwrap();

    assert_eq!(cache.get(&"key2").unwrap(), None);
    assert_eq!(cache.get(&"key1").unwrap(), Some("v1b"));
}

#[test]
fn test_lru_eviction_hook_called_once() {
    let cache = make_lru(2);
    let log = record_removals(&cache);

    cache.set("k1", "v1").unwrap();
    cache.set("k2", "v2").unwrap();
    cache.set("k3", "v3").unwrap();

    assert_eq!(*log.lock().unwrap(), vec![("k1", "v1")]);
}

#[test]
fn test_lru_single_entry_cache_evicts_on_any_new_key() {
    let cache = make_lru(1);
    let log = record_removals(&cache);

    cache.set("a", "1").unwrap();
    cache.set("b", "2").unwrap();

    assert_eq!(cache.get(&"a").unwrap(), None);
    assert_eq!(cache.get(&"b").unwrap(), Some("2"));
    assert_eq!(*log.lock().unwrap(), vec![("a", "1")]);
}

// ============================================================================
// LFU EVICTION POLICY
// ============================================================================

#[test]
fn test_lfu_frequency_beats_recency() {
    let cache = make_lfu(2);
    cache.set("key1", "v1").unwrap();
    cache.set("key2", "v2").unwrap();
    cache.set("key3", "v3").unwrap();

    // All were at count 1; the oldest (key1) lost.
    assert_eq!(cache.get(&"key2").unwrap(), Some("v2")); // key2 → count 2
    cache.set("key4", "v4").unwrap(); // evicts key3, the remaining count-1 entry

    assert_eq!(cache.get(&"key1").unwrap(), None);
    assert_eq!(cache.get(&"key3").unwrap(), None);
    assert_eq!(cache.get(&"key2").unwrap(), Some("v2"));
    assert_eq!(cache.get(&"key4").unwrap(), Some("v4"));
}

#[test]
fn test_lfu_replacement_counts_as_touch() {
    let cache = make_lfu(2);
    cache.set("a", 1).unwrap();
    cache.set("b", 2).unwrap();
    cache.set("a", 10).unwrap(); // "a" → count 2
    cache.set("c", 3).unwrap(); // evicts "b" (count 1), not "a"

    assert_eq!(cache.get(&"b").unwrap(), None);
    assert_eq!(cache.get(&"a").unwrap(), Some(10));
    assert_eq!(cache.get(&"c").unwrap(), Some(3));
}

#[test]
fn test_lfu_fresh_inserts_are_first_victims() {
    let cache = make_lfu(3);
    cache.set("a", 1).unwrap();
    cache.set("b", 2).unwrap();
    let _ = cache.get(&"a").unwrap();
    let _ = cache.get(&"b").unwrap();

    // "c" enters at count 1 and, unread, is the next victim.
    cache.set("c", 3).unwrap();
    cache.set("d", 4).unwrap();

    assert_eq!(cache.get(&"c").unwrap(), None);
    assert_eq!(cache.get(&"a").unwrap(), Some(1));
    assert_eq!(cache.get(&"b").unwrap(), Some(2));
    assert_eq!(cache.get(&"d").unwrap(), Some(4));
}

#[test]
fn test_lfu_hook_fires_on_delete_only_once() {
    let cache = make_lfu(2);
    let log = record_removals(&cache);

    cache.set("k", "v").unwrap();
    assert!(cache.delete(&"k").unwrap());
    assert_eq!(*log.lock().unwrap(), vec![("k", "v")]);

    assert!(!cache.delete(&"k").unwrap());
    assert_eq!(log.lock().unwrap().len(), 1);
}

#[test]
fn test_lfu_hook_sees_final_value() {
    let cache = make_lfu(1);
    let log = record_removals(&cache);

    cache.set("k", "first").unwrap();
    cache.set("k", "second").unwrap(); // replacement: no hook
    cache.set("other", "x").unwrap(); // evicts "k" with its final value

    assert_eq!(*log.lock().unwrap(), vec![("k", "second")]);
}

// ============================================================================
// HOOK LIFECYCLE
// ============================================================================

#[test]
fn test_hook_can_be_replaced_and_cleared() {
    let cache: LruCache<&str, &str> = make_lru(1);
    let log = record_removals(&cache);

    cache.set("a", "1").unwrap();
    cache.set("b", "2").unwrap(); // evicts "a" through the first hook
    assert_eq!(log.lock().unwrap().len(), 1);

    // A replaced hook takes over from the next removal on.
    let second = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&second);
    cache.set_eviction_hook(Some(Box::new(move |key, value| {
        sink.lock().unwrap().push((key, value));
    })));
    cache.set("c", "3").unwrap(); // evicts "b"
    assert_eq!(log.lock().unwrap().len(), 1);
    assert_eq!(*second.lock().unwrap(), vec![("b", "2")]);

    // A cleared hook silences removals entirely.
    cache.set_eviction_hook(None);
    cache.set("d", "4").unwrap(); // evicts "c"
    assert_eq!(log.lock().unwrap().len(), 1);
    assert_eq!(second.lock().unwrap().len(), 1);
}

#[test]
fn test_hook_not_fired_by_absent_delete() {
    for cache in [
        Box::new(make_lru(2)) as Box<dyn Cache<&'static str, &'static str>>,
        Box::new(make_lfu(2)),
    ] {
        let log = record_removals(cache.as_ref());
        assert!(!cache.delete(&"ghost").unwrap());
        assert!(log.lock().unwrap().is_empty());
    }
}

// ============================================================================
// CAPACITY INVARIANT
// ============================================================================

#[test]
fn test_size_never_exceeds_capacity() {
    let lru: LruCache<u32, u32> = make_lru(5);
    let lfu: LfuCache<u32, u32> = make_lfu(5);

    for i in 0..100u32 {
        lru.set(i % 17, i).unwrap();
        lfu.set(i % 17, i).unwrap();
        let _ = lru.get(&(i % 11)).unwrap();
        let _ = lfu.get(&(i % 11)).unwrap();
        assert!(lru.len() <= 5);
        assert!(lfu.len() <= 5);
    }
}
