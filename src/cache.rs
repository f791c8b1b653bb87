//! The uniform contract shared by both eviction engines.
//!
//! [`LruCache`](crate::LruCache) and [`LfuCache`](crate::LfuCache) differ
//! only in which entry they pick as the eviction victim; everything a caller
//! interacts with — insertion, lookup, deletion, the eviction hook, key
//! snapshots — is identical. The [`Cache`] trait captures that shared
//! surface so a policy can be selected at runtime behind `Box<dyn Cache<K, V>>`.
//!
//! # Error channel
//!
//! No operation fails under normal use: a missing key is an explicit
//! `Ok(None)` / `Ok(false)` outcome, never an error. The `Result` in each
//! signature exists for forward compatibility (a future variant might
//! validate keys or enforce value invariants), and [`CacheError`] therefore
//! has no variants today. Callers should propagate it with `?` and will keep
//! working unchanged if variants appear later.

use thiserror::Error;

/// Callback observing every entry removed from a cache.
///
/// The hook receives the final owned `(key, value)` pair, exactly once per
/// involuntary eviction or explicit delete. It is not invoked for value
/// replacements, nor when the cache is cleared or dropped.
///
/// The hook runs inside the cache's critical section. Expensive work should
/// be deferred (for example by queueing the pair for another worker), and
/// calling back into the same cache from the hook deadlocks.
pub type EvictionHook<K, V> = Box<dyn FnMut(K, V) + Send>;

/// Error type for cache operations.
///
/// Currently uninhabited: no operation can fail, and a value of this type
/// cannot be constructed. The type is `#[non_exhaustive]` so variants can be
/// added without breaking callers that already treat operations as fallible.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum CacheError {}

/// A bounded-capacity key/value cache with an eviction policy.
///
/// Both engines implement this trait with identical observable behavior for
/// everything except victim selection. All methods take `&self`: each cache
/// owns an internal lock and may be shared across threads via `Arc`.
///
/// # Example
///
/// ```
/// use bounded_cache::{Cache, LfuCache, LruCache};
/// use std::num::NonZeroUsize;
///
/// fn warm(cache: &dyn Cache<&'static str, u32>) {
///     cache.set("one", 1).unwrap();
///     cache.set("two", 2).unwrap();
/// }
///
/// let cap = NonZeroUsize::new(8).unwrap();
/// let lru = LruCache::new(cap);
/// let lfu = LfuCache::new(cap);
/// warm(&lru);
/// warm(&lfu);
/// assert_eq!(lru.get(&"one").unwrap(), Some(1));
/// assert_eq!(lfu.get(&"one").unwrap(), Some(1));
/// ```
pub trait Cache<K, V> {
    /// Inserts `value` under `key`.
    ///
    /// If the key is already resident its value is replaced in place and the
    /// entry counts as touched; no hook fires. If the key is new and the
    /// cache is at capacity, one victim is evicted first (firing the hook).
    fn set(&self, key: K, value: V) -> Result<(), CacheError>;

    /// Returns the value stored under `key`, or `None` if the key is absent.
    ///
    /// A hit counts as a touch: it refreshes recency (LRU) or increments the
    /// access count (LFU). A miss is not an error and leaves the cache
    /// untouched.
    fn get(&self, key: &K) -> Result<Option<V>, CacheError>;

    /// Removes the entry stored under `key`.
    ///
    /// Returns `true` and fires the eviction hook if the key was resident;
    /// returns `false` without side effects otherwise.
    fn delete(&self, key: &K) -> Result<bool, CacheError>;

    /// Installs, replaces, or clears (`None`) the eviction hook.
    fn set_eviction_hook(&self, hook: Option<EvictionHook<K, V>>);

    /// Returns an unordered snapshot of the currently resident keys.
    fn keys(&self) -> Vec<K>;

    /// Returns the current number of resident entries.
    fn len(&self) -> usize;

    /// Returns `true` if the cache holds no entries.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
