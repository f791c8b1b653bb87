//! Least Recently Used (LRU) Cache Implementation
//!
//! An LRU cache evicts the entry that has not been accessed for the longest
//! time when capacity is reached. This implementation provides O(1) time
//! complexity for all operations using a hash map combined with an intrusive
//! doubly-linked list.
//!
//! # How the Algorithm Works
//!
//! The LRU algorithm is based on the principle of **temporal locality**:
//! entries accessed recently are likely to be accessed again soon. The cache
//! keeps entries ordered by their last access time.
//!
//! ## Data Structure
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────────┐
//! │                        LruCache                                │
//! │                                                                │
//! │  HashMap<K, *Node>          Doubly-Linked List                 │
//! │  ┌──────────────┐          ┌─────────────────────────────┐     │
//! │  │ "apple" ──────────────▶ │ MRU ◀──▶ ... ◀──▶ LRU      │     │
//! │  │ "banana" ─────────────▶ │  ▲                   │      │     │
//! │  │ "cherry" ─────────────▶ │ front              back     │     │
//! │  └──────────────┘          └─────────────────────────────┘     │
//! └────────────────────────────────────────────────────────────────┘
//! ```
//!
//! - **HashMap**: O(1) key lookup, storing stable pointers to list nodes
//! - **Doubly-linked list**: access order; most recent at the front, victim
//!   at the back
//!
//! ## Eviction Example
//!
//! ```text
//! Cache capacity: 3
//!
//! set("a", 1)  →  [a]
//! set("b", 2)  →  [b, a]
//! set("c", 3)  →  [c, b, a]
//! get("a")     →  [a, c, b]       // "a" moved to front (MRU)
//! set("d", 4)  →  [d, a, c]       // "b" evicted (was LRU)
//! ```
//!
//! When the cache is full, an insertion reclaims the victim's list node in
//! place: the node's key and value are overwritten and the node is moved to
//! the front, so a full cache performs no list allocation per insert.
//!
//! # Thread Safety
//!
//! [`LruCache`] owns a single internal mutex; every operation — including
//! `get`, which reorders the list — holds it for its full duration. The
//! cache is `Send + Sync` and is shared via `Arc`.
//!
//! # Example
//!
//! ```
//! use bounded_cache::LruCache;
//! use std::num::NonZeroUsize;
//!
//! let cache = LruCache::new(NonZeroUsize::new(2).unwrap());
//! cache.set("a", 1).unwrap();
//! cache.set("b", 2).unwrap();
//! let _ = cache.get(&"a").unwrap(); // "a" becomes most recently used
//! cache.set("c", 3).unwrap();    // "b" evicted (least recently used)
//! assert_eq!(cache.get(&"b").unwrap(), None);
//! ```

use crate::cache::{Cache, CacheError, EvictionHook};
use crate::config::LruCacheConfig;
use crate::list::{List, ListEntry};
use core::borrow::Borrow;
use core::hash::{BuildHasher, Hash};
use core::mem;
use core::num::NonZeroUsize;
use parking_lot::Mutex;

#[cfg(feature = "hashbrown")]
use hashbrown::DefaultHashBuilder;
#[cfg(feature = "hashbrown")]
use hashbrown::HashMap;

#[cfg(not(feature = "hashbrown"))]
use std::collections::hash_map::RandomState as DefaultHashBuilder;
#[cfg(not(feature = "hashbrown"))]
use std::collections::HashMap;

/// A recency-list cell: one resident key-value pair.
struct LruEntry<K, V> {
    key: K,
    value: V,
}

/// Internal LRU segment containing the actual cache algorithm.
///
/// All algorithm logic lives here behind `&mut self`; [`LruCache`] adds the
/// per-cache mutex on top.
///
/// # Safety
///
/// This struct contains raw pointers in the `map` field. These pointers are
/// always valid as long as:
/// - The pointer was obtained from `list.push_front`
/// - The node has not been detached from the list
/// - The segment has not been dropped
pub(crate) struct LruSegment<K, V, S = DefaultHashBuilder> {
    /// Maximum number of entries; fixed at construction.
    capacity: NonZeroUsize,
    /// Recency order: front = most recently used, back = eviction victim.
    list: List<LruEntry<K, V>>,
    /// Key index into the recency list.
    map: HashMap<K, *mut ListEntry<LruEntry<K, V>>, S>,
    /// Callback observing every eviction and delete.
    hook: Option<EvictionHook<K, V>>,
}

// SAFETY: LruSegment owns all data and its raw pointers reference only nodes
// owned by `list`. All mutation requires `&mut self`, so sending the segment
// to another thread is safe when its contents are.
unsafe impl<K: Send, V: Send, S: Send> Send for LruSegment<K, V, S> {}

impl<K: Hash + Eq, V, S: BuildHasher> LruSegment<K, V, S> {
    fn with_hasher(config: LruCacheConfig, hasher: S) -> Self {
        let map_capacity = config.capacity.get().next_power_of_two();
        LruSegment {
            capacity: config.capacity,
            list: List::new(),
            map: HashMap::with_capacity_and_hasher(map_capacity, hasher),
            hook: None,
        }
    }

    #[inline]
    fn len(&self) -> usize {
        self.map.len()
    }

    /// Runs the eviction hook, if one is installed, on a removed pair.
    ///
    /// Callers must have already unlinked the entry from both the map and
    /// the list: the hook observes the pair only after the removal is
    /// complete.
    fn fire_hook(&mut self, key: K, value: V) {
        if let Some(hook) = self.hook.as_mut() {
            hook(key, value);
        }
    }

    fn set(&mut self, key: K, value: V)
    where
        K: Clone,
    {
        if let Some(&node) = self.map.get(&key) {
            // Resident key: replace the value in place and count the write
            // as a touch.
            // SAFETY: node comes from our map, so it is a live entry of `list`.
            unsafe {
                (*node).get_value_mut().value = value;
                self.list.move_to_front(node);
            }
            return;
        }

        if self.map.len() >= self.capacity.get() {
            // At capacity: reclaim the least recently used cell in place
            // instead of allocating a fresh node.
            let node = self
                .list
                .back()
                .expect("a cache at capacity has a resident entry");
            // SAFETY: back() returned a live entry of `list`.
            unsafe {
                let (old_key, old_value) = {
                    let entry = (*node).get_value_mut();
                    (
                        mem::replace(&mut entry.key, key.clone()),
                        mem::replace(&mut entry.value, value),
                    )
                };
                self.list.move_to_front(node);
                self.map.remove(&old_key);
                self.map.insert(key, node);
                self.fire_hook(old_key, old_value);
            }
            return;
        }

        let node = self.list.push_front(LruEntry {
            key: key.clone(),
            value,
        });
        self.map.insert(key, node);
    }

    fn get<Q>(&mut self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        let node = self.map.get(key).copied()?;
        // SAFETY: node comes from our map, so it is a live entry of `list`.
        unsafe {
            self.list.move_to_front(node);
            Some(&(*node).get_value().value)
        }
    }

    fn delete<Q>(&mut self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        let Some(node) = self.map.remove(key) else {
            return false;
        };
        // SAFETY: node comes from our map, so it is a live entry of `list`.
        let entry = unsafe { self.list.detach(node).into_value() };
        self.fire_hook(entry.key, entry.value);
        true
    }

    fn contains<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.map.contains_key(key)
    }

    fn keys(&self) -> Vec<K>
    where
        K: Clone,
    {
        self.map.keys().cloned().collect()
    }

    fn clear(&mut self) {
        self.map.clear();
        self.list.clear();
    }

    #[cfg(test)]
    fn check_invariants(&self) {
        assert!(self.map.len() <= self.capacity.get());
        assert_eq!(self.map.len(), self.list.len());
        for &node in self.map.values() {
            // SAFETY: map pointers reference live entries of `list`.
            let entry = unsafe { (*node).get_value() };
            assert!(self.map.contains_key(&entry.key));
        }
    }
}

impl<K, V, S> core::fmt::Debug for LruSegment<K, V, S> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("LruSegment")
            .field("capacity", &self.capacity)
            .field("len", &self.map.len())
            .finish()
    }
}

/// A Least Recently Used (LRU) cache with O(1) operations.
///
/// Maintains entries in order of access recency. When capacity is reached,
/// the least recently accessed entry is evicted to make room for new ones,
/// reusing the victim's cell in place.
///
/// # Type Parameters
///
/// - `K`: Key type. Must implement `Hash + Eq`; mutation also needs `Clone`
///   because the key is stored in both the index and the cell.
/// - `V`: Value type. Must implement `Clone` for retrieval, since values are
///   handed out across the lock boundary.
/// - `S`: Hash builder type. Defaults to `DefaultHashBuilder`.
///
/// # Example
///
/// ```
/// use bounded_cache::LruCache;
/// use std::num::NonZeroUsize;
///
/// let cache = LruCache::new(NonZeroUsize::new(2).unwrap());
///
/// cache.set("apple", 1).unwrap();
/// cache.set("banana", 2).unwrap();
/// assert_eq!(cache.get(&"apple").unwrap(), Some(1));
///
/// // "banana" is now LRU, so it gets evicted
/// cache.set("cherry", 3).unwrap();
/// assert_eq!(cache.get(&"banana").unwrap(), None);
/// ```
pub struct LruCache<K, V, S = DefaultHashBuilder> {
    segment: Mutex<LruSegment<K, V, S>>,
}

impl<K: Hash + Eq, V> LruCache<K, V> {
    /// Creates a new LRU cache holding at most `capacity` entries.
    pub fn new(capacity: NonZeroUsize) -> LruCache<K, V> {
        Self::init(LruCacheConfig::new(capacity))
    }

    /// Creates a new LRU cache from a configuration.
    pub fn init(config: LruCacheConfig) -> LruCache<K, V> {
        Self::with_hasher(config, DefaultHashBuilder::default())
    }
}

impl<K: Hash + Eq, V, S: BuildHasher> LruCache<K, V, S> {
    /// Creates a new LRU cache from a configuration and a custom hasher.
    pub fn with_hasher(config: LruCacheConfig, hasher: S) -> Self {
        LruCache {
            segment: Mutex::new(LruSegment::with_hasher(config, hasher)),
        }
    }

    /// Returns the maximum number of entries the cache can hold.
    #[inline]
    pub fn capacity(&self) -> NonZeroUsize {
        self.segment.lock().capacity
    }

    /// Returns the current number of entries in the cache.
    #[inline]
    pub fn len(&self) -> usize {
        self.segment.lock().len()
    }

    /// Returns `true` if the cache contains no entries.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns the value stored under the given key, or `None` if absent.
    ///
    /// A hit moves the entry to the most-recently-used position. A miss is
    /// not an error and does not alter the cache.
    ///
    /// The key may be any borrowed form of the cache's key type, but
    /// [`Hash`] and [`Eq`] on the borrowed form *must* match those for the
    /// key type.
    pub fn get<Q>(&self, key: &Q) -> Result<Option<V>, CacheError>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
        V: Clone,
    {
        Ok(self.segment.lock().get(key).cloned())
    }

    /// Inserts a key-value pair into the cache.
    ///
    /// If the key is already resident, its value is replaced and the entry
    /// moves to the most-recently-used position; the eviction hook does not
    /// fire. If the key is new and the cache is full, the least recently
    /// used entry is evicted first (firing the hook) and its cell is reused
    /// for the new pair.
    pub fn set(&self, key: K, value: V) -> Result<(), CacheError>
    where
        K: Clone,
    {
        self.segment.lock().set(key, value);
        Ok(())
    }

    /// Removes the entry stored under the given key.
    ///
    /// Returns `true` and fires the eviction hook if the key was resident;
    /// returns `false` without side effects otherwise.
    pub fn delete<Q>(&self, key: &Q) -> Result<bool, CacheError>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        Ok(self.segment.lock().delete(key))
    }

    /// Returns `true` if the key is resident, without counting a touch.
    pub fn contains<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.segment.lock().contains(key)
    }

    /// Installs, replaces, or clears (`None`) the eviction hook.
    ///
    /// The hook observes every evicted or deleted `(key, value)` pair,
    /// exactly once per removal, inside the cache's critical section.
    pub fn set_eviction_hook(&self, hook: Option<EvictionHook<K, V>>) {
        self.segment.lock().hook = hook;
    }

    /// Returns an unordered snapshot of the currently resident keys.
    pub fn keys(&self) -> Vec<K>
    where
        K: Clone,
    {
        self.segment.lock().keys()
    }

    /// Removes all entries from the cache without firing the eviction hook.
    pub fn clear(&self) {
        self.segment.lock().clear();
    }
}

impl<K, V, S> Cache<K, V> for LruCache<K, V, S>
where
    K: Hash + Eq + Clone,
    V: Clone,
    S: BuildHasher,
{
    fn set(&self, key: K, value: V) -> Result<(), CacheError> {
        LruCache::set(self, key, value)
    }

    fn get(&self, key: &K) -> Result<Option<V>, CacheError> {
        LruCache::get(self, key)
    }

    fn delete(&self, key: &K) -> Result<bool, CacheError> {
        LruCache::delete(self, key)
    }

    fn set_eviction_hook(&self, hook: Option<EvictionHook<K, V>>) {
        LruCache::set_eviction_hook(self, hook);
    }

    fn keys(&self) -> Vec<K> {
        LruCache::keys(self)
    }

    fn len(&self) -> usize {
        LruCache::len(self)
    }
}

impl<K: Hash + Eq, V, S: BuildHasher> core::fmt::Debug for LruCache<K, V, S> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let segment = self.segment.lock();
        f.debug_struct("LruCache")
            .field("capacity", &segment.capacity)
            .field("len", &segment.len())
            .finish()
    }
}
