//! Least Frequently Used (LFU) Cache Implementation
//!
//! An LFU cache evicts the entry with the lowest access count when capacity
//! is reached, preferring the least recently touched entry among those tied
//! at that count. This implementation provides O(1) time complexity for all
//! operations using a hash map combined with a list of frequency buckets,
//! each holding its own recency list.
//!
//! # How the Algorithm Works
//!
//! LFU is based on the principle that entries accessed often in the past are
//! likely to be accessed again. Unlike LRU, which considers only recency,
//! LFU ranks entries by their total number of touches.
//!
//! ## Data Structure
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                           LfuCache                              │
//! │                                                                 │
//! │  HashMap<K, *Node>     Bucket list (strictly ascending count)   │
//! │  ┌──────────────┐     ┌───────────────────────────────────┐     │
//! │  │ "cold" ───────────▶│ count=1: [cold] ◀──▶ [new] ◀ victim     │
//! │  │ "warm" ───────────▶│ count=4: [warm]                   │     │
//! │  │ "hot" ────────────▶│ count=9: [hot]                    │     │
//! │  └──────────────┘     └───────────────────────────────────┘     │
//! └─────────────────────────────────────────────────────────────────┘
//! ```
//!
//! - **HashMap**: O(1) key lookup, storing stable pointers to item nodes
//! - **Outer bucket list**: one bucket per distinct access count, in
//!   strictly ascending order
//! - **Inner item lists**: entries sharing a count, most recently promoted
//!   at the front; the eviction victim is the back of the lowest non-empty
//!   bucket
//!
//! Every item carries a back-pointer to the outer node of its bucket, so a
//! touch relinks the item into the neighbouring bucket without any search.
//!
//! ## The count-1 sentinel bucket
//!
//! An empty cache still holds exactly one bucket, with `count = 1` and no
//! items. This bucket is never pruned; it is the landing pad for new
//! insertions. Every other bucket is pruned the moment it empties, which
//! bounds the eviction walk: the sentinel may be empty, but the bucket after
//! it cannot be, so at most two buckets are inspected.
//!
//! ## Access Pattern Example
//!
//! ```text
//! Cache capacity: 3
//!
//! set("a", 1)  →  count_1: [a]
//! set("b", 2)  →  count_1: [b, a]
//! set("c", 3)  →  count_1: [c, b, a]
//! get("a")     →  count_1: [c, b], count_2: [a]
//! get("a")     →  count_1: [c, b], count_3: [a]
//! set("d", 4)  →  count_1: [d, c], count_3: [a]   // "b" evicted
//! ```
//!
//! A touch of the only item of a non-sentinel bucket takes a shortcut: the
//! bucket's count is incremented in place instead of allocating a successor
//! bucket. The bucket would otherwise be pruned, and by the ordering and
//! non-emptiness invariants no bucket with the next count can already exist,
//! so the shortcut is unobservable.
//!
//! # Thread Safety
//!
//! [`LfuCache`] owns a single internal mutex; every operation — including
//! `get`, which promotes the entry — holds it for its full duration. The
//! cache is `Send + Sync` and is shared via `Arc`.
//!
//! # Example
//!
//! ```
//! use bounded_cache::LfuCache;
//! use std::num::NonZeroUsize;
//!
//! let cache = LfuCache::new(NonZeroUsize::new(2).unwrap());
//! cache.set("rare", 1).unwrap();
//! cache.set("popular", 2).unwrap();
//!
//! // Raise the access count of "popular".
//! for _ in 0..10 {
//!     let _ = cache.get(&"popular").unwrap();
//! }
//!
//! cache.set("new", 3).unwrap(); // "rare" evicted (lowest count)
//! assert_eq!(cache.get(&"popular").unwrap(), Some(2));
//! ```

use crate::cache::{Cache, CacheError, EvictionHook};
use crate::config::LfuCacheConfig;
use crate::list::{List, ListEntry};
use core::borrow::Borrow;
use core::hash::{BuildHasher, Hash};
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

/// A frequency bucket: every resident item with exactly `count` touches.
struct LfuBucket<K, V> {
    /// The access count shared by all items in this bucket.
    count: u64,
    /// Items at this count, most recently promoted at the front.
    items: List<LfuItem<K, V>>,
}

impl<K, V> LfuBucket<K, V> {
    fn new(count: u64) -> Self {
        LfuBucket {
            count,
            items: List::new(),
        }
    }
}

/// One resident key-value pair plus the back-reference to its bucket.
struct LfuItem<K, V> {
    key: K,
    value: V,
    /// Outer-list node of the bucket currently holding this item.
    /// Non-owning; maintained on every promotion.
    bucket: *mut ListEntry<LfuBucket<K, V>>,
}

/// Internal LFU segment containing the actual cache algorithm.
///
/// All algorithm logic lives here behind `&mut self`; [`LfuCache`] adds the
/// per-cache mutex on top.
///
/// # Safety
///
/// This struct contains raw pointers in the `map` field and in each item's
/// `bucket` back-reference. These pointers are always valid as long as:
/// - Item pointers were obtained from an inner list's `push_front`
/// - Bucket pointers were obtained from `buckets.push_front` or
///   `buckets.insert_after` and the bucket has not been pruned
/// - The segment has not been dropped
pub(crate) struct LfuSegment<K, V, S = DefaultHashBuilder> {
    /// Maximum number of entries; fixed at construction.
    capacity: NonZeroUsize,
    /// Key index into the inner item lists.
    map: HashMap<K, *mut ListEntry<LfuItem<K, V>>, S>,
    /// Frequency buckets in strictly ascending count order.
    buckets: List<LfuBucket<K, V>>,
    /// The permanent `count = 1` bucket at the front of `buckets`.
    sentinel: *mut ListEntry<LfuBucket<K, V>>,
    /// Callback observing every eviction and delete.
    hook: Option<EvictionHook<K, V>>,
}

// SAFETY: LfuSegment owns all data and its raw pointers reference only nodes
// owned by `buckets` or by the inner lists inside it. All mutation requires
// `&mut self`, so sending the segment to another thread is safe when its
// contents are.
unsafe impl<K: Send, V: Send, S: Send> Send for LfuSegment<K, V, S> {}

impl<K: Hash + Eq, V, S: BuildHasher> LfuSegment<K, V, S> {
    fn with_hasher(config: LfuCacheConfig, hasher: S) -> Self {
        let map_capacity = config.capacity.get().next_power_of_two();
        let mut buckets = List::new();
        let sentinel = buckets.push_front(LfuBucket::new(1));
        LfuSegment {
            capacity: config.capacity,
            map: HashMap::with_capacity_and_hasher(map_capacity, hasher),
            buckets,
            sentinel,
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
    /// its bucket: the hook observes the pair only after the removal is
    /// complete.
    fn fire_hook(&mut self, key: K, value: V) {
        if let Some(hook) = self.hook.as_mut() {
            hook(key, value);
        }
    }

    /// Prunes `bucket_node` if it just became empty, unless it is the
    /// `count = 1` sentinel.
    ///
    /// # Safety
    ///
    /// The caller must ensure `bucket_node` is a live node of `buckets`.
    unsafe fn prune_if_empty(&mut self, bucket_node: *mut ListEntry<LfuBucket<K, V>>) {
        // SAFETY: forwarded caller contract; detach consumes the node, which
        // no item references any more because its item list is empty.
        unsafe {
            if bucket_node != self.sentinel && (*bucket_node).get_value().items.is_empty() {
                drop(self.buckets.detach(bucket_node).into_value());
            }
        }
    }

    /// Moves an item to the bucket for the next-higher count and returns the
    /// item's current node pointer.
    ///
    /// This is the touch operation: a hit on `get` and a value replacement
    /// on `set` both land here, once each. The node keeps its address across
    /// the relink, but the returned pointer carries fresh provenance from
    /// the detach/attach round trip; the map entry is refreshed with it, and
    /// callers must use it instead of their stale handle.
    ///
    /// # Safety
    ///
    /// The caller must ensure `node` is a live item node reachable from
    /// `map`.
    unsafe fn promote(
        &mut self,
        node: *mut ListEntry<LfuItem<K, V>>,
    ) -> *mut ListEntry<LfuItem<K, V>>
    where
        K: Clone,
    {
        // SAFETY: node is a live item of some bucket, so its back-reference
        // is a live node of `buckets`; all pointer manipulation below stays
        // within structures owned by this segment.
        unsafe {
            let bucket_node = (*node).get_value().bucket;
            let count = (*bucket_node).get_value().count;
            let next_node = self.buckets.next(bucket_node);

            let moved = match next_node {
                // The successor bucket already holds count + 1: relink the
                // item to its front.
                Some(next) if (*next).get_value().count == count + 1 => {
                    let raw = Box::into_raw((*bucket_node).get_value_mut().items.detach(node));
                    (*raw).get_value_mut().bucket = next;
                    (*next).get_value_mut().items.attach_front(raw);
                    self.prune_if_empty(bucket_node);
                    raw
                }
                // No bucket holds count + 1 yet.
                _ => {
                    if count != 1 && (*bucket_node).get_value().items.len() == 1 {
                        // An isolated item on a non-sentinel bucket takes
                        // the shortcut: bump the bucket's count in place.
                        // The slot count + 1 is free by the ordering
                        // invariant, and the bucket would otherwise be
                        // pruned.
                        (*bucket_node).get_value_mut().count = count + 1;
                        node
                    } else {
                        let new_bucket = self
                            .buckets
                            .insert_after(bucket_node, LfuBucket::new(count + 1));
                        let raw =
                            Box::into_raw((*bucket_node).get_value_mut().items.detach(node));
                        (*raw).get_value_mut().bucket = new_bucket;
                        (*new_bucket).get_value_mut().items.attach_front(raw);
                        self.prune_if_empty(bucket_node);
                        raw
                    }
                }
            };

            let key = (*moved).get_value().key.clone();
            *self.map.get_mut(&key).expect("promoted item is indexed") = moved;
            moved
        }
    }

    /// Evicts the oldest item of the lowest non-empty bucket.
    fn evict_one(&mut self) {
        // The sentinel may be empty, but by the pruning invariant the bucket
        // after it cannot be, so this loop inspects at most two buckets.
        let mut cursor = self.buckets.front();
        while let Some(bucket_node) = cursor {
            // SAFETY: cursor pointers come from our own bucket list.
            unsafe {
                if let Some(victim) = (*bucket_node).get_value_mut().items.pop_back() {
                    let item = victim.into_value();
                    self.map.remove(&item.key);
                    self.prune_if_empty(bucket_node);
                    self.fire_hook(item.key, item.value);
                    return;
                }
                cursor = self.buckets.next(bucket_node);
            }
        }
    }

    fn set(&mut self, key: K, value: V)
    where
        K: Clone,
    {
        if let Some(&node) = self.map.get(&key) {
            // Resident key: replace the value in place; the write counts as
            // one touch, not two.
            // SAFETY: node comes from our map, so it is a live item node.
            unsafe {
                (*node).get_value_mut().value = value;
                self.promote(node);
            }
            return;
        }

        if self.map.len() >= self.capacity.get() {
            self.evict_one();
        }

        // New keys always start at count 1, in the sentinel bucket.
        // SAFETY: the sentinel is created at construction and never pruned.
        let node = unsafe {
            (*self.sentinel).get_value_mut().items.push_front(LfuItem {
                key: key.clone(),
                value,
                bucket: self.sentinel,
            })
        };
        self.map.insert(key, node);
    }

    fn get<Q>(&mut self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q> + Clone,
        Q: ?Sized + Hash + Eq,
    {
        let node = self.map.get(key).copied()?;
        // SAFETY: node comes from our map, so it is a live item node.
        unsafe {
            let node = self.promote(node);
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
        // SAFETY: node came from our map, so it is a live item node and its
        // back-reference names a live bucket node.
        unsafe {
            let bucket_node = (*node).get_value().bucket;
            let item = (*bucket_node)
                .get_value_mut()
                .items
                .detach(node)
                .into_value();
            self.prune_if_empty(bucket_node);
            self.fire_hook(item.key, item.value);
        }
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
        self.buckets.clear();
        self.sentinel = self.buckets.push_front(LfuBucket::new(1));
    }

    /// Returns `(count, items)` per bucket, front to back.
    #[cfg(test)]
    fn bucket_snapshot(&self) -> Vec<(u64, usize)> {
        let mut out = Vec::new();
        let mut cursor = self.buckets.front();
        while let Some(node) = cursor {
            // SAFETY: cursor pointers come from our own bucket list.
            unsafe {
                let bucket = (*node).get_value();
                out.push((bucket.count, bucket.items.len()));
                cursor = self.buckets.next(node);
            }
        }
        out
    }

    #[cfg(test)]
    fn check_invariants(&self) {
        assert!(self.map.len() <= self.capacity.get());
        assert_eq!(self.buckets.front(), Some(self.sentinel));

        let mut total = 0;
        let mut prev_count = 0;
        let mut cursor = self.buckets.front();
        while let Some(bucket_node) = cursor {
            // SAFETY: cursor pointers come from our own bucket list; item
            // cursors come from the bucket's own item list.
            unsafe {
                let bucket = (*bucket_node).get_value();
                assert!(bucket.count > prev_count, "bucket counts must strictly increase");
                if bucket_node == self.sentinel {
                    assert_eq!(bucket.count, 1, "the sentinel bucket holds count 1");
                } else {
                    assert!(!bucket.items.is_empty(), "non-sentinel buckets are never empty");
                }
                total += bucket.items.len();

                let mut item_cursor = bucket.items.front();
                while let Some(item_node) = item_cursor {
                    let item = (*item_node).get_value();
                    assert_eq!(item.bucket, bucket_node, "item back-reference must name its bucket");
                    assert_eq!(self.map.get(&item.key).copied(), Some(item_node));
                    item_cursor = bucket.items.next(item_node);
                }

                prev_count = bucket.count;
                cursor = self.buckets.next(bucket_node);
            }
        }
        assert_eq!(total, self.map.len());
    }
}

impl<K, V, S> core::fmt::Debug for LfuSegment<K, V, S> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("LfuSegment")
            .field("capacity", &self.capacity)
            .field("len", &self.map.len())
            .field("buckets", &self.buckets.len())
            .finish()
    }
}

/// A Least Frequently Used (LFU) cache with O(1) operations.
///
/// The cache tracks an access count for each entry and evicts the entry with
/// the lowest count when capacity is reached. Among entries tied at the
/// lowest count, the least recently touched one is evicted, so a freshly
/// inserted key that nobody reads is always the first candidate.
///
/// # Type Parameters
///
/// - `K`: Key type. Must implement `Hash + Eq`; insertion also needs `Clone`
///   because the key is stored in both the index and the item.
/// - `V`: Value type. Must implement `Clone` for retrieval, since values are
///   handed out across the lock boundary.
/// - `S`: Hash builder type. Defaults to `DefaultHashBuilder`.
///
/// # Example
///
/// ```
/// use bounded_cache::LfuCache;
/// use std::num::NonZeroUsize;
///
/// let cache = LfuCache::new(NonZeroUsize::new(2).unwrap());
///
/// cache.set("a", 1).unwrap();
/// cache.set("b", 2).unwrap();
/// let _ = cache.get(&"a").unwrap(); // "a" now has the higher count
///
/// cache.set("c", 3).unwrap(); // evicts "b"
/// assert_eq!(cache.get(&"b").unwrap(), None);
/// assert_eq!(cache.get(&"a").unwrap(), Some(1));
/// ```
pub struct LfuCache<K, V, S = DefaultHashBuilder> {
    segment: Mutex<LfuSegment<K, V, S>>,
}

impl<K: Hash + Eq, V> LfuCache<K, V> {
    /// Creates a new LFU cache holding at most `capacity` entries.
    pub fn new(capacity: NonZeroUsize) -> LfuCache<K, V> {
        Self::init(LfuCacheConfig::new(capacity))
    }

    /// Creates a new LFU cache from a configuration.
    pub fn init(config: LfuCacheConfig) -> LfuCache<K, V> {
        Self::with_hasher(config, DefaultHashBuilder::default())
    }
}

impl<K: Hash + Eq, V, S: BuildHasher> LfuCache<K, V, S> {
    /// Creates a new LFU cache from a configuration and a custom hasher.
    pub fn with_hasher(config: LfuCacheConfig, hasher: S) -> Self {
        LfuCache {
            segment: Mutex::new(LfuSegment::with_hasher(config, hasher)),
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
    /// A hit promotes the entry to the next-higher access count. A miss is
    /// not an error and does not alter the cache.
    ///
    /// The key may be any borrowed form of the cache's key type, but
    /// [`Hash`] and [`Eq`] on the borrowed form *must* match those for the
    /// key type.
    pub fn get<Q>(&self, key: &Q) -> Result<Option<V>, CacheError>
    where
        K: Borrow<Q> + Clone,
        Q: ?Sized + Hash + Eq,
        V: Clone,
    {
        Ok(self.segment.lock().get(key).cloned())
    }

    /// Inserts a key-value pair into the cache.
    ///
    /// If the key is already resident, its value is replaced and the entry
    /// is promoted once; the eviction hook does not fire. If the key is new
    /// and the cache is full, the oldest entry of the lowest non-empty
    /// bucket is evicted first (firing the hook). New entries always start
    /// with an access count of 1.
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
    ///
    /// The `count = 1` sentinel bucket survives, ready for new insertions.
    pub fn clear(&self) {
        self.segment.lock().clear();
    }
}

impl<K, V, S> Cache<K, V> for LfuCache<K, V, S>
where
    K: Hash + Eq + Clone,
    V: Clone,
    S: BuildHasher,
{
    fn set(&self, key: K, value: V) -> Result<(), CacheError> {
        LfuCache::set(self, key, value)
    }

    fn get(&self, key: &K) -> Result<Option<V>, CacheError> {
        LfuCache::get(self, key)
    }

    fn delete(&self, key: &K) -> Result<bool, CacheError> {
        LfuCache::delete(self, key)
    }

    fn set_eviction_hook(&self, hook: Option<EvictionHook<K, V>>) {
        LfuCache::set_eviction_hook(self, hook);
    }

    fn keys(&self) -> Vec<K> {
        LfuCache::keys(self)
    }

    fn len(&self) -> usize {
        LfuCache::len(self)
    }
}

impl<K: Hash + Eq, V, S: BuildHasher> core::fmt::Debug for LfuCache<K, V, S> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let segment = self.segment.lock();
        f.debug_struct("LfuCache")
            .field("capacity", &segment.capacity)
            .field("len", &segment.len())
            .finish()
    }
}
