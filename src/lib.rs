#![doc = include_str!("../README.md")]
//!
//! ---
//!
//! # Code Reference
//!
//! ## Operations
//!
//! | Operation | LRU | LFU | Time |
//! |-----------|-----|-----|------|
//! | `set(key, value)` | insert at MRU end, evict LRU victim if full | insert at count-1 bucket, evict lowest-count victim if full | O(1) |
//! | `get(key)` | move entry to MRU end | promote entry to the next frequency bucket | O(1) |
//! | `delete(key)` | unlink entry, fire hook | unlink entry, prune empty bucket, fire hook | O(1) |
//! | `keys()` | unordered snapshot | unordered snapshot | O(n) |
//!
//! ## Data Structures
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────────┐
//! │                          LruCache                              │
//! │                                                                │
//! │  HashMap<K, *Node>          Doubly-Linked List                 │
//! │  ┌──────────────┐          ┌─────────────────────────────┐     │
//! │  │ "apple" ──────────────▶ │ MRU ◀──▶ ... ◀──▶ LRU      │     │
//! │  │ "banana" ─────────────▶ │ front              back     │     │
//! │  └──────────────┘          └─────────────────────────────┘     │
//! └────────────────────────────────────────────────────────────────┘
//!
//! ┌────────────────────────────────────────────────────────────────┐
//! │                          LfuCache                              │
//! │                                                                │
//! │  HashMap<K, *Node>     Bucket list (ascending count)           │
//! │  ┌──────────────┐     ┌──────────────────────────────────┐     │
//! │  │ "cold" ───────────▶│ count=1: [cold] ◀──▶ [new]  ◀ victim   │
//! │  │ "warm" ───────────▶│ count=4: [warm]                  │     │
//! │  │ "hot" ────────────▶│ count=9: [hot]                   │     │
//! │  └──────────────┘     └──────────────────────────────────┘     │
//! └────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The `count = 1` bucket is a permanent sentinel: it exists even when empty
//! and is the landing pad for every new insertion. All other buckets are
//! pruned the moment they empty, which keeps the eviction walk O(1).

/// The uniform cache contract shared by both eviction engines.
///
/// Provides the [`Cache`](cache::Cache) trait, the [`EvictionHook`](cache::EvictionHook)
/// callback type, and the forward-compatibility [`CacheError`](cache::CacheError) type.
pub mod cache;

/// Cache configuration structures.
///
/// Provides configuration structures for both cache engines.
pub mod config;

/// Doubly linked list implementation with in-place editing capabilities.
///
/// This module provides a memory-efficient intrusive doubly linked list that
/// allows O(1) insertion, removal, and reordering of nodes through stable
/// raw-pointer handles.
///
/// **Note**: This module is internal infrastructure and should not be used
/// directly by library consumers. It exposes unsafe raw pointer operations
/// that require careful invariant maintenance. Use the high-level cache
/// implementations instead.
pub(crate) mod list;

/// Least Recently Used (LRU) cache implementation.
///
/// Provides a fixed-size cache that evicts the least recently used entry
/// when capacity is reached.
pub mod lru;

/// Least Frequently Used (LFU) cache implementation.
///
/// Provides a fixed-size cache that evicts the least frequently used entry
/// when capacity is reached, breaking ties by recency within a frequency.
pub mod lfu;

// Re-export cache types
pub use lfu::LfuCache;
pub use lru::LruCache;

// Re-export the common contract
pub use cache::{Cache, CacheError, EvictionHook};

// Re-export configuration types
pub use config::{LfuCacheConfig, LruCacheConfig};
