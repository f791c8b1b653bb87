//! Cache Configuration Module
//!
//! This module provides configuration structures for both cache engines.
//! Each cache type has its own dedicated configuration struct; a cache is
//! created from it with `init` (default hasher) or `with_hasher` (custom
//! [`BuildHasher`](core::hash::BuildHasher)).
//!
//! Capacity is a [`NonZeroUsize`]: a zero-capacity cache is rejected at
//! construction, by the type system.
//!
//! # Examples
//!
//! ```
//! use bounded_cache::config::LruCacheConfig;
//! use bounded_cache::LruCache;
//! use std::num::NonZeroUsize;
//!
//! let config = LruCacheConfig::new(NonZeroUsize::new(1000).unwrap());
//! let cache: LruCache<String, i32> = LruCache::init(config);
//! ```

use core::fmt;
use core::num::NonZeroUsize;

/// Configuration for an LRU (Least Recently Used) cache.
///
/// LRU evicts the least recently accessed entry when the cache reaches
/// capacity.
#[derive(Clone, Copy)]
pub struct LruCacheConfig {
    /// Maximum number of key-value pairs the cache can hold.
    pub capacity: NonZeroUsize,
}

impl LruCacheConfig {
    /// Creates a new configuration for an LRU cache.
    ///
    /// # Arguments
    /// * `capacity` - Maximum number of key-value pairs the cache can hold
    pub fn new(capacity: NonZeroUsize) -> Self {
        Self { capacity }
    }
}

impl fmt::Debug for LruCacheConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LruCacheConfig")
            .field("capacity", &self.capacity)
            .finish()
    }
}

/// Configuration for an LFU (Least Frequently Used) cache.
///
/// LFU tracks an access count for each entry and evicts the least frequently
/// used entry when the cache reaches capacity, preferring the least recently
/// touched entry among those tied at the lowest count.
#[derive(Clone, Copy)]
pub struct LfuCacheConfig {
    /// Maximum number of key-value pairs the cache can hold.
    pub capacity: NonZeroUsize,
}

impl LfuCacheConfig {
    /// Creates a new configuration for an LFU cache.
    ///
    /// # Arguments
    /// * `capacity` - Maximum number of key-value pairs the cache can hold
    pub fn new(capacity: NonZeroUsize) -> Self {
        Self { capacity }
    }
}

impl fmt::Debug for LfuCacheConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LfuCacheConfig")
            .field("capacity", &self.capacity)
            .finish()
    }
}
