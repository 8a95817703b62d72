//! Bounded least-recently-used memoization.
//!
//! Every entry carries the value of a monotonically increasing clock taken
//! at its last access. A `BTreeMap` keyed by that stamp keeps entries in
//! recency order, so the oldest entry is always the first one.

use std::collections::{BTreeMap, HashMap};
use std::hash::Hash;
use std::num::NonZeroUsize;

/// Hit/miss counters for one cache.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    pub evictions: u64,
}

impl CacheStats {
    /// Fraction of lookups answered from the cache, or 0 before any lookup.
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }
}

#[derive(Debug, Clone)]
struct Slot<V> {
    value: V,
    stamp: u64,
}

/// A map holding at most `capacity` entries, evicting the least recently
/// used one when full.
#[derive(Debug, Clone)]
pub struct LruCache<K, V> {
    capacity: NonZeroUsize,
    entries: HashMap<K, Slot<V>>,
    recency: BTreeMap<u64, K>,
    clock: u64,
    stats: CacheStats,
}

impl<K: Hash + Eq + Clone, V> LruCache<K, V> {
    /// Create an empty cache.
    pub fn new(capacity: NonZeroUsize) -> Self {
        Self {
            capacity,
            entries: HashMap::new(),
            recency: BTreeMap::new(),
            clock: 0,
            stats: CacheStats::default(),
        }
    }

    /// Maximum number of entries.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity.get()
    }

    /// Number of entries currently held.
    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Whether `key` is cached. Does not count as an access.
    pub fn contains(&self, key: &K) -> bool {
        self.entries.contains_key(key)
    }

    /// Counters accumulated since creation or the last [`clear`](Self::clear).
    pub fn stats(&self) -> CacheStats {
        self.stats
    }

    /// Look up `key`, marking it as most recently used.
    pub fn get(&mut self, key: &K) -> Option<&V> {
        if self.touch(key) {
            self.stats.hits += 1;
            self.entries.get(key).map(|slot| &slot.value)
        } else {
            self.stats.misses += 1;
            None
        }
    }

    /// Insert or replace `key`, evicting the least recently used entry if the
    /// cache is full.
    pub fn insert(&mut self, key: K, value: V) {
        if self.touch(&key) {
            if let Some(slot) = self.entries.get_mut(&key) {
                slot.value = value;
            }
            return;
        }
        self.insert_new(key, value);
    }

    /// Return the cached value for `key`, computing and storing it with
    /// `make` on a miss.
    pub fn get_or_insert_with(&mut self, key: K, make: impl FnOnce() -> V) -> &V {
        if self.touch(&key) {
            self.stats.hits += 1;
        } else {
            self.stats.misses += 1;
            let value = make();
            self.insert_new(key.clone(), value);
        }
        &self.entries[&key].value
    }

    /// Drop every entry and reset the counters.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.recency.clear();
        self.stats = CacheStats::default();
    }

    /// Refresh the stamp of `key` if present.
    fn touch(&mut self, key: &K) -> bool {
        let Some(slot) = self.entries.get_mut(key) else {
            return false;
        };
        self.clock += 1;
        let old = std::mem::replace(&mut slot.stamp, self.clock);
        if let Some(k) = self.recency.remove(&old) {
            self.recency.insert(self.clock, k);
        }
        true
    }

    fn insert_new(&mut self, key: K, value: V) {
        if self.entries.len() >= self.capacity.get() {
            if let Some((_, oldest)) = self.recency.pop_first() {
                self.entries.remove(&oldest);
                self.stats.evictions += 1;
            }
        }
        self.clock += 1;
        self.recency.insert(self.clock, key.clone());
        self.entries.insert(
            key,
            Slot {
                value,
                stamp: self.clock,
            },
        );
    }
}
