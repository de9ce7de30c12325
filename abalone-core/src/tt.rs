//! Transposition cache for search results
//!
//! Entries map an exact `(position, remaining depth)` pair to a score. A
//! score stored at one depth is never returned for another, and the cache
//! is cleared at the start of every top-level decision.

use std::hash::Hash;

use rustc_hash::FxHashMap;

use crate::eval::Score;

/// Composite cache key with structural equality
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct TranspositionKey<P> {
    pub position: P,
    pub depth: u32,
}

impl<P> TranspositionKey<P> {
    pub fn new(position: P, depth: u32) -> Self {
        Self { position, depth }
    }
}

/// Cache usage counters
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    pub stores: u64,
}

impl CacheStats {
    pub fn hit_rate(&self) -> f64 {
        let probes = self.hits + self.misses;
        if probes == 0 {
            0.0
        } else {
            self.hits as f64 / probes as f64
        }
    }
}

/// Memoized scores keyed by position and remaining depth
#[derive(Debug)]
pub struct TranspositionCache<P> {
    entries: FxHashMap<TranspositionKey<P>, Score>,
    /// Entry count at which the table is flushed before the next store
    capacity: Option<usize>,
    stats: CacheStats,
}

impl<P: Eq + Hash> Default for TranspositionCache<P> {
    fn default() -> Self {
        Self::new()
    }
}

impl<P: Eq + Hash> TranspositionCache<P> {
    /// Unbounded cache
    pub fn new() -> Self {
        Self {
            entries: FxHashMap::default(),
            capacity: None,
            stats: CacheStats::default(),
        }
    }

    /// Cache that flushes itself once it holds `capacity` entries
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            capacity: Some(capacity.max(1)),
            ..Self::new()
        }
    }

    pub fn lookup(&mut self, key: &TranspositionKey<P>) -> Option<Score> {
        let found = self.entries.get(key).copied();
        if found.is_some() {
            self.stats.hits += 1;
        } else {
            self.stats.misses += 1;
        }
        found
    }

    pub fn store(&mut self, key: TranspositionKey<P>, score: Score) {
        if let Some(capacity) = self.capacity {
            if self.entries.len() >= capacity && !self.entries.contains_key(&key) {
                self.entries.clear();
            }
        }
        self.entries.insert(key, score);
        self.stats.stores += 1;
    }

    /// Drop every entry and reset the counters
    pub fn clear(&mut self) {
        self.entries.clear();
        self.stats = CacheStats::default();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn stats(&self) -> CacheStats {
        self.stats
    }

    pub fn iter(&self) -> impl Iterator<Item = (&TranspositionKey<P>, &Score)> {
        self.entries.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::Position;

    #[test]
    fn test_store_and_lookup() {
        let mut cache = TranspositionCache::new();
        let key = TranspositionKey::new(Position::initial(), 3);
        assert_eq!(cache.lookup(&key), None);
        cache.store(key.clone(), 1.5);
        assert_eq!(cache.lookup(&key), Some(1.5));
        assert_eq!(cache.stats().hits, 1);
        assert_eq!(cache.stats().misses, 1);
        assert_eq!(cache.stats().stores, 1);
    }

    #[test]
    fn test_depth_is_part_of_the_key() {
        let mut cache = TranspositionCache::new();
        let pos = Position::initial();
        cache.store(TranspositionKey::new(pos.clone(), 4), 9.0);
        assert_eq!(cache.lookup(&TranspositionKey::new(pos.clone(), 2)), None);
        assert_eq!(cache.lookup(&TranspositionKey::new(pos.clone(), 5)), None);
        assert_eq!(cache.lookup(&TranspositionKey::new(pos, 4)), Some(9.0));
    }

    #[test]
    fn test_clear() {
        let mut cache = TranspositionCache::new();
        cache.store(TranspositionKey::new(Position::initial(), 1), 0.0);
        assert_eq!(cache.len(), 1);
        cache.clear();
        assert!(cache.is_empty());
        assert_eq!(cache.stats(), CacheStats::default());
    }

    #[test]
    fn test_capacity_flushes() {
        let mut cache = TranspositionCache::with_capacity(2);
        let pos = Position::initial();
        cache.store(TranspositionKey::new(pos.clone(), 1), 1.0);
        cache.store(TranspositionKey::new(pos.clone(), 2), 2.0);
        // Overwriting an existing key does not flush
        cache.store(TranspositionKey::new(pos.clone(), 2), 3.0);
        assert_eq!(cache.len(), 2);
        cache.store(TranspositionKey::new(pos.clone(), 3), 4.0);
        assert_eq!(cache.len(), 1);
        assert_eq!(cache.lookup(&TranspositionKey::new(pos, 3)), Some(4.0));
    }
}
