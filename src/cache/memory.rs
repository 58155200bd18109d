//! Memory Store Module
//!
//! The fastest tier: an in-process table with TTL expiration, oldest-write
//! eviction and hit/miss accounting. Contents vanish with the process.

use std::collections::HashMap;

use tracing::debug;

use crate::cache::{CacheStats, Entry, SharedClock, WriteOrder};

// == Memory Store ==
/// Size-bounded, TTL-aware key/value table.
///
/// Values are kept as-is (no serialization), so any `Clone` type can be
/// stored.
#[derive(Debug)]
pub struct MemoryStore<T> {
    /// Key-value storage
    entries: HashMap<String, Entry<T>>,
    /// Write-time index used for eviction
    order: WriteOrder,
    /// Performance statistics
    stats: CacheStats,
    /// Maximum number of entries before the next `set` evicts
    max_size: usize,
    /// TTL in milliseconds for `set` calls that do not pass one
    default_ttl: u64,
    clock: SharedClock,
}

impl<T: Clone> MemoryStore<T> {
    // == Constructor ==
    /// Creates an empty store.
    ///
    /// # Arguments
    /// * `default_ttl` - TTL in milliseconds applied when `set` omits one
    /// * `max_size` - Entry count at which `set` evicts; values below 1 are
    ///   raised to 1
    /// * `clock` - Time source for write timestamps and liveness checks
    pub fn new(default_ttl: u64, max_size: usize, clock: SharedClock) -> Self {
        let max_size = max_size.max(1);
        Self {
            entries: HashMap::new(),
            order: WriteOrder::new(),
            stats: CacheStats::new(max_size),
            max_size,
            default_ttl,
            clock,
        }
    }

    // == Set ==
    /// Stores a value, replacing any previous entry for the key.
    ///
    /// When the store already holds `max_size` entries (live or dead), exactly
    /// one entry is evicted first: the one with the oldest write timestamp.
    /// This also applies when `key` is already present.
    ///
    /// # Arguments
    /// * `key` - The key to store
    /// * `value` - The value to store
    /// * `ttl` - Optional TTL in milliseconds (uses `default_ttl` if None)
    pub fn set(&mut self, key: &str, value: T, ttl: Option<u64>) {
        if self.entries.len() >= self.max_size {
            if let Some(evicted) = self.order.evict_oldest() {
                self.entries.remove(&evicted);
                debug!(key = %evicted, "memory tier evicted oldest entry");
            }
        }

        let now = self.clock.now_ms();
        let entry = Entry::new(value, now, ttl.unwrap_or(self.default_ttl));
        self.entries.insert(key.to_string(), entry);
        self.order.record(key, now);

        self.stats.set_size(self.entries.len());
    }

    // == Get ==
    /// Returns a copy of the value if a live entry exists.
    ///
    /// Expired entries are removed on the spot. Every call counts as either
    /// a hit or a miss.
    pub fn get(&mut self, key: &str) -> Option<T> {
        let now = self.clock.now_ms();

        // Outer None: no entry. Inner None: entry present but expired.
        let lookup = self
            .entries
            .get(key)
            .map(|entry| entry.is_live(now).then(|| entry.data.clone()));

        match lookup {
            Some(Some(value)) => {
                self.stats.record_hit();
                Some(value)
            }
            Some(None) => {
                self.remove_entry(key);
                self.stats.record_miss();
                None
            }
            None => {
                self.stats.record_miss();
                None
            }
        }
    }

    // == Has ==
    /// Same as `get(key).is_some()`, including hit/miss accounting and lazy
    /// removal of an expired entry.
    pub fn has(&mut self, key: &str) -> bool {
        self.get(key).is_some()
    }

    // == Delete ==
    /// Removes an entry. Returns true if one existed.
    pub fn delete(&mut self, key: &str) -> bool {
        self.remove_entry(key)
    }

    // == Clear ==
    /// Removes every entry. Hit and miss counters are kept.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.order.clear();
        self.stats.set_size(0);
    }

    // == Stats ==
    /// Returns a snapshot of the current statistics.
    pub fn stats(&self) -> CacheStats {
        let mut stats = self.stats.clone();
        stats.set_size(self.entries.len());
        stats
    }

    // == Purge Expired ==
    /// Removes all expired entries without touching the hit/miss counters.
    ///
    /// Returns the number of entries removed.
    pub fn purge_expired(&mut self) -> usize {
        let now = self.clock.now_ms();
        let expired: Vec<String> = self
            .entries
            .iter()
            .filter(|(_, entry)| !entry.is_live(now))
            .map(|(key, _)| key.clone())
            .collect();

        for key in &expired {
            self.remove_entry(key);
        }
        expired.len()
    }

    /// Keys currently held, expired ones included until they are removed.
    pub fn keys(&self) -> Vec<String> {
        self.entries.keys().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn remove_entry(&mut self, key: &str) -> bool {
        let existed = self.entries.remove(key).is_some();
        if existed {
            self.order.remove(key);
            self.stats.set_size(self.entries.len());
        }
        existed
    }
}
