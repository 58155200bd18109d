//! Eviction Order Module
//!
//! Tracks keys by write time so the memory tier can evict the oldest write.

use std::collections::{BTreeMap, HashMap};

// == Write Order ==
/// Orders keys by the time they were last written.
///
/// Reads never change the order. Keys written in the same millisecond are
/// ordered by a monotonically increasing sequence number, so ties resolve to
/// the earlier write.
#[derive(Debug, Default)]
pub struct WriteOrder {
    /// (timestamp, sequence) -> key, oldest first
    order: BTreeMap<(u64, u64), String>,
    /// key -> its position in `order`
    positions: HashMap<String, (u64, u64)>,
    /// Next sequence number
    seq: u64,
}

impl WriteOrder {
    // == Constructor ==
    /// Creates an empty tracker.
    pub fn new() -> Self {
        Self::default()
    }

    // == Record Write ==
    /// Records a write of `key` at `timestamp`, replacing any earlier position.
    pub fn record(&mut self, key: &str, timestamp: u64) {
        self.remove(key);
        let position = (timestamp, self.seq);
        self.seq += 1;
        self.order.insert(position, key.to_string());
        self.positions.insert(key.to_string(), position);
    }

    // == Remove ==
    /// Forgets a key.
    pub fn remove(&mut self, key: &str) {
        if let Some(position) = self.positions.remove(key) {
            self.order.remove(&position);
        }
    }

    // == Evict Oldest ==
    /// Removes and returns the key with the oldest write.
    ///
    /// Returns None if nothing is tracked.
    pub fn evict_oldest(&mut self) -> Option<String> {
        let (_, key) = self.order.pop_first()?;
        self.positions.remove(&key);
        Some(key)
    }

    /// Drops every tracked key.
    pub fn clear(&mut self) {
        self.order.clear();
        self.positions.clear();
    }
}

#[cfg(test)]
impl WriteOrder {
    fn peek_oldest(&self) -> Option<&String> {
        self.order.values().next()
    }

    fn len(&self) -> usize {
        self.positions.len()
    }

    fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }
}
