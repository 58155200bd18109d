//! Cache Entry Module
//!
//! Defines the timestamped wrapper stored for every cached value.

use serde::{Deserialize, Serialize};

// == Entry ==
/// A cached value together with its write time and time-to-live.
///
/// Entries are never mutated after creation: writing the same key again
/// replaces the whole entry. The serialized form is
/// `{"data": ..., "timestamp": ..., "ttl": ...}`, which is what the durable
/// tiers put into their medium.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entry<T> {
    /// The stored value
    pub data: T,
    /// Write time (Unix milliseconds)
    pub timestamp: u64,
    /// Time-to-live in milliseconds
    pub ttl: u64,
}

impl<T> Entry<T> {
    // == Constructor ==
    /// Creates an entry written at `now_ms` that lives for `ttl_ms`.
    pub fn new(data: T, now_ms: u64, ttl_ms: u64) -> Self {
        Self {
            data,
            timestamp: now_ms,
            ttl: ttl_ms,
        }
    }

    // == Liveness ==
    /// Returns true while `now - timestamp <= ttl`.
    ///
    /// The boundary instant itself is still live. A timestamp in the future
    /// (clock moved backwards) counts as zero elapsed time.
    pub fn is_live(&self, now_ms: u64) -> bool {
        now_ms.saturating_sub(self.timestamp) <= self.ttl
    }
}

// == Entry Metadata ==
/// The timing fields of a serialized entry, read without decoding `data`.
///
/// Used by maintenance passes that only need to know how old an entry is.
#[derive(Debug, Clone, Copy, Deserialize)]
pub(crate) struct EntryMeta {
    pub timestamp: u64,
    pub ttl: u64,
}

impl EntryMeta {
    pub fn is_live(&self, now_ms: u64) -> bool {
        now_ms.saturating_sub(self.timestamp) <= self.ttl
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entry_live_before_ttl() {
        let entry = Entry::new("value", 1_000, 500);
        assert!(entry.is_live(1_000));
        assert!(entry.is_live(1_499));
    }

    #[test]
    fn test_entry_live_at_boundary() {
        let entry = Entry::new("value", 1_000, 500);
        assert!(entry.is_live(1_500), "now - timestamp == ttl is still live");
    }

    #[test]
    fn test_entry_dead_after_ttl() {
        let entry = Entry::new("value", 1_000, 500);
        assert!(!entry.is_live(1_501));
    }

    #[test]
    fn test_entry_future_timestamp_is_live() {
        let entry = Entry::new("value", 10_000, 0);
        assert!(entry.is_live(5_000));
    }

    #[test]
    fn test_serialized_shape() {
        let entry = Entry::new(42, 7, 9);
        let json = serde_json::to_value(&entry).unwrap();
        assert_eq!(json, serde_json::json!({"data": 42, "timestamp": 7, "ttl": 9}));
    }

    #[test]
    fn test_meta_ignores_data() {
        let meta: EntryMeta =
            serde_json::from_str(r#"{"data":{"nested":[1,2]},"timestamp":10,"ttl":5}"#).unwrap();
        assert_eq!(meta.timestamp, 10);
        assert!(meta.is_live(15));
        assert!(!meta.is_live(16));
    }
}
