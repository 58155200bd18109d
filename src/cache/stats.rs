//! Cache Statistics Module
//!
//! Hit/miss accounting for the memory tier and the aggregate view reported by
//! the manager.

use serde::Serialize;

// == Cache Stats ==
/// Performance counters of one memory tier.
///
/// `hits` and `misses` accumulate for the lifetime of the store; clearing the
/// store does not reset them.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CacheStats {
    /// Number of live reads
    pub hits: u64,
    /// Number of reads that found nothing or an expired entry
    pub misses: u64,
    /// Current number of entries, dead ones included until they are removed
    pub size: usize,
    /// Configured capacity
    pub max_size: usize,
    /// hits / (hits + misses), 0 when nothing was read yet
    pub hit_rate: f64,
}

impl CacheStats {
    // == Constructor ==
    /// Creates zeroed counters for a store of the given capacity.
    pub fn new(max_size: usize) -> Self {
        Self {
            max_size,
            ..Self::default()
        }
    }

    // == Record Hit ==
    /// Increments the hit counter.
    pub fn record_hit(&mut self) {
        self.hits += 1;
        self.refresh_hit_rate();
    }

    // == Record Miss ==
    /// Increments the miss counter.
    pub fn record_miss(&mut self) {
        self.misses += 1;
        self.refresh_hit_rate();
    }

    // == Update Entry Count ==
    /// Updates the current size.
    pub fn set_size(&mut self, size: usize) {
        self.size = size;
    }

    fn refresh_hit_rate(&mut self) {
        let total = self.hits + self.misses;
        self.hit_rate = if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        };
    }
}

// == Tier Size ==
/// Population of a durable tier, counted at call time.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct TierSize {
    pub size: usize,
}

// == Manager Stats ==
/// Aggregate statistics across the three tiers.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ManagerStats {
    pub memory: CacheStats,
    pub session: TierSize,
    pub persistent: TierSize,
}

// == Purge Report ==
/// Number of expired entries removed from each tier by a sweep.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct PurgeReport {
    pub memory: usize,
    pub session: usize,
    pub persistent: usize,
}

impl PurgeReport {
    /// Total entries removed across all tiers.
    pub fn total(&self) -> usize {
        self.memory + self.session + self.persistent
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stats_new() {
        let stats = CacheStats::new(10);
        assert_eq!(stats.hits, 0);
        assert_eq!(stats.misses, 0);
        assert_eq!(stats.size, 0);
        assert_eq!(stats.max_size, 10);
        assert_eq!(stats.hit_rate, 0.0);
    }

    #[test]
    fn test_hit_rate_all_hits() {
        let mut stats = CacheStats::new(10);
        stats.record_hit();
        stats.record_hit();
        stats.record_hit();
        assert_eq!(stats.hit_rate, 1.0);
    }

    #[test]
    fn test_hit_rate_all_misses() {
        let mut stats = CacheStats::new(10);
        stats.record_miss();
        stats.record_miss();
        assert_eq!(stats.hit_rate, 0.0);
    }

    #[test]
    fn test_hit_rate_mixed() {
        let mut stats = CacheStats::new(10);
        stats.record_hit();
        stats.record_miss();
        stats.record_miss();
        stats.record_hit();
        assert_eq!(stats.hit_rate, 0.5);
    }

    #[test]
    fn test_set_size() {
        let mut stats = CacheStats::new(100);
        stats.set_size(42);
        assert_eq!(stats.size, 42);
    }

    #[test]
    fn test_purge_report_total() {
        let report = PurgeReport {
            memory: 1,
            session: 2,
            persistent: 3,
        };
        assert_eq!(report.total(), 6);
    }

    #[test]
    fn test_manager_stats_serialize() {
        let stats = ManagerStats {
            memory: CacheStats::new(5),
            session: TierSize { size: 2 },
            persistent: TierSize { size: 1 },
        };
        let json = serde_json::to_value(&stats).unwrap();
        assert_eq!(json["memory"]["max_size"], 5);
        assert_eq!(json["session"]["size"], 2);
        assert_eq!(json["persistent"]["size"], 1);
    }
}
