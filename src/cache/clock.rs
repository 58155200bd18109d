//! Clock Module
//!
//! Time source shared by every tier. Production code reads the wall clock,
//! tests drive a manual clock to step over TTL boundaries without sleeping.

use std::fmt::Debug;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::Utc;

// == Clock Trait ==
/// A source of Unix timestamps in milliseconds.
pub trait Clock: Debug + Send + Sync {
    /// Returns the current time in milliseconds since the Unix epoch.
    fn now_ms(&self) -> u64;
}

/// Shared handle to a clock, handed to every store of one manager.
pub type SharedClock = Arc<dyn Clock>;

// == System Clock ==
/// Wall clock backed by `chrono::Utc::now`.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_ms(&self) -> u64 {
        // Pre-epoch clocks clamp to 0 rather than wrapping.
        Utc::now().timestamp_millis().max(0) as u64
    }
}

// == Manual Clock ==
/// A clock that only moves when told to.
///
/// Cloning yields a handle to the same underlying instant, so a test can keep
/// one copy and pass another into the cache.
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    now: Arc<AtomicU64>,
}

impl ManualClock {
    /// Creates a manual clock positioned at `start_ms`.
    pub fn new(start_ms: u64) -> Self {
        Self {
            now: Arc::new(AtomicU64::new(start_ms)),
        }
    }

    /// Moves the clock forward by `delta_ms`.
    pub fn advance(&self, delta_ms: u64) {
        self.now.fetch_add(delta_ms, Ordering::SeqCst);
    }

    /// Jumps the clock to an absolute instant.
    pub fn set(&self, now_ms: u64) {
        self.now.store(now_ms, Ordering::SeqCst);
    }
}

impl Clock for ManualClock {
    fn now_ms(&self) -> u64 {
        self.now.load(Ordering::SeqCst)
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_system_clock_is_after_2020() {
        // 2020-01-01T00:00:00Z
        assert!(SystemClock.now_ms() > 1_577_836_800_000);
    }

    #[test]
    fn test_manual_clock_advance_and_set() {
        let clock = ManualClock::new(1_000);
        assert_eq!(clock.now_ms(), 1_000);

        clock.advance(500);
        assert_eq!(clock.now_ms(), 1_500);

        clock.set(42);
        assert_eq!(clock.now_ms(), 42);
    }

    #[test]
    fn test_manual_clock_clones_share_time() {
        let clock = ManualClock::new(0);
        let handle = clock.clone();

        handle.advance(250);
        assert_eq!(clock.now_ms(), 250);
    }
}
