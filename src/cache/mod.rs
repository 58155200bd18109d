//! Cache Module
//!
//! Multi-tier caching: a bounded in-memory tier, two namespaced durable tiers
//! over pluggable storage media, and a manager that composes them.

mod clock;
mod durable;
mod entry;
mod eviction;
mod file_medium;
mod manager;
mod medium;
mod memory;
mod stats;

#[cfg(test)]
pub(crate) mod test_support;

// Re-export public types
pub use clock::{Clock, ManualClock, SharedClock, SystemClock};
pub use durable::DurableStore;
pub use entry::Entry;
pub(crate) use entry::EntryMeta;
pub(crate) use eviction::WriteOrder;
pub use file_medium::FileMedium;
pub use manager::{CacheManager, SharedCache, SmartTier, Tier};
pub use medium::{DynMedium, MemoryMedium, StorageMedium, DEFAULT_QUOTA_BYTES};
pub use memory::MemoryStore;
pub use stats::{CacheStats, ManagerStats, PurgeReport, TierSize};

// == TTL Presets ==
/// Recognized time-to-live presets, in milliseconds.
pub mod ttl {
    /// 30 seconds
    pub const SHORT: u64 = 30_000;
    /// 5 minutes
    pub const MEDIUM: u64 = 300_000;
    /// 30 minutes
    pub const LONG: u64 = 1_800_000;
    /// 24 hours
    pub const VERY_LONG: u64 = 86_400_000;
    /// 7 days
    pub const PERSISTENT: u64 = 604_800_000;
    /// Lifetime of values promoted into the memory tier
    pub const MEMORY: u64 = 300_000;
    /// Lifetime of values promoted into the session tier
    pub const SESSION: u64 = 1_800_000;
}
