//! Tiered Cache - A multi-tier cache manager
//!
//! A bounded in-memory tier, session and persistent tiers over pluggable
//! storage media, TTL expiration everywhere, and a `smart` access pattern that
//! cascades reads and promotes hits into faster tiers.
//!
//! Cache operations never fail: storage problems degrade to misses and
//! dropped writes.

pub mod api;
pub mod cache;
pub mod config;
pub mod error;
pub mod models;
pub mod tasks;
pub mod utils;

pub use api::AppState;
pub use cache::{CacheManager, Tier};
pub use config::{CacheConfig, Config};
pub use tasks::spawn_sweep_task;
