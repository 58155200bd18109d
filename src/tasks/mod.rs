//! Background Tasks Module
//!
//! Contains background tasks that run periodically while a host is up.
//!
//! # Tasks
//! - Expiry sweep: physically removes expired entries from every tier

mod sweep;

pub use sweep::spawn_sweep_task;
