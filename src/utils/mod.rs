//! Utility Module
//!
//! Conveniences layered over the cache manager: key building, dependency
//! driven invalidation and debounced writes.

mod debounce;
mod invalidation;
mod keys;

pub use debounce::DebouncedWriter;
pub use invalidation::{invalidate_prefix, InvalidationChain};
pub use keys::{entity_key, namespaced_key};
