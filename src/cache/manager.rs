//! Cache Manager Module
//!
//! Composes one memory tier and two durable tiers (session and persistent)
//! into four access patterns:
//!
//! - `memory` / `session` / `persistent`: direct access to one tier
//! - `smart`: writes go to memory + session, reads cascade
//!   memory -> session -> persistent and promote hits into the faster tiers

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use serde::{de::DeserializeOwned, Deserialize, Serialize};
use tokio::sync::RwLock;
use tracing::debug;

use crate::cache::{
    ttl, DurableStore, DynMedium, ManagerStats, MemoryStore, PurgeReport, SharedClock,
    StorageMedium, TierSize,
};
use crate::config::CacheConfig;

/// A manager shared between tasks of a multi-threaded host.
pub type SharedCache<T, S = DynMedium, P = DynMedium> = Arc<RwLock<CacheManager<T, S, P>>>;

// == Tier ==
/// Names of the four access patterns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tier {
    Memory,
    Session,
    Persistent,
    Smart,
}

impl Tier {
    pub fn as_str(&self) -> &'static str {
        match self {
            Tier::Memory => "memory",
            Tier::Session => "session",
            Tier::Persistent => "persistent",
            Tier::Smart => "smart",
        }
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Tier {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "memory" => Ok(Tier::Memory),
            "session" => Ok(Tier::Session),
            "persistent" => Ok(Tier::Persistent),
            "smart" => Ok(Tier::Smart),
            other => Err(format!("unknown cache tier '{}'", other)),
        }
    }
}

// == Cache Manager ==
/// Owns the three tiers for the life of the application.
///
/// Construct one per application root and hand it (or a `SharedCache`) to
/// whoever needs it. `T` is the value type of the memory tier; the durable
/// tiers store it as JSON.
#[derive(Debug)]
pub struct CacheManager<T, S = DynMedium, P = DynMedium> {
    memory: MemoryStore<T>,
    session: DurableStore<S>,
    persistent: DurableStore<P>,
}

impl<T, S, P> CacheManager<T, S, P>
where
    T: Clone + Serialize + DeserializeOwned,
    S: StorageMedium,
    P: StorageMedium,
{
    // == Constructor ==
    /// Builds the three tiers from `config`, all reading time from `clock`.
    ///
    /// # Arguments
    /// * `config` - Capacity, default TTL and namespace of each tier
    /// * `session_medium` - Medium that lives as long as the process
    /// * `persistent_medium` - Medium that survives restarts
    /// * `clock` - Time source shared by all tiers
    pub fn new(
        config: &CacheConfig,
        session_medium: S,
        persistent_medium: P,
        clock: SharedClock,
    ) -> Self {
        let memory = MemoryStore::new(
            config.memory.default_ttl,
            config.memory.max_size,
            Arc::clone(&clock),
        );
        let session = DurableStore::new(
            session_medium,
            config.session.default_ttl,
            config.session.max_size,
            config.session.namespace.clone(),
            Arc::clone(&clock),
        );
        let persistent = DurableStore::new(
            persistent_medium,
            config.persistent.default_ttl,
            config.persistent.max_size,
            config.persistent.namespace.clone(),
            clock,
        );

        Self {
            memory,
            session,
            persistent,
        }
    }

    /// Wraps the manager for sharing across tasks.
    pub fn into_shared(self) -> SharedCache<T, S, P> {
        Arc::new(RwLock::new(self))
    }

    // == Tier Access ==
    /// The memory tier.
    pub fn memory(&mut self) -> &mut MemoryStore<T> {
        &mut self.memory
    }

    /// The session-lifetime tier.
    pub fn session(&self) -> &DurableStore<S> {
        &self.session
    }

    /// The restart-surviving tier.
    pub fn persistent(&self) -> &DurableStore<P> {
        &self.persistent
    }

    /// The cascading access pattern.
    pub fn smart(&mut self) -> SmartTier<'_, T, S, P> {
        SmartTier { manager: self }
    }

    // == Clear All ==
    /// Clears every tier.
    pub fn clear_all(&mut self) {
        self.memory.clear();
        self.session.clear();
        self.persistent.clear();
    }

    // == Stats ==
    /// Memory tier statistics plus the current durable tier populations.
    pub fn stats(&self) -> ManagerStats {
        ManagerStats {
            memory: self.memory.stats(),
            session: TierSize {
                size: self.session.size(),
            },
            persistent: TierSize {
                size: self.persistent.size(),
            },
        }
    }

    // == Purge Expired ==
    /// Physically removes expired entries from every tier.
    pub fn purge_expired(&mut self) -> PurgeReport {
        PurgeReport {
            memory: self.memory.purge_expired(),
            session: self.session.purge_expired(),
            persistent: self.persistent.purge_expired(),
        }
    }

    // == Tier Dispatch ==
    /// `set` on the named access pattern.
    pub fn set_in(&mut self, tier: Tier, key: &str, value: T, ttl: Option<u64>) {
        match tier {
            Tier::Memory => self.memory.set(key, value, ttl),
            Tier::Session => self.session.set(key, &value, ttl),
            Tier::Persistent => self.persistent.set(key, &value, ttl),
            Tier::Smart => self.smart().set(key, value, ttl),
        }
    }

    /// `get` on the named access pattern.
    pub fn get_in(&mut self, tier: Tier, key: &str) -> Option<T> {
        match tier {
            Tier::Memory => self.memory.get(key),
            Tier::Session => self.session.get(key),
            Tier::Persistent => self.persistent.get(key),
            Tier::Smart => self.smart().get(key),
        }
    }

    /// `has` on the named access pattern.
    pub fn has_in(&mut self, tier: Tier, key: &str) -> bool {
        match tier {
            Tier::Memory => self.memory.has(key),
            Tier::Session => self.session.has::<T>(key),
            Tier::Persistent => self.persistent.has::<T>(key),
            Tier::Smart => self.smart().has(key),
        }
    }

    /// `delete` on the named access pattern.
    pub fn delete_in(&mut self, tier: Tier, key: &str) -> bool {
        match tier {
            Tier::Memory => self.memory.delete(key),
            Tier::Session => self.session.delete(key),
            Tier::Persistent => self.persistent.delete(key),
            Tier::Smart => self.smart().delete(key),
        }
    }

    /// `clear` on the named access pattern. Clearing `smart` clears all tiers.
    pub fn clear_in(&mut self, tier: Tier) {
        match tier {
            Tier::Memory => self.memory.clear(),
            Tier::Session => self.session.clear(),
            Tier::Persistent => self.persistent.clear(),
            Tier::Smart => self.clear_all(),
        }
    }
}

// == Smart Tier ==
/// Cascading view over all three tiers.
pub struct SmartTier<'a, T, S, P> {
    manager: &'a mut CacheManager<T, S, P>,
}

impl<'a, T, S, P> SmartTier<'a, T, S, P>
where
    T: Clone + Serialize + DeserializeOwned,
    S: StorageMedium,
    P: StorageMedium,
{
    // == Set ==
    /// Writes to the memory and session tiers. The persistent tier is never
    /// written here.
    pub fn set(&mut self, key: &str, value: T, ttl: Option<u64>) {
        self.manager.session.set(key, &value, ttl);
        self.manager.memory.set(key, value, ttl);
    }

    // == Get ==
    /// Reads memory, then session, then persistent.
    ///
    /// A session hit is copied into memory; a persistent hit is copied into
    /// both memory and session. Promoted copies get the `MEMORY` and
    /// `SESSION` preset TTLs regardless of the original entry's TTL.
    pub fn get(&mut self, key: &str) -> Option<T> {
        let manager = &mut *self.manager;

        if let Some(value) = manager.memory.get(key) {
            return Some(value);
        }

        if let Some(value) = manager.session.get::<T>(key) {
            debug!(key = %key, "promoting session hit into memory");
            manager.memory.set(key, value.clone(), Some(ttl::MEMORY));
            return Some(value);
        }

        if let Some(value) = manager.persistent.get::<T>(key) {
            debug!(key = %key, "promoting persistent hit into memory and session");
            manager.memory.set(key, value.clone(), Some(ttl::MEMORY));
            manager.session.set(key, &value, Some(ttl::SESSION));
            return Some(value);
        }

        None
    }

    // == Has ==
    /// True if any tier holds a live entry that decodes as `T`. Nothing is
    /// promoted.
    pub fn has(&mut self, key: &str) -> bool {
        let manager = &mut *self.manager;
        manager.memory.has(key)
            || manager.session.has::<T>(key)
            || manager.persistent.has::<T>(key)
    }

    // == Delete ==
    /// Deletes the key from all three tiers. Returns true if any tier held it.
    pub fn delete(&mut self, key: &str) -> bool {
        let manager = &mut *self.manager;
        let memory = manager.memory.delete(key);
        let session = manager.session.delete(key);
        let persistent = manager.persistent.delete(key);
        memory || session || persistent
    }

    // == Clear ==
    /// Clears every tier.
    pub fn clear(&mut self) {
        self.manager.clear_all();
    }

    // == Get Or Insert ==
    /// Returns the cached value, or runs `fetch` and caches its result via
    /// `set`.
    ///
    /// Errors from `fetch` are returned as-is and nothing is cached.
    pub fn get_or_insert_with<E, F>(&mut self, key: &str, ttl: Option<u64>, fetch: F) -> Result<T, E>
    where
        F: FnOnce() -> Result<T, E>,
    {
        if let Some(value) = self.get(key) {
            return Ok(value);
        }

        let value = fetch()?;
        self.set(key, value.clone(), ttl);
        Ok(value)
    }
}
