//! Durable Store Module
//!
//! Adapter that keeps TTL-stamped entries in a slower, size-limited
//! `StorageMedium`. Every physical key is `"{namespace}:{key}"` and the store
//! only ever lists or deletes keys under its own namespace, so several stores
//! and unrelated data can share one medium.
//!
//! Writes are best effort. No operation returns an error: medium failures are
//! logged and surface as a miss, `false`, or a dropped write.

use serde::{de::DeserializeOwned, Serialize};
use tracing::{debug, warn};

use crate::cache::{Entry, EntryMeta, SharedClock, StorageMedium};
use crate::error::MediumError;

// == Durable Store ==
/// Namespaced, TTL-aware view over a storage medium.
#[derive(Debug)]
pub struct DurableStore<M> {
    medium: M,
    /// Prefix of every physical key, without the trailing ':'
    namespace: String,
    /// TTL in milliseconds for `set` calls that do not pass one
    default_ttl: u64,
    /// Population `cleanup` trims the namespace back to
    max_size: usize,
    clock: SharedClock,
}

impl<M: StorageMedium> DurableStore<M> {
    // == Constructor ==
    /// Creates a store over `medium`.
    ///
    /// # Arguments
    /// * `medium` - Backing medium, possibly shared with other namespaces
    /// * `default_ttl` - TTL in milliseconds applied when `set` omits one
    /// * `max_size` - Namespace population restored after a failed write
    /// * `namespace` - Key prefix owned by this store
    /// * `clock` - Time source for write timestamps and liveness checks
    pub fn new(
        medium: M,
        default_ttl: u64,
        max_size: usize,
        namespace: impl Into<String>,
        clock: SharedClock,
    ) -> Self {
        Self {
            medium,
            namespace: namespace.into(),
            default_ttl,
            max_size,
            clock,
        }
    }

    // == Set ==
    /// Serializes and writes a value.
    ///
    /// If serialization or the medium fails, the failure is logged, the
    /// namespace is trimmed via `cleanup`, and the write is dropped.
    pub fn set<T: Serialize + ?Sized>(&self, key: &str, value: &T, ttl: Option<u64>) {
        if let Err(e) = self.try_set(key, value, ttl) {
            warn!(
                namespace = %self.namespace,
                key = %key,
                error = %e,
                "durable write dropped, cleaning up namespace"
            );
            self.cleanup();
        }
    }

    // == Get ==
    /// Returns the value if a live, decodable entry exists.
    ///
    /// Expired entries are deleted from the medium. Entries that cannot be
    /// decoded as `T` are treated as a miss and left in place.
    pub fn get<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let raw = self.read_live(key)?;
        match serde_json::from_str::<Entry<T>>(&raw) {
            Ok(entry) => Some(entry.data),
            Err(e) => {
                debug!(namespace = %self.namespace, key = %key, error = %e, "undecodable entry treated as miss");
                None
            }
        }
    }

    // == Has ==
    /// True exactly when `get::<T>(key)` would return a value. Like `get`,
    /// deletes the entry if it has expired.
    pub fn has<T: DeserializeOwned>(&self, key: &str) -> bool {
        self.get::<T>(key).is_some()
    }

    // == Delete ==
    /// Removes a key. Returns true if it existed; false if it did not or the
    /// medium failed.
    pub fn delete(&self, key: &str) -> bool {
        self.remove_physical(&self.physical_key(key))
    }

    // == Clear ==
    /// Deletes every key in this namespace, leaving other keys in the medium
    /// untouched.
    pub fn clear(&self) {
        let keys = match self.namespaced_keys() {
            Ok(keys) => keys,
            Err(e) => {
                warn!(namespace = %self.namespace, error = %e, "clear failed to list keys");
                return;
            }
        };

        self.remove_batch(&keys);
    }

    // == Size ==
    /// Number of keys currently in this namespace, counted now.
    pub fn size(&self) -> usize {
        match self.namespaced_keys() {
            Ok(keys) => keys.len(),
            Err(e) => {
                warn!(namespace = %self.namespace, error = %e, "size failed to list keys");
                0
            }
        }
    }

    /// Logical keys (namespace stripped) currently in this namespace.
    pub fn keys(&self) -> Vec<String> {
        let prefix_len = self.namespace.len() + 1;
        match self.namespaced_keys() {
            Ok(keys) => keys
                .into_iter()
                .map(|physical| physical[prefix_len..].to_string())
                .collect(),
            Err(e) => {
                warn!(namespace = %self.namespace, error = %e, "listing keys failed");
                Vec::new()
            }
        }
    }

    // == Purge Expired ==
    /// Deletes every dead entry in the namespace. Unreadable entries are
    /// left for `cleanup`.
    ///
    /// Returns the number of entries removed.
    pub fn purge_expired(&self) -> usize {
        let now = self.clock.now_ms();
        let keys = match self.namespaced_keys() {
            Ok(keys) => keys,
            Err(e) => {
                warn!(namespace = %self.namespace, error = %e, "purge failed to list keys");
                return 0;
            }
        };

        let dead: Vec<String> = keys
            .into_iter()
            .filter(|physical| matches!(self.read_meta(physical), Some(meta) if !meta.is_live(now)))
            .collect();
        self.remove_batch(&dead)
    }

    // == Cleanup ==
    /// Restores the namespace to at most `max_size` entries after a failed
    /// write.
    ///
    /// Dead entries go first. The rest are ordered by write timestamp,
    /// unreadable ones counting as timestamp 0, and the oldest are deleted
    /// until `max_size` remain.
    fn cleanup(&self) {
        let now = self.clock.now_ms();
        let keys = match self.namespaced_keys() {
            Ok(keys) => keys,
            Err(e) => {
                warn!(namespace = %self.namespace, error = %e, "cleanup failed to list keys");
                return;
            }
        };

        let mut doomed = Vec::new();
        let mut survivors: Vec<(u64, String)> = Vec::with_capacity(keys.len());
        for physical in keys {
            match self.read_meta(&physical) {
                Some(meta) if !meta.is_live(now) => doomed.push(physical),
                Some(meta) => survivors.push((meta.timestamp, physical)),
                None => survivors.push((0, physical)),
            }
        }
        let expired = doomed.len();

        survivors.sort_by_key(|(timestamp, _)| *timestamp);
        let excess = survivors.len().saturating_sub(self.max_size);
        doomed.extend(survivors.into_iter().take(excess).map(|(_, physical)| physical));

        let removed = self.remove_batch(&doomed);
        debug!(
            namespace = %self.namespace,
            expired,
            trimmed = excess,
            removed,
            "durable cleanup finished"
        );
    }

    fn try_set<T: Serialize + ?Sized>(
        &self,
        key: &str,
        value: &T,
        ttl: Option<u64>,
    ) -> Result<(), MediumError> {
        let entry = Entry::new(value, self.clock.now_ms(), ttl.unwrap_or(self.default_ttl));
        let raw = serde_json::to_string(&entry)?;
        self.medium.set(&self.physical_key(key), &raw)
    }

    /// Raw entry text if the key holds a live entry. Dead entries are deleted.
    fn read_live(&self, key: &str) -> Option<String> {
        let physical = self.physical_key(key);
        let raw = match self.medium.get(&physical) {
            Ok(raw) => raw?,
            Err(e) => {
                warn!(namespace = %self.namespace, key = %key, error = %e, "durable read failed");
                return None;
            }
        };

        let meta: EntryMeta = serde_json::from_str(&raw).ok()?;
        if !meta.is_live(self.clock.now_ms()) {
            self.remove_physical(&physical);
            return None;
        }
        Some(raw)
    }

    fn read_meta(&self, physical: &str) -> Option<EntryMeta> {
        let raw = self.medium.get(physical).ok().flatten()?;
        serde_json::from_str(&raw).ok()
    }

    fn remove_physical(&self, physical: &str) -> bool {
        match self.medium.remove(physical) {
            Ok(existed) => existed,
            Err(e) => {
                warn!(namespace = %self.namespace, key = %physical, error = %e, "durable delete failed");
                false
            }
        }
    }

    fn remove_batch(&self, physical: &[String]) -> usize {
        if physical.is_empty() {
            return 0;
        }
        match self.medium.remove_many(physical) {
            Ok(removed) => removed,
            Err(e) => {
                warn!(namespace = %self.namespace, count = physical.len(), error = %e, "durable batch delete failed");
                0
            }
        }
    }

    fn namespaced_keys(&self) -> Result<Vec<String>, MediumError> {
        let prefix = format!("{}:", self.namespace);
        Ok(self
            .medium
            .keys()?
            .into_iter()
            .filter(|k| k.starts_with(&prefix))
            .collect())
    }

    fn physical_key(&self, key: &str) -> String {
        format!("{}:{}", self.namespace, key)
    }
}
