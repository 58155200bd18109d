//! Storage Medium Module
//!
//! The capability interface the durable tiers are written against, plus the
//! in-process medium used for the session tier.

use std::collections::HashMap;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::error::MediumError;

/// Default byte quota of an in-process medium (5 MiB).
pub const DEFAULT_QUOTA_BYTES: usize = 5 * 1024 * 1024;

// == Storage Medium Trait ==
/// A flat string key/value medium with an externally imposed size limit.
///
/// Methods take `&self` so one medium can be shared by several namespaced
/// stores. Any method may fail; callers decide how to degrade.
pub trait StorageMedium: Send + Sync {
    /// Reads a raw value.
    fn get(&self, key: &str) -> Result<Option<String>, MediumError>;

    /// Writes a raw value, replacing any previous one.
    fn set(&self, key: &str, value: &str) -> Result<(), MediumError>;

    /// Removes a key. Returns true if it existed.
    fn remove(&self, key: &str) -> Result<bool, MediumError>;

    /// Removes several keys at once. Returns how many existed.
    ///
    /// Media that pay a fixed cost per mutation should override this to pay
    /// it once per batch.
    fn remove_many(&self, keys: &[String]) -> Result<usize, MediumError> {
        let mut removed = 0;
        for key in keys {
            if self.remove(key)? {
                removed += 1;
            }
        }
        Ok(removed)
    }

    /// Lists every key in the medium, whoever wrote it.
    fn keys(&self) -> Result<Vec<String>, MediumError>;
}

impl<M: StorageMedium + ?Sized> StorageMedium for Arc<M> {
    fn get(&self, key: &str) -> Result<Option<String>, MediumError> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), MediumError> {
        (**self).set(key, value)
    }

    fn remove(&self, key: &str) -> Result<bool, MediumError> {
        (**self).remove(key)
    }

    fn remove_many(&self, keys: &[String]) -> Result<usize, MediumError> {
        (**self).remove_many(keys)
    }

    fn keys(&self) -> Result<Vec<String>, MediumError> {
        (**self).keys()
    }
}

impl<M: StorageMedium + ?Sized> StorageMedium for Box<M> {
    fn get(&self, key: &str) -> Result<Option<String>, MediumError> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), MediumError> {
        (**self).set(key, value)
    }

    fn remove(&self, key: &str) -> Result<bool, MediumError> {
        (**self).remove(key)
    }

    fn remove_many(&self, keys: &[String]) -> Result<usize, MediumError> {
        (**self).remove_many(keys)
    }

    fn keys(&self) -> Result<Vec<String>, MediumError> {
        (**self).keys()
    }
}

/// Boxed medium, for hosts that pick the medium at runtime.
pub type DynMedium = Box<dyn StorageMedium>;

// == Quota Check ==
/// Fails with `QuotaExceeded` when replacing `key` by `value` would push the
/// byte total of `items` past `quota`. Sizes count key plus value bytes.
pub(crate) fn check_quota(
    items: &HashMap<String, String>,
    quota: Option<usize>,
    key: &str,
    value: &str,
) -> Result<(), MediumError> {
    let Some(quota) = quota else {
        return Ok(());
    };

    let used: usize = items
        .iter()
        .filter(|(k, _)| k.as_str() != key)
        .map(|(k, v)| k.len() + v.len())
        .sum();
    let needed = key.len() + value.len();

    if used + needed > quota {
        return Err(MediumError::QuotaExceeded {
            needed,
            available: quota.saturating_sub(used),
        });
    }
    Ok(())
}

// == Memory Medium ==
/// In-process medium whose contents live as long as the process.
///
/// Backs the session tier: it survives for the lifetime of one run and is
/// gone after a restart.
#[derive(Debug)]
pub struct MemoryMedium {
    items: RwLock<HashMap<String, String>>,
    quota: Option<usize>,
}

impl MemoryMedium {
    /// Creates an empty medium with the default 5 MiB quota.
    pub fn new() -> Self {
        Self::with_quota(Some(DEFAULT_QUOTA_BYTES))
    }

    /// Creates an empty medium with a custom byte quota (None = unlimited).
    pub fn with_quota(quota: Option<usize>) -> Self {
        Self {
            items: RwLock::new(HashMap::new()),
            quota,
        }
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, HashMap<String, String>>, MediumError> {
        self.items
            .read()
            .map_err(|_| MediumError::Unavailable("memory medium lock poisoned".into()))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, HashMap<String, String>>, MediumError> {
        self.items
            .write()
            .map_err(|_| MediumError::Unavailable("memory medium lock poisoned".into()))
    }
}

impl Default for MemoryMedium {
    fn default() -> Self {
        Self::new()
    }
}

impl StorageMedium for MemoryMedium {
    fn get(&self, key: &str) -> Result<Option<String>, MediumError> {
        Ok(self.read()?.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), MediumError> {
        let mut items = self.write()?;
        check_quota(&items, self.quota, key, value)?;
        items.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<bool, MediumError> {
        Ok(self.write()?.remove(key).is_some())
    }

    fn remove_many(&self, keys: &[String]) -> Result<usize, MediumError> {
        let mut items = self.write()?;
        Ok(keys
            .iter()
            .filter(|key| items.remove(key.as_str()).is_some())
            .count())
    }

    fn keys(&self) -> Result<Vec<String>, MediumError> {
        Ok(self.read()?.keys().cloned().collect())
    }
}
