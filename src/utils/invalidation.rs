//! Invalidation Module
//!
//! Drops cached keys together with everything derived from them.

use std::collections::{HashMap, HashSet, VecDeque};

use serde::{de::DeserializeOwned, Serialize};
use tracing::debug;

use crate::cache::{CacheManager, StorageMedium};

// == Invalidation Chain ==
/// Records which cached keys are derived from which.
///
/// Invalidating a key deletes it from every tier, then does the same for
/// each key registered as its dependent, transitively. Cycles are fine: each
/// key is visited once.
#[derive(Debug, Default, Clone)]
pub struct InvalidationChain {
    dependents: HashMap<String, HashSet<String>>,
}

impl InvalidationChain {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declares that `dependent` must be dropped whenever `source` is.
    pub fn link(&mut self, source: impl Into<String>, dependent: impl Into<String>) -> &mut Self {
        self.dependents
            .entry(source.into())
            .or_default()
            .insert(dependent.into());
        self
    }

    /// Removes a single link. Returns true if it existed.
    pub fn unlink(&mut self, source: &str, dependent: &str) -> bool {
        let Some(set) = self.dependents.get_mut(source) else {
            return false;
        };
        let removed = set.remove(dependent);
        if set.is_empty() {
            self.dependents.remove(source);
        }
        removed
    }

    /// Every key reached from `key`, itself included, in visiting order.
    pub fn closure(&self, key: &str) -> Vec<String> {
        let mut seen = HashSet::new();
        let mut order = Vec::new();
        let mut queue = VecDeque::from([key.to_string()]);

        while let Some(current) = queue.pop_front() {
            if !seen.insert(current.clone()) {
                continue;
            }
            if let Some(next) = self.dependents.get(&current) {
                queue.extend(next.iter().filter(|k| !seen.contains(*k)).cloned());
            }
            order.push(current);
        }
        order
    }

    // == Invalidate ==
    /// Deletes `key` and all its dependents from every tier.
    ///
    /// Returns the keys that were actually present somewhere.
    pub fn invalidate<T, S, P>(&self, cache: &mut CacheManager<T, S, P>, key: &str) -> Vec<String>
    where
        T: Clone + Serialize + DeserializeOwned,
        S: StorageMedium,
        P: StorageMedium,
    {
        let removed: Vec<String> = self
            .closure(key)
            .into_iter()
            .filter(|k| cache.smart().delete(k))
            .collect();
        debug!(key = %key, removed = removed.len(), "invalidation chain applied");
        removed
    }
}

// == Invalidate Prefix ==
/// Deletes every key starting with `prefix` from all three tiers.
///
/// Returns the number of distinct keys removed.
pub fn invalidate_prefix<T, S, P>(cache: &mut CacheManager<T, S, P>, prefix: &str) -> usize
where
    T: Clone + Serialize + DeserializeOwned,
    S: StorageMedium,
    P: StorageMedium,
{
    let mut keys: HashSet<String> = cache.memory().keys().into_iter().collect();
    keys.extend(cache.session().keys());
    keys.extend(cache.persistent().keys());

    keys.into_iter()
        .filter(|k| k.starts_with(prefix))
        .filter(|k| cache.smart().delete(k))
        .count()
}
