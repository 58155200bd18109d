//! Debounce Module
//!
//! Coalesces bursts of writes to the same key: only the last value written
//! within the delay window reaches the cache.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use serde::{de::DeserializeOwned, Serialize};
use tokio::task::JoinHandle;
use tracing::debug;

use crate::cache::{DynMedium, SharedCache, StorageMedium};

/// A write waiting for its delay to pass.
struct Pending<T> {
    id: u64,
    value: T,
    ttl: Option<u64>,
    handle: JoinHandle<()>,
}

type PendingMap<T> = Arc<Mutex<HashMap<String, Pending<T>>>>;

// == Debounced Writer ==
/// Delays `smart.set` calls and drops all but the latest per key.
///
/// Must be used from within a tokio runtime. Writes already scheduled still
/// land if the writer is dropped.
pub struct DebouncedWriter<T, S = DynMedium, P = DynMedium> {
    cache: SharedCache<T, S, P>,
    delay: Duration,
    pending: PendingMap<T>,
    next_id: AtomicU64,
}

impl<T, S, P> DebouncedWriter<T, S, P>
where
    T: Clone + Serialize + DeserializeOwned + Send + Sync + 'static,
    S: StorageMedium + 'static,
    P: StorageMedium + 'static,
{
    /// Creates a writer that waits `delay` after the last `schedule` for a
    /// key before writing it.
    pub fn new(cache: SharedCache<T, S, P>, delay: Duration) -> Self {
        Self {
            cache,
            delay,
            pending: Arc::new(Mutex::new(HashMap::new())),
            next_id: AtomicU64::new(0),
        }
    }

    // == Schedule ==
    /// Schedules `value` to be written through the smart tier after the
    /// delay, replacing any write still pending for `key`.
    pub fn schedule(&self, key: impl Into<String>, value: T, ttl: Option<u64>) {
        let key = key.into();
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);

        // The task cannot claim its entry before it is inserted: it needs this lock.
        let mut pending = lock(&self.pending);
        let handle = tokio::spawn(fire(
            Arc::clone(&self.cache),
            Arc::clone(&self.pending),
            key.clone(),
            id,
            self.delay,
        ));

        let replaced = pending.insert(
            key,
            Pending {
                id,
                value,
                ttl,
                handle,
            },
        );
        if let Some(previous) = replaced {
            previous.handle.abort();
        }
    }

    // == Cancel ==
    /// Drops the pending write for `key`. Returns true if there was one.
    pub fn cancel(&self, key: &str) -> bool {
        match lock(&self.pending).remove(key) {
            Some(previous) => {
                previous.handle.abort();
                true
            }
            None => false,
        }
    }

    // == Flush ==
    /// Writes every pending value now. Returns how many were written.
    pub async fn flush(&self) -> usize {
        let due: Vec<(String, Pending<T>)> = lock(&self.pending).drain().collect();
        if due.is_empty() {
            return 0;
        }

        let mut cache = self.cache.write().await;
        for (key, pending) in &due {
            pending.handle.abort();
            cache.smart().set(key, pending.value.clone(), pending.ttl);
        }
        debug!(count = due.len(), "flushed debounced writes");
        due.len()
    }

    /// Number of writes waiting for their delay.
    pub fn pending(&self) -> usize {
        lock(&self.pending).len()
    }
}

async fn fire<T, S, P>(
    cache: SharedCache<T, S, P>,
    pending: PendingMap<T>,
    key: String,
    id: u64,
    delay: Duration,
) where
    T: Clone + Serialize + DeserializeOwned + Send + Sync + 'static,
    S: StorageMedium + 'static,
    P: StorageMedium + 'static,
{
    tokio::time::sleep(delay).await;

    // Claim the entry only if no newer write replaced it
    let due = {
        let mut map = lock(&pending);
        let current = map.get(&key).is_some_and(|entry| entry.id == id);
        if current {
            map.remove(&key)
        } else {
            None
        }
    };

    if let Some(entry) = due {
        cache.write().await.smart().set(&key, entry.value, entry.ttl);
        debug!(key = %key, "debounced write applied");
    }
}

fn lock<T>(pending: &Mutex<HashMap<String, Pending<T>>>) -> MutexGuard<'_, HashMap<String, Pending<T>>> {
    // A panic while holding the lock cannot leave the map half-updated
    pending.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::{CacheManager, ManualClock, MemoryMedium};
    use crate::config::CacheConfig;

    type Shared = SharedCache<String, MemoryMedium, MemoryMedium>;

    fn shared_cache() -> Shared {
        CacheManager::new(
            &CacheConfig::default(),
            MemoryMedium::new(),
            MemoryMedium::new(),
            Arc::new(ManualClock::new(0)),
        )
        .into_shared()
    }

    #[tokio::test]
    async fn test_only_last_value_is_written() {
        let cache = shared_cache();
        let writer = DebouncedWriter::new(Arc::clone(&cache), Duration::from_millis(50));

        writer.schedule("draft", "a".to_string(), None);
        writer.schedule("draft", "ab".to_string(), None);
        writer.schedule("draft", "abc".to_string(), None);
        assert_eq!(writer.pending(), 1);

        // Nothing written yet
        assert!(!cache.write().await.memory().has("draft"));

        tokio::time::sleep(Duration::from_millis(200)).await;

        assert_eq!(writer.pending(), 0);
        let mut guard = cache.write().await;
        assert_eq!(guard.memory().get("draft"), Some("abc".to_string()));
        assert_eq!(guard.session().get::<String>("draft"), Some("abc".to_string()));
    }

    #[tokio::test]
    async fn test_cancel_drops_pending_write() {
        let cache = shared_cache();
        let writer = DebouncedWriter::new(Arc::clone(&cache), Duration::from_millis(30));

        writer.schedule("k", "v".to_string(), None);
        assert!(writer.cancel("k"));
        assert!(!writer.cancel("k"));

        tokio::time::sleep(Duration::from_millis(100)).await;
        assert!(!cache.write().await.smart().has("k"));
    }

    #[tokio::test]
    async fn test_flush_writes_immediately() {
        let cache = shared_cache();
        let writer = DebouncedWriter::new(Arc::clone(&cache), Duration::from_secs(60));

        writer.schedule("a", "1".to_string(), None);
        writer.schedule("b", "2".to_string(), None);

        assert_eq!(writer.flush().await, 2);
        assert_eq!(writer.pending(), 0);
        assert_eq!(writer.flush().await, 0);

        let mut guard = cache.write().await;
        assert_eq!(guard.smart().get("a"), Some("1".to_string()));
        assert_eq!(guard.smart().get("b"), Some("2".to_string()));
    }

    #[tokio::test]
    async fn test_independent_keys_both_land() {
        let cache = shared_cache();
        let writer = DebouncedWriter::new(Arc::clone(&cache), Duration::from_millis(20));

        writer.schedule("x", "1".to_string(), None);
        writer.schedule("y", "2".to_string(), None);

        tokio::time::sleep(Duration::from_millis(150)).await;
        let mut guard = cache.write().await;
        assert!(guard.memory().has("x"));
        assert!(guard.memory().has("y"));
    }
}
