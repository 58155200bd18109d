//! Expiry Sweep Task
//!
//! Reads already treat expired entries as absent; the sweep reclaims the
//! space of entries nobody reads again.

use std::time::Duration;

use serde::{de::DeserializeOwned, Serialize};
use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::cache::{SharedCache, StorageMedium};

/// Spawns a background task that periodically purges expired entries from
/// all three tiers.
///
/// The task takes the write lock once per run and never touches hit/miss
/// counters.
///
/// # Arguments
/// * `cache` - Shared manager
/// * `interval_secs` - Interval in seconds between sweeps
///
/// # Returns
/// A JoinHandle for the spawned task, to be aborted during shutdown.
pub fn spawn_sweep_task<T, S, P>(cache: SharedCache<T, S, P>, interval_secs: u64) -> JoinHandle<()>
where
    T: Clone + Serialize + DeserializeOwned + Send + Sync + 'static,
    S: StorageMedium + 'static,
    P: StorageMedium + 'static,
{
    let interval = Duration::from_secs(interval_secs);

    tokio::spawn(async move {
        info!("Starting expiry sweep task with interval of {} seconds", interval_secs);

        loop {
            tokio::time::sleep(interval).await;

            let report = cache.write().await.purge_expired();

            if report.total() > 0 {
                info!(
                    memory = report.memory,
                    session = report.session,
                    persistent = report.persistent,
                    "Expiry sweep removed {} entries",
                    report.total()
                );
            } else {
                debug!("Expiry sweep: no expired entries found");
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::{CacheManager, ManualClock, MemoryMedium};
    use crate::config::CacheConfig;
    use std::sync::Arc;

    fn shared_cache(clock: &ManualClock) -> SharedCache<String, MemoryMedium, MemoryMedium> {
        CacheManager::new(
            &CacheConfig::default(),
            MemoryMedium::new(),
            MemoryMedium::new(),
            Arc::new(clock.clone()),
        )
        .into_shared()
    }

    #[tokio::test]
    async fn test_sweep_removes_expired_entries() {
        let clock = ManualClock::new(0);
        let cache = shared_cache(&clock);

        {
            let mut guard = cache.write().await;
            guard.memory().set("m", "v".to_string(), Some(10));
            guard.session().set("s", &"v", Some(10));
            guard.persistent().set("p", &"v", Some(10));
        }
        clock.advance(11);

        let handle = spawn_sweep_task(Arc::clone(&cache), 1);
        tokio::time::sleep(Duration::from_millis(1500)).await;

        {
            let guard = cache.read().await;
            let stats = guard.stats();
            assert_eq!(stats.memory.size, 0);
            assert_eq!(stats.session.size, 0);
            assert_eq!(stats.persistent.size, 0);
            assert_eq!(stats.memory.misses, 0, "Sweeping is not a read");
        }

        handle.abort();
    }

    #[tokio::test]
    async fn test_sweep_preserves_live_entries() {
        let clock = ManualClock::new(0);
        let cache = shared_cache(&clock);

        cache
            .write()
            .await
            .smart()
            .set("long_lived", "value".to_string(), Some(3_600_000));

        let handle = spawn_sweep_task(Arc::clone(&cache), 1);
        tokio::time::sleep(Duration::from_millis(1500)).await;

        assert_eq!(
            cache.write().await.memory().get("long_lived"),
            Some("value".to_string())
        );

        handle.abort();
    }

    #[tokio::test]
    async fn test_sweep_task_can_be_aborted() {
        let clock = ManualClock::new(0);
        let handle = spawn_sweep_task(shared_cache(&clock), 1);

        handle.abort();

        tokio::time::sleep(Duration::from_millis(100)).await;
        assert!(handle.is_finished(), "Task should be finished after abort");
    }
}
