//! Test doubles shared by the cache unit tests.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use crate::cache::{MemoryMedium, StorageMedium};
use crate::error::MediumError;

// == Flaky Medium ==
/// An in-memory medium that counts every call and can be told to fail.
#[derive(Debug, Default)]
pub struct FlakyMedium {
    inner: MemoryMedium,
    pub fail_get: AtomicBool,
    pub fail_set: AtomicBool,
    pub fail_remove: AtomicBool,
    pub fail_keys: AtomicBool,
    pub gets: AtomicUsize,
    pub sets: AtomicUsize,
    pub removes: AtomicUsize,
    pub batch_removes: AtomicUsize,
    pub key_scans: AtomicUsize,
}

impl FlakyMedium {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every operation fail.
    pub fn fail_everything(&self) {
        self.fail_get.store(true, Ordering::SeqCst);
        self.fail_set.store(true, Ordering::SeqCst);
        self.fail_remove.store(true, Ordering::SeqCst);
        self.fail_keys.store(true, Ordering::SeqCst);
    }

    /// Number of calls of any kind seen so far.
    pub fn accesses(&self) -> usize {
        self.gets.load(Ordering::SeqCst)
            + self.sets.load(Ordering::SeqCst)
            + self.removes.load(Ordering::SeqCst)
            + self.batch_removes.load(Ordering::SeqCst)
            + self.key_scans.load(Ordering::SeqCst)
    }

    /// Writes a raw value straight into the backing map, bypassing failures.
    pub fn seed(&self, key: &str, raw: &str) {
        self.inner.set(key, raw).expect("seeding the backing medium");
    }

    fn check(flag: &AtomicBool, what: &str) -> Result<(), MediumError> {
        if flag.load(Ordering::SeqCst) {
            Err(MediumError::Unavailable(format!("{what} disabled")))
        } else {
            Ok(())
        }
    }
}

impl StorageMedium for FlakyMedium {
    fn get(&self, key: &str) -> Result<Option<String>, MediumError> {
        self.gets.fetch_add(1, Ordering::SeqCst);
        Self::check(&self.fail_get, "get")?;
        self.inner.get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), MediumError> {
        self.sets.fetch_add(1, Ordering::SeqCst);
        Self::check(&self.fail_set, "set")?;
        self.inner.set(key, value)
    }

    fn remove(&self, key: &str) -> Result<bool, MediumError> {
        self.removes.fetch_add(1, Ordering::SeqCst);
        Self::check(&self.fail_remove, "remove")?;
        self.inner.remove(key)
    }

    fn remove_many(&self, keys: &[String]) -> Result<usize, MediumError> {
        self.batch_removes.fetch_add(1, Ordering::SeqCst);
        Self::check(&self.fail_remove, "remove")?;
        self.inner.remove_many(keys)
    }

    fn keys(&self) -> Result<Vec<String>, MediumError> {
        self.key_scans.fetch_add(1, Ordering::SeqCst);
        Self::check(&self.fail_keys, "keys")?;
        self.inner.keys()
    }
}
