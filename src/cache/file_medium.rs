//! File Medium Module
//!
//! Durable medium: the whole key/value map lives in one JSON document on
//! disk and survives restarts.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use directories::ProjectDirs;
use tracing::warn;

use crate::cache::medium::{check_quota, StorageMedium, DEFAULT_QUOTA_BYTES};
use crate::error::MediumError;

// == File Medium ==
/// A JSON file holding a flat string map.
///
/// Reads are served from an in-memory copy loaded at open time. Every
/// mutation rewrites the file through a temporary sibling and a rename, so a
/// crash mid-write leaves the previous document intact. `remove_many`
/// rewrites it once per batch.
#[derive(Debug)]
pub struct FileMedium {
    path: PathBuf,
    items: RwLock<HashMap<String, String>>,
    quota: Option<usize>,
}

impl FileMedium {
    // == Open ==
    /// Opens (or creates) the document at `path` with the default 5 MiB quota.
    ///
    /// Parent directories are created as needed. A document that exists but
    /// cannot be parsed is logged and replaced by an empty map on the next
    /// write.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, MediumError> {
        let path = path.as_ref().to_path_buf();
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let items = if path.exists() {
            let content = fs::read_to_string(&path)?;
            match serde_json::from_str(&content) {
                Ok(items) => items,
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "unreadable cache file, starting empty");
                    HashMap::new()
                }
            }
        } else {
            HashMap::new()
        };

        Ok(Self {
            path,
            items: RwLock::new(items),
            quota: Some(DEFAULT_QUOTA_BYTES),
        })
    }

    /// Replaces the byte quota (None = unlimited).
    pub fn with_quota(mut self, quota: Option<usize>) -> Self {
        self.quota = quota;
        self
    }

    // == Default Path ==
    /// Per-user data location, e.g. `~/.local/share/tiered_cache/persistent.json`
    /// on Linux. Returns None when no home directory can be determined.
    pub fn default_path() -> Option<PathBuf> {
        let dirs = ProjectDirs::from("", "", "tiered_cache")?;
        Some(dirs.data_dir().join("persistent.json"))
    }

    /// Location of the backing document.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn persist(&self, items: &HashMap<String, String>) -> Result<(), MediumError> {
        let json = serde_json::to_string(items)?;
        let tmp = self.path.with_extension("tmp");
        fs::write(&tmp, json)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, HashMap<String, String>>, MediumError> {
        self.items
            .read()
            .map_err(|_| MediumError::Unavailable("file medium lock poisoned".into()))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, HashMap<String, String>>, MediumError> {
        self.items
            .write()
            .map_err(|_| MediumError::Unavailable("file medium lock poisoned".into()))
    }
}

impl StorageMedium for FileMedium {
    fn get(&self, key: &str) -> Result<Option<String>, MediumError> {
        Ok(self.read()?.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), MediumError> {
        let mut items = self.write()?;
        check_quota(&items, self.quota, key, value)?;

        let previous = items.insert(key.to_string(), value.to_string());
        if let Err(e) = self.persist(&items) {
            // Keep memory and disk in agreement
            match previous {
                Some(old) => items.insert(key.to_string(), old),
                None => items.remove(key),
            };
            return Err(e);
        }
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<bool, MediumError> {
        let mut items = self.write()?;
        let Some(previous) = items.remove(key) else {
            return Ok(false);
        };

        if let Err(e) = self.persist(&items) {
            items.insert(key.to_string(), previous);
            return Err(e);
        }
        Ok(true)
    }

    fn remove_many(&self, keys: &[String]) -> Result<usize, MediumError> {
        let mut items = self.write()?;
        let removed: Vec<(String, String)> = keys
            .iter()
            .filter_map(|key| items.remove_entry(key.as_str()))
            .collect();
        if removed.is_empty() {
            return Ok(0);
        }

        let count = removed.len();
        if let Err(e) = self.persist(&items) {
            items.extend(removed);
            return Err(e);
        }
        Ok(count)
    }

    fn keys(&self) -> Result<Vec<String>, MediumError> {
        Ok(self.read()?.keys().cloned().collect())
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn create_test_medium() -> (FileMedium, TempDir) {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let medium = FileMedium::open(temp_dir.path().join("cache.json"))
            .expect("Failed to open medium");
        (medium, temp_dir)
    }

    #[test]
    fn test_set_writes_document() {
        let (medium, _temp_dir) = create_test_medium();

        medium.set("ns:key", "value").unwrap();

        let content = fs::read_to_string(medium.path()).expect("Should read file");
        assert!(content.contains("ns:key"));
        assert!(content.contains("value"));
    }

    #[test]
    fn test_contents_survive_reopen() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("cache.json");

        {
            let medium = FileMedium::open(&path).unwrap();
            medium.set("a", "1").unwrap();
            medium.set("b", "2").unwrap();
            assert!(medium.remove("b").unwrap());
        }

        let reopened = FileMedium::open(&path).unwrap();
        assert_eq!(reopened.get("a").unwrap(), Some("1".to_string()));
        assert_eq!(reopened.get("b").unwrap(), None);
    }

    #[test]
    fn test_open_creates_missing_directories() {
        let temp_dir = TempDir::new().unwrap();
        let nested = temp_dir.path().join("nested").join("dir").join("cache.json");

        let medium = FileMedium::open(&nested).unwrap();
        medium.set("k", "v").unwrap();

        assert!(nested.exists());
    }

    #[test]
    fn test_corrupt_document_starts_empty() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("cache.json");
        fs::write(&path, "not json").unwrap();

        let medium = FileMedium::open(&path).unwrap();
        assert!(medium.keys().unwrap().is_empty());

        medium.set("k", "v").unwrap();
        assert_eq!(FileMedium::open(&path).unwrap().get("k").unwrap(), Some("v".to_string()));
    }

    #[test]
    fn test_quota_exceeded_leaves_file_untouched() {
        let (medium, _temp_dir) = create_test_medium();
        let medium = medium.with_quota(Some(8));

        medium.set("k", "1234").unwrap();
        assert!(matches!(
            medium.set("j", "1234"),
            Err(MediumError::QuotaExceeded { .. })
        ));
        assert_eq!(medium.keys().unwrap(), vec!["k".to_string()]);
    }

    #[test]
    fn test_remove_many_persists_batch() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("cache.json");
        let medium = FileMedium::open(&path).unwrap();
        for key in ["a", "b", "c"] {
            medium.set(key, "1").unwrap();
        }

        let batch = vec!["a".to_string(), "b".to_string(), "missing".to_string()];
        assert_eq!(medium.remove_many(&batch).unwrap(), 2);
        assert_eq!(medium.remove_many(&batch).unwrap(), 0);

        let reopened = FileMedium::open(&path).unwrap();
        assert_eq!(reopened.keys().unwrap(), vec!["c".to_string()]);
    }

    #[test]
    fn test_remove_many_rolls_back_when_write_fails() {
        let temp_dir = TempDir::new().unwrap();
        let dir = temp_dir.path().join("gone");
        let medium = FileMedium::open(dir.join("cache.json")).unwrap();
        medium.set("a", "1").unwrap();
        medium.set("b", "2").unwrap();

        fs::remove_dir_all(&dir).unwrap();

        let batch = vec!["a".to_string(), "b".to_string()];
        assert!(medium.remove_many(&batch).is_err());
        let mut keys = medium.keys().unwrap();
        keys.sort();
        assert_eq!(keys, vec!["a".to_string(), "b".to_string()]);
    }

    #[test]
    fn test_remove_missing_key() {
        let (medium, _temp_dir) = create_test_medium();
        assert!(!medium.remove("missing").unwrap());
    }

    #[test]
    fn test_default_path_names_project() {
        if let Some(path) = FileMedium::default_path() {
            assert!(path.to_string_lossy().contains("tiered_cache"));
        }
        // Passes when no home directory is available (e.g. in CI)
    }
}
