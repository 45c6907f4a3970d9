use std::collections::{BTreeMap, HashMap};
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use thiserror::Error;
use tracing::{debug, info, warn};

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("I/O error on {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("Store lock poisoned")]
    Poisoned,
}

/// Named string entries, the shape of browser local storage.
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;
}

/// Keeps every entry in one JSON object file. Writes go through a temp file
/// and a rename so readers never see a half-written store.
pub struct FileKeyValueStore {
    path: PathBuf,
}

impl FileKeyValueStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        info!("Using key/value store at {}", path.display());
        Self { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn io_error(&self, source: std::io::Error) -> StorageError {
        StorageError::Io {
            path: self.path.display().to_string(),
            source,
        }
    }

    fn read_entries(&self) -> Result<BTreeMap<String, String>, StorageError> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!("Store file {} does not exist yet", self.path.display());
                return Ok(BTreeMap::new());
            }
            Err(e) => return Err(self.io_error(e)),
        };

        if raw.trim().is_empty() {
            return Ok(BTreeMap::new());
        }
        Ok(serde_json::from_str(&raw)?)
    }

    fn write_entries(&self, entries: &BTreeMap<String, String>) -> Result<(), StorageError> {
        let data = serde_json::to_vec_pretty(entries)?;
        let tmp_path = self.path.with_extension("tmp");

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(|e| self.io_error(e))?;
            }
        }

        let mut file = File::create(&tmp_path).map_err(|e| self.io_error(e))?;
        file.write_all(&data).map_err(|e| self.io_error(e))?;
        file.sync_all().map_err(|e| self.io_error(e))?;
        fs::rename(&tmp_path, &self.path).map_err(|e| self.io_error(e))?;
        Ok(())
    }
}

impl KeyValueStore for FileKeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.read_entries()?.remove(key))
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        // A store file that is not valid JSON is replaced; I/O failures are not.
        let mut entries = match self.read_entries() {
            Ok(entries) => entries,
            Err(StorageError::Serialization(e)) => {
                warn!("Discarding malformed store {}: {}", self.path.display(), e);
                BTreeMap::new()
            }
            Err(e) => return Err(e),
        };
        entries.insert(key.to_string(), value.to_string());
        self.write_entries(&entries)?;
        debug!("Stored key '{}' ({} bytes)", key, value.len());
        Ok(())
    }
}

/// Process-local store used by tests and dry runs.
#[derive(Default)]
pub struct MemoryKeyValueStore {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryKeyValueStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds a raw value, e.g. to simulate corrupted content.
    pub fn with_entry(self, key: &str, value: &str) -> Self {
        if let Ok(mut entries) = self.entries.lock() {
            entries.insert(key.to_string(), value.to_string());
        }
        self
    }
}

impl KeyValueStore for MemoryKeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let entries = self.entries.lock().map_err(|_| StorageError::Poisoned)?;
        Ok(entries.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let mut entries = self.entries.lock().map_err(|_| StorageError::Poisoned)?;
        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_store_get_set() {
        let store = MemoryKeyValueStore::new();
        assert_eq!(store.get("basket").unwrap(), None);

        store.set("basket", "[]").unwrap();
        assert_eq!(store.get("basket").unwrap().as_deref(), Some("[]"));
    }

    #[test]
    fn test_file_store_keeps_other_keys() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileKeyValueStore::new(dir.path().join("store.json"));

        store.set("basket", "[]").unwrap();
        store.set("theme", "dark").unwrap();

        assert_eq!(store.get("basket").unwrap().as_deref(), Some("[]"));
        assert_eq!(store.get("theme").unwrap().as_deref(), Some("dark"));
        assert!(!dir.path().join("store.tmp").exists());
    }

    #[test]
    fn test_file_store_missing_file_reads_as_absent() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileKeyValueStore::new(dir.path().join("nested").join("store.json"));

        assert_eq!(store.get("basket").unwrap(), None);
        store.set("basket", "[]").unwrap();
        assert!(store.path().exists());
    }

    #[test]
    fn test_file_store_set_fails_on_unreadable_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("store.json");
        fs::create_dir(&path).unwrap();
        let store = FileKeyValueStore::new(&path);

        assert!(matches!(store.set("basket", "[]"), Err(StorageError::Io { .. })));
        assert!(path.is_dir());
        assert!(!dir.path().join("store.tmp").exists());
    }

    #[test]
    fn test_file_store_overwrites_corrupt_file_on_set() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("store.json");
        fs::write(&path, "{not json").unwrap();
        let store = FileKeyValueStore::new(&path);

        assert!(store.get("basket").is_err());
        store.set("basket", "[]").unwrap();
        assert_eq!(store.get("basket").unwrap().as_deref(), Some("[]"));
    }
}
