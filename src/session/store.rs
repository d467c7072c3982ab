use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use serde_json::{Map, Value};

use crate::errors::StoreError;

/// String key/value storage for the persisted session (token, expiry, profile).
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;
    fn set(&self, key: &str, value: &str) -> Result<(), StoreError>;
    fn remove(&self, key: &str) -> Result<(), StoreError>;
}

#[derive(Debug, Default)]
pub struct MemoryStore {
    inner: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        let inner = self.inner.lock().map_err(|_| StoreError::Poisoned)?;
        Ok(inner.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        let mut inner = self.inner.lock().map_err(|_| StoreError::Poisoned)?;
        inner.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        let mut inner = self.inner.lock().map_err(|_| StoreError::Poisoned)?;
        inner.remove(key);
        Ok(())
    }
}

/// JSON object on disk, rewritten in full on every mutation.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    inner: Mutex<Map<String, Value>>,
}

impl FileStore {
    /// Open (or lazily create) the store at `path`.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let path = path.as_ref().to_path_buf();
        let map = if path.exists() {
            let raw = std::fs::read(&path).map_err(|source| StoreError::Io {
                path: path.display().to_string(),
                source,
            })?;
            if raw.is_empty() {
                Map::new()
            } else {
                serde_json::from_slice::<Map<String, Value>>(&raw)?
            }
        } else {
            Map::new()
        };

        Ok(Self {
            path,
            inner: Mutex::new(map),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn flush(&self, map: &Map<String, Value>) -> Result<(), StoreError> {
        let raw = serde_json::to_vec_pretty(map)?;
        std::fs::write(&self.path, raw).map_err(|source| StoreError::Io {
            path: self.path.display().to_string(),
            source,
        })
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        let inner = self.inner.lock().map_err(|_| StoreError::Poisoned)?;
        Ok(inner.get(key).and_then(Value::as_str).map(str::to_string))
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        let mut inner = self.inner.lock().map_err(|_| StoreError::Poisoned)?;
        inner.insert(key.to_string(), Value::String(value.to_string()));
        self.flush(&inner)
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        let mut inner = self.inner.lock().map_err(|_| StoreError::Poisoned)?;
        if inner.remove(key).is_some() {
            self.flush(&inner)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scratch_path(name: &str) -> PathBuf {
        let nanos = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap()
            .as_nanos();
        std::env::temp_dir().join(format!("{name}-{}-{nanos}.json", std::process::id()))
    }

    #[test]
    fn memory_store_set_get_remove() {
        let store = MemoryStore::new();
        store.set("auth_token", "abc").unwrap();
        assert_eq!(store.get("auth_token").unwrap().as_deref(), Some("abc"));
        store.remove("auth_token").unwrap();
        assert_eq!(store.get("auth_token").unwrap(), None);
    }

    #[test]
    fn file_store_survives_reopen() {
        let path = scratch_path("session-store");

        {
            let store = FileStore::open(&path).unwrap();
            store.set("auth_token", "abc").unwrap();
            store.set("refresh_token", "def").unwrap();
            store.remove("refresh_token").unwrap();
        }

        let reopened = FileStore::open(&path).unwrap();
        assert_eq!(reopened.get("auth_token").unwrap().as_deref(), Some("abc"));
        assert_eq!(reopened.get("refresh_token").unwrap(), None);

        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn corrupt_file_is_an_error() {
        let path = scratch_path("session-corrupt");
        std::fs::write(&path, b"not json").unwrap();

        assert!(matches!(FileStore::open(&path), Err(StoreError::Corrupt(_))));

        std::fs::remove_file(&path).ok();
    }
}
