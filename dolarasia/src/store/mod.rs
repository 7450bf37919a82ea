//! Typed wrapper over a persistent key-value backend. Values are mapped to
//! and from a serialized text form with serde_json, so the backend only ever
//! sees strings.

use std::collections::HashMap;
use std::fs;
use std::io::ErrorKind;
use std::path::PathBuf;

use derive_more::{Display, Error};
use log::error;
use serde::de::DeserializeOwned;
use serde::Serialize;

#[derive(Clone, Debug, Display, Error, PartialEq, Eq)]
pub enum StoreError {
    #[display("corrupt value under key {key}")]
    Corrupt {
        #[error(not(source))]
        key: String,
    },
    #[display("storage write failed for key {key}")]
    Io {
        #[error(not(source))]
        key: String,
    },
}

pub trait StorageBackend {
    fn read(&self, key: &str) -> Option<String>;
    fn write(&mut self, key: &str, value: &str) -> Result<(), StoreError>;
    fn remove(&mut self, key: &str);
}

impl StorageBackend for Box<dyn StorageBackend + Send> {
    fn read(&self, key: &str) -> Option<String> {
        (**self).read(key)
    }

    fn write(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        (**self).write(key, value)
    }

    fn remove(&mut self, key: &str) {
        (**self).remove(key)
    }
}

#[derive(Clone, Debug)]
pub struct MemoryStorage {
    inner: HashMap<String, String>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self {
            inner: HashMap::new(),
        }
    }
}

impl Default for MemoryStorage {
    fn default() -> Self {
        Self::new()
    }
}

impl StorageBackend for MemoryStorage {
    fn read(&self, key: &str) -> Option<String> {
        self.inner.get(key).cloned()
    }

    fn write(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        self.inner.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) {
        self.inner.remove(key);
    }
}

/// One file per key under a root directory. The closest analog of a single
/// user agent's local storage: shared by every component in the process,
/// unprotected against other processes racing on the same directory.
#[derive(Clone, Debug)]
pub struct DirStorage {
    root: PathBuf,
}

impl DirStorage {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn path(&self, key: &str) -> PathBuf {
        self.root.join(format!("{key}.json"))
    }
}

impl StorageBackend for DirStorage {
    fn read(&self, key: &str) -> Option<String> {
        match fs::read_to_string(self.path(key)) {
            Ok(value) => Some(value),
            Err(err) => {
                if err.kind() != ErrorKind::NotFound {
                    error!("STORE: Failed to read key {key}: {err}");
                }
                None
            }
        }
    }

    fn write(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        if let Err(err) = fs::create_dir_all(&self.root) {
            error!("STORE: Failed to create storage root: {err}");
            return Err(StoreError::Io {
                key: key.to_string(),
            });
        }
        fs::write(self.path(key), value).map_err(|err| {
            error!("STORE: Failed to write key {key}: {err}");
            StoreError::Io {
                key: key.to_string(),
            }
        })
    }

    fn remove(&mut self, key: &str) {
        if let Err(err) = fs::remove_file(self.path(key)) {
            if err.kind() != ErrorKind::NotFound {
                error!("STORE: Failed to remove key {key}: {err}");
            }
        }
    }
}

#[derive(Clone, Debug)]
pub struct Store<B: StorageBackend> {
    backend: B,
}

impl<B: StorageBackend> Store<B> {
    pub fn new(backend: B) -> Self {
        Self { backend }
    }

    /// A missing key is `Ok(None)`; a present value that does not parse is
    /// `Corrupt`. Callers decide whether to discard or propagate.
    pub fn get<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, StoreError> {
        match self.backend.read(key) {
            Some(raw) => match serde_json::from_str(&raw) {
                Ok(value) => Ok(Some(value)),
                Err(_) => Err(StoreError::Corrupt {
                    key: key.to_string(),
                }),
            },
            None => Ok(None),
        }
    }

    pub fn set<T: Serialize>(&mut self, key: &str, value: &T) -> Result<(), StoreError> {
        let raw = serde_json::to_string(value).map_err(|_| StoreError::Io {
            key: key.to_string(),
        })?;
        self.backend.write(key, &raw)
    }

    pub fn remove(&mut self, key: &str) {
        self.backend.remove(key);
    }
}

#[cfg(test)]
mod tests {
    use super::{DirStorage, MemoryStorage, StorageBackend, Store, StoreError};

    #[test]
    fn test_that_values_roundtrip_through_memory_storage() {
        let mut store = Store::new(MemoryStorage::new());
        store.set("numbers", &vec![1, 2, 3]).unwrap();

        let numbers: Option<Vec<i64>> = store.get("numbers").unwrap();
        assert_eq!(numbers, Some(vec![1, 2, 3]));
    }

    #[test]
    fn test_that_missing_key_reads_as_none() {
        let store: Store<MemoryStorage> = Store::new(MemoryStorage::new());
        let value: Option<Vec<i64>> = store.get("missing").unwrap();
        assert_eq!(value, None);
    }

    #[test]
    fn test_that_unparseable_value_is_reported_corrupt() {
        let mut backend = MemoryStorage::new();
        backend.write("numbers", "{not json").unwrap();

        let store = Store::new(backend);
        let res = store.get::<Vec<i64>>("numbers");
        assert_eq!(
            res,
            Err(StoreError::Corrupt {
                key: "numbers".to_string()
            })
        );
    }

    #[test]
    fn test_that_removed_key_reads_as_none() {
        let mut store = Store::new(MemoryStorage::new());
        store.set("numbers", &vec![1]).unwrap();
        store.remove("numbers");

        let value: Option<Vec<i64>> = store.get("numbers").unwrap();
        assert_eq!(value, None);
    }

    #[test]
    fn test_that_dir_storage_persists_across_instances() {
        let dir = tempfile::tempdir().unwrap();

        let mut store = Store::new(DirStorage::new(dir.path()));
        store.set("numbers", &vec![5, 6]).unwrap();

        let reopened = Store::new(DirStorage::new(dir.path()));
        let numbers: Option<Vec<i64>> = reopened.get("numbers").unwrap();
        assert_eq!(numbers, Some(vec![5, 6]));
    }

    #[test]
    fn test_that_dir_storage_remove_is_silent_on_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let mut backend = DirStorage::new(dir.path());
        backend.remove("never-written");
    }
}
