// src/backend/storage/file_store.rs
use crate::storage::storable::Cbor;
use crate::storage::store::{KeyValueStore, StorageError};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

type Entries = BTreeMap<String, String>;

/// Durable store: the whole key map lives in one CBOR file that is replaced
/// atomically (temp file + rename) on every write batch.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    entries: Mutex<Entries>,
}

impl FileStore {
    /// Opens `path`, starting empty when the file does not exist yet.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StorageError> {
        let path = path.into();
        let entries = match fs::read(&path) {
            Ok(bytes) if bytes.is_empty() => Entries::new(),
            Ok(bytes) => Cbor::<Entries>::from_bytes(&bytes)?.0,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Entries::new(),
            Err(e) => return Err(e.into()),
        };
        tracing::debug!(path = %path.display(), keys = entries.len(), "opened file store");
        Ok(Self {
            path,
            entries: Mutex::new(entries),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn lock(&self) -> Result<MutexGuard<'_, Entries>, StorageError> {
        self.entries
            .lock()
            .map_err(|_| StorageError::Unavailable("file store lock poisoned".to_string()))
    }

    /// Applies `change` to a copy of the map, persists it, then publishes it.
    /// A failed flush leaves both the file and the in-memory map untouched.
    fn commit(&self, change: impl FnOnce(&mut Entries)) -> Result<(), StorageError> {
        let mut entries = self.lock()?;
        let mut next = entries.clone();
        change(&mut next);
        let next = Cbor(next);
        self.flush(&next.to_bytes()?)?;
        *entries = next.0;
        Ok(())
    }

    fn flush(&self, bytes: &[u8]) -> Result<(), StorageError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let tmp = self.path.with_extension("tmp");
        fs::write(&tmp, bytes)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.lock()?.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.commit(|m| {
            m.insert(key.to_string(), value.to_string());
        })
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        self.commit(|m| {
            m.remove(key);
        })
    }

    fn set_many(&self, entries: &[(&str, &str)]) -> Result<(), StorageError> {
        self.commit(|m| {
            for (key, value) in entries {
                m.insert((*key).to_string(), (*value).to_string());
            }
        })
    }
}
