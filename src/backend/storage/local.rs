// src/backend/storage/local.rs
use crate::storage::store::KeyValueStore;
use std::sync::Arc;

/// Fail-soft view over a [`KeyValueStore`]: read failures look like a
/// missing value and write failures are logged and dropped.
#[derive(Clone)]
pub struct LocalStore {
    inner: Arc<dyn KeyValueStore>,
}

impl LocalStore {
    pub fn new(inner: Arc<dyn KeyValueStore>) -> Self {
        Self { inner }
    }

    pub fn read(&self, key: &str) -> Option<String> {
        match self.inner.get(key) {
            Ok(value) => value,
            Err(e) => {
                tracing::warn!(key, error = %e, "storage read failed; treating as absent");
                None
            }
        }
    }

    pub fn write(&self, key: &str, value: &str) {
        if let Err(e) = self.inner.set(key, value) {
            tracing::warn!(key, error = %e, "storage write failed; ignoring");
        }
    }

    pub fn write_many(&self, entries: &[(&str, &str)]) {
        if let Err(e) = self.inner.set_many(entries) {
            tracing::warn!(keys = entries.len(), error = %e, "storage batch write failed; ignoring");
        }
    }

    pub fn remove(&self, key: &str) {
        if let Err(e) = self.inner.remove(key) {
            tracing::warn!(key, error = %e, "storage remove failed; ignoring");
        }
    }
}
