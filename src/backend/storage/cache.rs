// src/backend/storage/cache.rs
use crate::models::common::TimestampMs;
use crate::storage::keys;
use crate::storage::local::LocalStore;
use crate::utils::time::Clock;
use std::sync::Arc;

/// Last-known-good content as persisted on this device.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CacheRecord {
    pub raw: String,
    pub etag: Option<String>,
    pub last_fetched_at: Option<TimestampMs>,
}

/// Content cache over the durable store.
#[derive(Clone)]
pub struct ContentCache {
    store: LocalStore,
    clock: Arc<dyn Clock>,
}

impl ContentCache {
    pub fn new(store: LocalStore, clock: Arc<dyn Clock>) -> Self {
        Self { store, clock }
    }

    pub fn read_raw(&self) -> Option<String> {
        self.store.read(keys::CONTENT_DATA)
    }

    /// Writes the raw JSON and stamps the last-fetched time in one batch.
    pub fn write_raw(&self, raw: &str) {
        let now = self.clock.now_ms().to_string();
        self.store.write_many(&[
            (keys::CONTENT_DATA, raw),
            (keys::CONTENT_LAST_FETCHED_AT, now.as_str()),
        ]);
    }

    pub fn read_etag(&self) -> Option<String> {
        self.store.read(keys::CONTENT_ETAG).filter(|e| !e.is_empty())
    }

    pub fn write_etag(&self, etag: &str) {
        self.store.write(keys::CONTENT_ETAG, etag);
    }

    pub fn last_fetched_at(&self) -> Option<TimestampMs> {
        self.store
            .read(keys::CONTENT_LAST_FETCHED_AT)
            .and_then(|v| v.parse().ok())
    }

    pub fn read_record(&self) -> Option<CacheRecord> {
        let raw = self.read_raw()?;
        Some(CacheRecord {
            raw,
            etag: self.read_etag(),
            last_fetched_at: self.last_fetched_at(),
        })
    }
}
