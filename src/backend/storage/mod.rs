// src/backend/storage/mod.rs
// Local persistence: a fallible key-value port, its fail-soft wrapper and the content cache.

pub mod cache;
pub mod file_store;
pub mod keys;
pub mod local;
pub mod storable;
pub mod store;

// Re-export key storage types for easier access
pub use cache::{CacheRecord, ContentCache};
pub use file_store::FileStore;
pub use local::LocalStore;
pub use storable::Cbor;
pub use store::{KeyValueStore, MemoryStore, StorageError};
