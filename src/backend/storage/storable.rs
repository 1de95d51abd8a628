// src/backend/storage/storable.rs
use crate::storage::store::StorageError;
use serde::{de::DeserializeOwned, Serialize};

/// Wraps any serde type so it can be persisted as CBOR bytes.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Cbor<T>(pub T)
where
    T: Serialize + DeserializeOwned;

impl<T> Cbor<T>
where
    T: Serialize + DeserializeOwned,
{
    pub fn to_bytes(&self) -> Result<Vec<u8>, StorageError> {
        let mut writer = vec![];
        ciborium::ser::into_writer(&self.0, &mut writer)
            .map_err(|e| StorageError::Encode(e.to_string()))?;
        Ok(writer)
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, StorageError> {
        let value: T =
            ciborium::de::from_reader(bytes).map_err(|e| StorageError::Decode(e.to_string()))?;
        Ok(Cbor(value))
    }
}
