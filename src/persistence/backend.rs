//! Blob store trait

use crate::error::StoreError;

/// Synchronous key-value blob store.
///
/// Implementations hold one string blob per storage key. `write` overwrites
/// whatever was stored under the key before, so repeating it is idempotent.
pub trait BlobStore: Send {
    /// Read the blob stored under `key`, `None` if nothing was written
    fn read(&self, key: &str) -> Result<Option<String>, StoreError>;

    /// Write `blob` under `key`, replacing any previous value
    fn write(&mut self, key: &str, blob: &str) -> Result<(), StoreError>;

    /// Remove the blob under `key`, returning whether one existed
    fn remove(&mut self, key: &str) -> Result<bool, StoreError>;
}

impl<S: BlobStore + ?Sized> BlobStore for Box<S> {
    fn read(&self, key: &str) -> Result<Option<String>, StoreError> {
        (**self).read(key)
    }

    fn write(&mut self, key: &str, blob: &str) -> Result<(), StoreError> {
        (**self).write(key, blob)
    }

    fn remove(&mut self, key: &str) -> Result<bool, StoreError> {
        (**self).remove(key)
    }
}
