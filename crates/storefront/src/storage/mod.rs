//! Persistent key-value storage for cart state.
//!
//! The cart is snapshotted into a flat, string-keyed store the same way a
//! browser would use local storage: every value is a string (usually JSON),
//! reads are synchronous, and a missing key is not an error.
//!
//! # Backends
//!
//! - [`MemoryStore`] - process-local map, used by tests
//! - [`FileStore`] - a single JSON file, durable across restarts
//!
//! Callers depend on the [`KeyValueStore`] trait so the backend can be
//! injected (see [`crate::cart::CartRepository`]).

mod file;
mod memory;

use std::fmt;
use std::io;

use thiserror::Error;

pub use file::FileStore;
pub use memory::MemoryStore;

/// Errors raised by a storage backend.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Reading or writing the backing file failed.
    #[error("storage I/O error: {0}")]
    Io(#[from] io::Error),

    /// The store contents could not be encoded.
    #[error("storage serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// A single mutation applied by [`KeyValueStore::write_batch`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreWrite {
    /// Set `key` to `value`, replacing any previous value.
    Set { key: String, value: String },
    /// Delete `key` if present.
    Remove { key: String },
}

impl StoreWrite {
    /// Build a `Set` write.
    pub fn set(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self::Set {
            key: key.into(),
            value: value.into(),
        }
    }

    /// Build a `Remove` write.
    pub fn remove(key: impl Into<String>) -> Self {
        Self::Remove { key: key.into() }
    }
}

/// Synchronous string-keyed storage.
///
/// Implementations use interior mutability so a store can be shared
/// behind an `Arc` between the cart and checkout.
pub trait KeyValueStore: fmt::Debug + Send + Sync {
    /// Get the value stored under `key`, if any.
    fn get(&self, key: &str) -> Option<String>;

    /// Store `value` under `key`.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the backend cannot persist the write.
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Remove `key`. Removing a missing key is not an error.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the backend cannot persist the removal.
    fn remove(&self, key: &str) -> Result<(), StorageError>;

    /// Apply several writes as one unit.
    ///
    /// The default applies them one at a time; backends that can commit
    /// atomically should override it.
    ///
    /// # Errors
    ///
    /// Returns the first `StorageError` encountered.
    fn write_batch(&self, writes: Vec<StoreWrite>) -> Result<(), StorageError> {
        for write in writes {
            match write {
                StoreWrite::Set { key, value } => self.set(&key, &value)?,
                StoreWrite::Remove { key } => self.remove(&key)?,
            }
        }
        Ok(())
    }
}

impl<S: KeyValueStore + ?Sized> KeyValueStore for std::sync::Arc<S> {
    fn get(&self, key: &str) -> Option<String> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        (**self).set(key, value)
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        (**self).remove(key)
    }

    fn write_batch(&self, writes: Vec<StoreWrite>) -> Result<(), StorageError> {
        (**self).write_batch(writes)
    }
}
