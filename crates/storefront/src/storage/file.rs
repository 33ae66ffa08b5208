//! File-backed store.
//!
//! All keys live in one JSON object on disk. The whole object is rewritten
//! on every write through a temporary file and a rename, so a crash never
//! leaves a half-written store behind.

use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{PoisonError, RwLock};

use super::{KeyValueStore, StorageError, StoreWrite};

/// A [`KeyValueStore`] persisted to a single JSON file.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    entries: RwLock<BTreeMap<String, String>>,
}

impl FileStore {
    /// Open the store at `path`.
    ///
    /// A missing file yields an empty store; the file is created on the
    /// first write. A file that is not a JSON object of strings is logged
    /// and treated as empty, and is overwritten on the next write.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Io` if the file exists but cannot be read.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StorageError> {
        let path = path.into();
        let entries = match fs::read_to_string(&path) {
            Ok(contents) => serde_json::from_str(&contents).unwrap_or_else(|e| {
                tracing::warn!(path = %path.display(), error = %e, "Discarding unreadable store file");
                BTreeMap::new()
            }),
            Err(e) if e.kind() == io::ErrorKind::NotFound => BTreeMap::new(),
            Err(e) => return Err(e.into()),
        };

        tracing::debug!(path = %path.display(), keys = entries.len(), "Opened file store");

        Ok(Self {
            path,
            entries: RwLock::new(entries),
        })
    }

    /// Path of the backing file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Apply `f` to the entries and flush the result to disk.
    ///
    /// The in-memory map is only replaced once the file write succeeds.
    fn commit(
        &self,
        f: impl FnOnce(&mut BTreeMap<String, String>),
    ) -> Result<(), StorageError> {
        let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);
        let mut next = entries.clone();
        f(&mut next);
        self.flush(&next)?;
        *entries = next;
        Ok(())
    }

    #[tracing::instrument(skip(self, entries), fields(path = %self.path.display(), keys = entries.len()))]
    fn flush(&self, entries: &BTreeMap<String, String>) -> Result<(), StorageError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }

        let json = serde_json::to_string_pretty(entries)?;
        let tmp = self.path.with_extension("tmp");
        fs::write(&tmp, json)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(key)
            .cloned()
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.commit(|entries| {
            entries.insert(key.to_owned(), value.to_owned());
        })
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        self.commit(|entries| {
            entries.remove(key);
        })
    }

    fn write_batch(&self, writes: Vec<StoreWrite>) -> Result<(), StorageError> {
        self.commit(|entries| {
            for write in writes {
                match write {
                    StoreWrite::Set { key, value } => {
                        entries.insert(key, value);
                    }
                    StoreWrite::Remove { key } => {
                        entries.remove(&key);
                    }
                }
            }
        })
    }
}
