//! File-backed cart storage.
//!
//! Values live in a single JSON object on disk, one string per key. The file
//! is read on open and rewritten after every change; a missing file is an
//! empty store.

use std::collections::BTreeMap;
use std::io;
use std::path::{Path, PathBuf};

use bazaar_core::{Storage, StorageError};
use thiserror::Error;

/// Errors reading the storage file.
#[derive(Debug, Error)]
pub enum FileStorageError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("{path} is not a JSON object of strings: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// [`Storage`] backed by a JSON file.
#[derive(Debug)]
pub struct FileStorage {
    path: PathBuf,
    values: BTreeMap<String, String>,
}

impl FileStorage {
    /// Open the store at `path`.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, FileStorageError> {
        let path = path.into();
        let values = match std::fs::read_to_string(&path) {
            Ok(content) => serde_json::from_str(&content).map_err(|source| {
                FileStorageError::Parse {
                    path: path.clone(),
                    source,
                }
            })?,
            Err(e) if e.kind() == io::ErrorKind::NotFound => BTreeMap::new(),
            Err(source) => return Err(FileStorageError::Read { path, source }),
        };

        Ok(Self { path, values })
    }

    /// Path of the backing file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn flush(&self) -> Result<(), StorageError> {
        let json = serde_json::to_string_pretty(&self.values).map_err(StorageError::backend)?;
        std::fs::write(&self.path, json).map_err(StorageError::backend)
    }
}

impl Storage for FileStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.values.get(key).cloned())
    }

    fn set_item(&mut self, key: &str, value: String) -> Result<(), StorageError> {
        self.values.insert(key.to_owned(), value);
        self.flush()
    }

    fn remove_item(&mut self, key: &str) -> Result<(), StorageError> {
        if self.values.remove(key).is_some() {
            self.flush()?;
        }
        Ok(())
    }
}
