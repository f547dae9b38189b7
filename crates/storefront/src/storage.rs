//! Session-backed cart storage.
//!
//! The cart lives in the visitor's session, one string value per key, the
//! same way it would in browser storage. Session access is async while
//! [`Storage`] is not, so handlers load a snapshot of the keys they need,
//! run the synchronous cart operation against it, then commit the keys that
//! changed back to the session.
//!
//! ```rust,ignore
//! let mut storage = SessionStorage::load(&session, &[CART_KEY]).await?;
//! let cart = CartStore::new(&mut storage).add_to_cart(item)?;
//! storage.commit().await?;
//! ```

use std::collections::BTreeSet;

use bazaar_core::{MemoryStorage, Storage, StorageError};
use thiserror::Error;
use tower_sessions::Session;

/// Errors raised while moving values between the session and the snapshot.
#[derive(Debug, Error)]
pub enum SessionStorageError {
    /// The session store failed.
    #[error("session error: {0}")]
    Session(#[from] tower_sessions::session::Error),

    /// The in-memory snapshot failed.
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),
}

/// A snapshot of session values implementing [`Storage`].
pub struct SessionStorage {
    session: Session,
    values: MemoryStorage,
    dirty: BTreeSet<String>,
}

impl SessionStorage {
    /// Read `keys` from the session into a new snapshot.
    ///
    /// # Errors
    ///
    /// Returns an error if the session cannot be read.
    pub async fn load(session: &Session, keys: &[&str]) -> Result<Self, SessionStorageError> {
        let mut values = MemoryStorage::new();
        for key in keys {
            if let Some(value) = session.get::<String>(key).await? {
                values.set_item(key, value)?;
            }
        }

        Ok(Self {
            session: session.clone(),
            values,
            dirty: BTreeSet::new(),
        })
    }

    /// Returns `true` if any key was written or removed since loading.
    #[must_use]
    pub fn has_changes(&self) -> bool {
        !self.dirty.is_empty()
    }

    /// Write changed keys back to the session.
    ///
    /// # Errors
    ///
    /// Returns an error if the session cannot be written.
    pub async fn commit(self) -> Result<(), SessionStorageError> {
        for key in &self.dirty {
            match self.values.get_item(key)? {
                Some(value) => self.session.insert(key, value).await?,
                None => {
                    self.session.remove::<String>(key).await?;
                }
            }
        }
        Ok(())
    }
}

impl Storage for SessionStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        self.values.get_item(key)
    }

    fn set_item(&mut self, key: &str, value: String) -> Result<(), StorageError> {
        self.dirty.insert(key.to_owned());
        self.values.set_item(key, value)
    }

    fn remove_item(&mut self, key: &str) -> Result<(), StorageError> {
        self.dirty.insert(key.to_owned());
        self.values.remove_item(key)
    }
}
