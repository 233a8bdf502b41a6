//! Durable key-value slots for client state.
//!
//! SYSTEM CONTEXT
//! ==============
//! The session store persists through the [`SessionStorage`] trait so the
//! browser's `localStorage` can be swapped for [`MemoryStorage`] in tests.
//! JSON helpers sit on top and treat unreadable data as absent.

#[cfg(test)]
#[path = "storage_test.rs"]
mod storage_test;

use std::collections::HashMap;
use std::sync::Mutex;

use serde::Serialize;
use serde::de::DeserializeOwned;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StorageError {
    #[error("storage unavailable")]
    Unavailable,
    #[error("storage write failed: {0}")]
    Write(String),
    #[error("storage encode failed: {0}")]
    Encode(String),
}

/// A string key-value store that survives page reloads.
pub trait SessionStorage {
    /// Read the raw value under `key`, `None` when nothing is stored.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::Unavailable`] if the backing store cannot be
    /// reached.
    fn read(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Replace the value under `key`.
    ///
    /// # Errors
    ///
    /// Returns a [`StorageError`] if the backing store rejects the write.
    fn write(&self, key: &str, value: &str) -> Result<(), StorageError>;
}

/// `window.localStorage`. Reads are empty and writes are dropped outside the
/// browser build.
#[derive(Debug, Clone, Copy, Default)]
pub struct BrowserStorage;

impl SessionStorage for BrowserStorage {
    fn read(&self, key: &str) -> Result<Option<String>, StorageError> {
        #[cfg(feature = "hydrate")]
        {
            let storage = local_storage()?;
            storage.get_item(key).map_err(|_| StorageError::Unavailable)
        }
        #[cfg(not(feature = "hydrate"))]
        {
            let _ = key;
            Ok(None)
        }
    }

    fn write(&self, key: &str, value: &str) -> Result<(), StorageError> {
        #[cfg(feature = "hydrate")]
        {
            let storage = local_storage()?;
            storage
                .set_item(key, value)
                .map_err(|e| StorageError::Write(format!("{e:?}")))
        }
        #[cfg(not(feature = "hydrate"))]
        {
            let _ = (key, value);
            Ok(())
        }
    }
}

#[cfg(feature = "hydrate")]
fn local_storage() -> Result<web_sys::Storage, StorageError> {
    web_sys::window()
        .and_then(|w| w.local_storage().ok().flatten())
        .ok_or(StorageError::Unavailable)
}

/// In-process storage. Counts writes so callers can assert persistence
/// happened (or did not).
#[derive(Debug, Default)]
pub struct MemoryStorage {
    slots: Mutex<HashMap<String, String>>,
    writes: Mutex<usize>,
}

impl MemoryStorage {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Storage pre-seeded with one raw value.
    #[must_use]
    pub fn with_value(key: &str, value: &str) -> Self {
        let storage = Self::default();
        storage
            .slots
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .insert(key.to_owned(), value.to_owned());
        storage
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<String> {
        self.slots
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .get(key)
            .cloned()
    }

    #[must_use]
    pub fn writes(&self) -> usize {
        *self.writes.lock().unwrap_or_else(std::sync::PoisonError::into_inner)
    }
}

impl SessionStorage for MemoryStorage {
    fn read(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.get(key))
    }

    fn write(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.slots
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .insert(key.to_owned(), value.to_owned());
        *self.writes.lock().unwrap_or_else(std::sync::PoisonError::into_inner) += 1;
        Ok(())
    }
}

impl<S: SessionStorage + ?Sized> SessionStorage for std::sync::Arc<S> {
    fn read(&self, key: &str) -> Result<Option<String>, StorageError> {
        (**self).read(key)
    }

    fn write(&self, key: &str, value: &str) -> Result<(), StorageError> {
        (**self).write(key, value)
    }
}

/// Load a JSON value for `key`. Missing, unreachable, or undecodable data
/// all yield `None`.
pub fn load_json<T, S>(storage: &S, key: &str) -> Option<T>
where
    T: DeserializeOwned,
    S: SessionStorage + ?Sized,
{
    let raw = match storage.read(key) {
        Ok(Some(raw)) => raw,
        Ok(None) => return None,
        Err(e) => {
            log::warn!("storage read for {key} failed: {e}");
            return None;
        }
    };
    match serde_json::from_str(&raw) {
        Ok(value) => Some(value),
        Err(e) => {
            log::warn!("discarding corrupt value under {key}: {e}");
            None
        }
    }
}

/// Save a JSON value for `key`.
///
/// # Errors
///
/// Returns a [`StorageError`] if encoding or the underlying write fails.
pub fn save_json<T, S>(storage: &S, key: &str, value: &T) -> Result<(), StorageError>
where
    T: Serialize,
    S: SessionStorage + ?Sized,
{
    let raw = serde_json::to_string(value).map_err(|e| StorageError::Encode(e.to_string()))?;
    storage.write(key, &raw)
}
