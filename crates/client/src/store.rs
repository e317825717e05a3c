//! Durable key-value persistence for client state.
//!
//! Each piece of state (cart, lists cache, auth session, settings) is
//! JSON-serialized under its own namespaced key. Loading tolerates missing
//! and malformed data by treating it as absent; only writes can fail.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};

use serde::de::DeserializeOwned;
use serde::Serialize;
use thiserror::Error;

/// Persisted key for the local cart.
pub const CART_KEY: &str = "avento_cart";
/// Persisted key for the cached lists collection.
pub const LISTS_KEY: &str = "avento_lists";
/// Persisted key for the authenticated session.
pub const AUTH_KEY: &str = "avento_auth";
/// Persisted key for user settings.
pub const SETTINGS_KEY: &str = "avento_settings";

/// Errors that can occur when writing to the store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Creating the storage directory failed.
    #[error("failed to create data directory {path}: {source}")]
    CreateDir {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Writing a key failed.
    #[error("failed to persist {key}: {source}")]
    Write {
        key: String,
        #[source]
        source: std::io::Error,
    },

    /// Removing a key failed.
    #[error("failed to remove {key}: {source}")]
    Remove {
        key: String,
        #[source]
        source: std::io::Error,
    },

    /// Serializing a value failed.
    #[error("failed to serialize {key}: {source}")]
    Serialize {
        key: String,
        #[source]
        source: serde_json::Error,
    },
}

/// A durable JSON key-value store.
///
/// Implementations persist raw JSON strings; the typed `load`/`save` helpers
/// layer serde on top. A missing or malformed value loads as `None` - stale
/// local state must never take the client down.
pub trait KeyValueStore: Send + Sync {
    /// Load the raw JSON string stored under `key`, if any.
    fn load_raw(&self, key: &str) -> Option<String>;

    /// Store a raw JSON string under `key`, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the write fails.
    fn save_raw(&self, key: &str, json: &str) -> Result<(), StoreError>;

    /// Remove the value stored under `key`. Removing an absent key is a no-op.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the removal fails.
    fn remove(&self, key: &str) -> Result<(), StoreError>;

    /// Load and deserialize the value stored under `key`.
    ///
    /// Malformed persisted state is logged and treated as absent.
    fn load<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let raw = self.load_raw(key)?;
        match serde_json::from_str(&raw) {
            Ok(value) => Some(value),
            Err(error) => {
                tracing::warn!(key, %error, "discarding malformed persisted state");
                None
            }
        }
    }

    /// Serialize and store a value under `key`.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if serialization or the write fails.
    fn save<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> Result<(), StoreError> {
        let json = serde_json::to_string(value).map_err(|source| StoreError::Serialize {
            key: key.to_owned(),
            source,
        })?;
        self.save_raw(key, &json)
    }
}

/// File-backed store: one JSON file per key under a data directory.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    dir: PathBuf,
}

impl JsonFileStore {
    /// Open (creating if necessary) a store rooted at `dir`.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::CreateDir`] if the directory cannot be created.
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let dir = dir.into();
        std::fs::create_dir_all(&dir).map_err(|source| StoreError::CreateDir {
            path: dir.display().to_string(),
            source,
        })?;
        Ok(Self { dir })
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }

    /// The directory this store persists into.
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

impl KeyValueStore for JsonFileStore {
    fn load_raw(&self, key: &str) -> Option<String> {
        std::fs::read_to_string(self.path_for(key)).ok()
    }

    fn save_raw(&self, key: &str, json: &str) -> Result<(), StoreError> {
        std::fs::write(self.path_for(key), json).map_err(|source| StoreError::Write {
            key: key.to_owned(),
            source,
        })
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        match std::fs::remove_file(self.path_for(key)) {
            Ok(()) => Ok(()),
            Err(error) if error.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(source) => Err(StoreError::Remove {
                key: key.to_owned(),
                source,
            }),
        }
    }
}

/// In-memory store for tests and embedders that do not want disk persistence.
///
/// Clones share the same underlying map.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: Arc<Mutex<HashMap<String, String>>>,
}

impl MemoryStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn load_raw(&self, key: &str) -> Option<String> {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(key)
            .cloned()
    }

    fn save_raw(&self, key: &str, json: &str) -> Result<(), StoreError> {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key.to_owned(), json.to_owned());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(key);
        Ok(())
    }
}
