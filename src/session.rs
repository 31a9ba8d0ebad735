//! Persisted identity state.
//!
//! The session is three named string slots in a small key-value store. It is
//! read freely, written only by [`Session::store_login`] and [`Session::logout`],
//! and handed explicitly to whatever needs it.

use crate::error::StorageError;
use serde_json::Value;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

pub const TOKEN_KEY: &str = "authToken";
pub const USERNAME_KEY: &str = "username";
pub const USER_DATA_KEY: &str = "userData";

/// Key-value slots that survive restarts
pub trait SessionStorage: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;
    fn remove(&self, key: &str) -> Result<(), StorageError>;
}

/// Storage backed by a JSON object file.
///
/// Every write rewrites the file through a sibling temp file and a rename, so
/// a reader never observes a half-written file. A missing file reads as empty.
#[derive(Debug)]
pub struct FileStorage {
    path: PathBuf,
    lock: Mutex<()>,
}

impl FileStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_all(&self) -> Result<BTreeMap<String, String>, StorageError> {
        match fs::read_to_string(&self.path) {
            Ok(contents) if contents.trim().is_empty() => Ok(BTreeMap::new()),
            Ok(contents) => Ok(serde_json::from_str(&contents)?),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(BTreeMap::new()),
            Err(e) => Err(e.into()),
        }
    }

    fn write_all(&self, slots: &BTreeMap<String, String>) -> Result<(), StorageError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let tmp = self.path.with_extension("tmp");
        fs::write(&tmp, serde_json::to_string_pretty(slots)?)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }

    fn update(
        &self,
        change: impl FnOnce(&mut BTreeMap<String, String>),
    ) -> Result<(), StorageError> {
        let _guard = self.lock.lock().unwrap_or_else(|e| e.into_inner());
        let mut slots = self.read_all()?;
        change(&mut slots);
        self.write_all(&slots)
    }
}

impl SessionStorage for FileStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.read_all()?.remove(key))
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.update(|slots| {
            slots.insert(key.to_string(), value.to_string());
        })
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        self.update(|slots| {
            slots.remove(key);
        })
    }
}

/// In-process storage, for tests and throwaway sessions
#[derive(Debug, Default)]
pub struct MemoryStorage {
    slots: Mutex<BTreeMap<String, String>>,
}

impl SessionStorage for MemoryStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let slots = self.slots.lock().unwrap_or_else(|e| e.into_inner());
        Ok(slots.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let mut slots = self.slots.lock().unwrap_or_else(|e| e.into_inner());
        slots.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        let mut slots = self.slots.lock().unwrap_or_else(|e| e.into_inner());
        slots.remove(key);
        Ok(())
    }
}

/// The logged-in identity, if any
pub struct Session<S: SessionStorage> {
    storage: S,
}

impl<S: SessionStorage> Session<S> {
    pub fn new(storage: S) -> Self {
        Self { storage }
    }

    pub fn token(&self) -> Result<Option<String>, StorageError> {
        self.storage.get(TOKEN_KEY)
    }

    pub fn username(&self) -> Result<Option<String>, StorageError> {
        self.storage.get(USERNAME_KEY)
    }

    /// The profile blob stored at login, parsed back into JSON
    pub fn user_data(&self) -> Result<Option<Value>, StorageError> {
        match self.storage.get(USER_DATA_KEY)? {
            Some(raw) => Ok(Some(serde_json::from_str(&raw)?)),
            None => Ok(None),
        }
    }

    pub fn is_authenticated(&self) -> Result<bool, StorageError> {
        Ok(self.token()?.is_some_and(|t| !t.is_empty()))
    }

    pub fn store_login(
        &self,
        token: &str,
        username: &str,
        user_data: Option<&Value>,
    ) -> Result<(), StorageError> {
        self.storage.set(TOKEN_KEY, token)?;
        self.storage.set(USERNAME_KEY, username)?;
        match user_data {
            Some(data) => self.storage.set(USER_DATA_KEY, &data.to_string())?,
            None => self.storage.remove(USER_DATA_KEY)?,
        }
        ::log::info!("Stored session for {}", username);
        Ok(())
    }

    pub fn logout(&self) -> Result<(), StorageError> {
        self.storage.remove(TOKEN_KEY)?;
        self.storage.remove(USERNAME_KEY)?;
        self.storage.remove(USER_DATA_KEY)?;
        ::log::info!("Session cleared");
        Ok(())
    }
}
