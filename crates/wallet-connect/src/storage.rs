//! Persistence of the last selected wallet name, one entry per storage key.

use std::collections::BTreeMap;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

use tracing::debug;

use crate::error::ConnectError;

pub trait SelectionStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>, ConnectError>;
    fn set(&self, key: &str, value: &str) -> Result<(), ConnectError>;
}

/// Process-local store.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SelectionStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, ConnectError> {
        let entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        Ok(entries.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), ConnectError> {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// A JSON object on disk mapping storage keys to wallet names. Survives
/// restarts the way browser local storage survives reloads.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    lock: Mutex<()>,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_all(&self) -> Result<BTreeMap<String, String>, ConnectError> {
        match std::fs::read_to_string(&self.path) {
            Ok(s) if s.trim().is_empty() => Ok(BTreeMap::new()),
            Ok(s) => serde_json::from_str(&s)
                .map_err(|e| ConnectError::Storage(format!("{}: {e}", self.path.display()))),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(BTreeMap::new()),
            Err(e) => Err(ConnectError::Storage(format!("{}: {e}", self.path.display()))),
        }
    }
}

impl SelectionStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, ConnectError> {
        let _guard = self.lock.lock().unwrap_or_else(PoisonError::into_inner);
        Ok(self.read_all()?.remove(key))
    }

    fn set(&self, key: &str, value: &str) -> Result<(), ConnectError> {
        let _guard = self.lock.lock().unwrap_or_else(PoisonError::into_inner);
        let mut entries = self.read_all()?;
        entries.insert(key.to_string(), value.to_string());

        let json = serde_json::to_string_pretty(&entries)
            .map_err(|e| ConnectError::Storage(e.to_string()))?;
        std::fs::write(&self.path, json)
            .map_err(|e| ConnectError::Storage(format!("{}: {e}", self.path.display())))?;
        debug!(key, value, path = %self.path.display(), "persisted wallet selection");
        Ok(())
    }
}
