//! # Durable Session Storage
//!
//! Key-value backend behind the session store. The file implementation
//! writes one JSON/text file per key under the configured data directory;
//! the in-memory implementation backs tests.

use std::collections::HashMap;
use std::fs;
use std::io::ErrorKind;
use std::path::PathBuf;

use parking_lot::Mutex;

use crate::error::{AppError, Result};

/// Durable key-value storage for session records.
///
/// Implementations must tolerate concurrent calls; the session store is the
/// only writer, but readers may race a write on startup.
pub trait SessionStorage: Send + Sync {
    /// Read the value stored under `key`, if any.
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Write `value` under `key`, replacing any prior value.
    fn put(&self, key: &str, value: &str) -> Result<()>;

    /// Delete the value under `key`. Deleting an absent key is a no-op.
    fn remove(&self, key: &str) -> Result<()>;
}

/// File-backed storage: one file per key under a data directory.
pub struct FileStorage {
    dir: PathBuf,
}

impl FileStorage {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(key)
    }
}

impl SessionStorage for FileStorage {
    fn get(&self, key: &str) -> Result<Option<String>> {
        match fs::read_to_string(self.path_for(key)) {
            Ok(value) => Ok(Some(value)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(AppError::Storage(format!("read {key}: {e}"))),
        }
    }

    fn put(&self, key: &str, value: &str) -> Result<()> {
        fs::create_dir_all(&self.dir)
            .map_err(|e| AppError::Storage(format!("create {}: {e}", self.dir.display())))?;
        fs::write(self.path_for(key), value)
            .map_err(|e| AppError::Storage(format!("write {key}: {e}")))
    }

    fn remove(&self, key: &str) -> Result<()> {
        match fs::remove_file(self.path_for(key)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(AppError::Storage(format!("remove {key}: {e}"))),
        }
    }
}

/// In-memory storage for tests and ephemeral embedders.
#[derive(Default)]
pub struct MemoryStorage {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SessionStorage for MemoryStorage {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.entries.lock().get(key).cloned())
    }

    fn put(&self, key: &str, value: &str) -> Result<()> {
        self.entries.lock().insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        self.entries.lock().remove(key);
        Ok(())
    }
}
