//! Persistence for calculation history and the compare list.
//!
//! Everything is stored as JSON text under a handful of keys. The
//! [`KeyValueStore`] trait is the only storage primitive; [`HistoryStore`]
//! and [`CompareStore`] are the repositories callers actually use.

pub mod compare;
pub mod history;
pub mod records;

use log::{debug, warn};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::collections::HashMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::error::PathPayError;
use crate::PathPayResult;

pub use compare::{rank_records, CompareStore, CompareTag, RankBy, RankedRecord, COMPARE_CAPACITY};
pub use history::HistoryStore;
pub use records::LoanRecord;

/// Minimal string key-value contract the repositories are written against.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> PathPayResult<Option<String>>;
    fn set(&mut self, key: &str, value: &str) -> PathPayResult<()>;
    fn remove(&mut self, key: &str) -> PathPayResult<()>;
}

/// Process-local store, used by tests and embedders that persist elsewhere.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> PathPayResult<Option<String>> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> PathPayResult<()> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> PathPayResult<()> {
        self.entries.remove(key);
        Ok(())
    }
}

/// One `<key>.json` file per key inside a data directory.
#[derive(Debug, Clone)]
pub struct FileStore {
    root: PathBuf,
}

impl FileStore {
    /// The directory is created on first write.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path_for(&self, key: &str) -> PathPayResult<PathBuf> {
        let valid = !key.is_empty()
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
        if !valid {
            return Err(PathPayError::Storage(format!("Invalid storage key '{key}'")));
        }
        Ok(self.root.join(format!("{key}.json")))
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> PathPayResult<Option<String>> {
        let path = self.path_for(key)?;
        match fs::read_to_string(&path) {
            Ok(contents) => {
                debug!("read {} bytes from {}", contents.len(), path.display());
                Ok(Some(contents))
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(PathPayError::Storage(format!(
                "Failed to read '{}': {}",
                path.display(),
                e
            ))),
        }
    }

    fn set(&mut self, key: &str, value: &str) -> PathPayResult<()> {
        let path = self.path_for(key)?;
        fs::create_dir_all(&self.root).map_err(|e| {
            PathPayError::Storage(format!("Failed to create '{}': {}", self.root.display(), e))
        })?;

        // Write-then-rename: a failed write leaves the previous list in place.
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, value)
            .and_then(|_| fs::rename(&tmp, &path))
            .map_err(|e| PathPayError::Storage(format!("Failed to write '{}': {}", path.display(), e)))?;
        debug!("wrote {} bytes to {}", value.len(), path.display());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> PathPayResult<()> {
        let path = self.path_for(key)?;
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(PathPayError::Storage(format!(
                "Failed to remove '{}': {}",
                path.display(),
                e
            ))),
        }
    }
}

/// Read a JSON list stored under `key`; a missing key is an empty list.
pub(crate) fn load_list<T: DeserializeOwned>(
    store: &impl KeyValueStore,
    key: &str,
) -> PathPayResult<Vec<T>> {
    match store.get(key)? {
        None => Ok(Vec::new()),
        Some(raw) if raw.trim().is_empty() => Ok(Vec::new()),
        Some(raw) => serde_json::from_str(&raw).map_err(|e| {
            warn!("stored list '{key}' is malformed: {e}");
            PathPayError::SerializationError(format!("Stored list '{key}' is malformed: {e}"))
        }),
    }
}

pub(crate) fn save_list<T: Serialize>(
    store: &mut impl KeyValueStore,
    key: &str,
    items: &[T],
) -> PathPayResult<()> {
    let raw = serde_json::to_string(items)?;
    store.set(key, &raw)
}
