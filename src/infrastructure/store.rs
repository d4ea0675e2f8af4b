//! Generic key-value record store persisted as a single bincode blob

use crate::error::{BankError, Result};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::ErrorKind;
use std::marker::PhantomData;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Insertion-ordered mapping, the in-memory form of one store
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Table<K, V> {
    entries: Vec<(K, V)>,
}

impl<K, V> Default for Table<K, V> {
    fn default() -> Self {
        Table {
            entries: Vec::new(),
        }
    }
}

impl<K: PartialEq, V> Table<K, V> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &K) -> Option<&V> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    pub fn get_mut(&mut self, key: &K) -> Option<&mut V> {
        self.entries
            .iter_mut()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v)
    }

    pub fn contains_key(&self, key: &K) -> bool {
        self.get(key).is_some()
    }

    /// Insert or replace. A replaced entry keeps its position.
    pub fn insert(&mut self, key: K, value: V) -> Option<V> {
        match self.get_mut(&key) {
            Some(slot) => Some(std::mem::replace(slot, value)),
            None => {
                self.entries.push((key, value));
                None
            }
        }
    }

    /// Remove an entry, keeping the order of the rest
    pub fn remove(&mut self, key: &K) -> Option<V> {
        let index = self.entries.iter().position(|(k, _)| k == key)?;
        Some(self.entries.remove(index).1)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&K, &V)> {
        self.entries.iter().map(|(k, v)| (k, v))
    }

    pub fn values(&self) -> impl Iterator<Item = &V> {
        self.entries.iter().map(|(_, v)| v)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// File-backed store holding one [`Table`].
///
/// Every call reads or writes the whole file; nothing is cached between calls.
/// Writes go to a sibling `.staged` file first and are renamed into place.
#[derive(Debug, Clone)]
pub struct RecordStore<K, V> {
    path: PathBuf,
    _marker: PhantomData<fn() -> (K, V)>,
}

impl<K, V> RecordStore<K, V>
where
    K: PartialEq + Serialize + DeserializeOwned,
    V: Serialize + DeserializeOwned,
{
    pub fn new(path: PathBuf) -> Self {
        RecordStore {
            path,
            _marker: PhantomData,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Path of the staged copy written ahead of a rename
    pub fn staged_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        name.push(".staged");
        self.path.with_file_name(name)
    }

    /// Load the full table. A missing file is an empty table; anything
    /// unreadable is an error.
    pub fn load(&self) -> Result<Table<K, V>> {
        let bytes = match fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "store missing, treating as empty");
                return Ok(Table::new());
            }
            Err(e) => return Err(BankError::Storage(e)),
        };

        bincode::deserialize(&bytes).map_err(|source| BankError::CorruptStore {
            path: self.path.clone(),
            source,
        })
    }

    /// Overwrite the backing file with `table`
    pub fn save(&self, table: &Table<K, V>) -> Result<()> {
        self.stage(table)?;
        self.promote()?;
        Ok(())
    }

    /// Write `table` to the staged path without touching the live file
    pub fn stage(&self, table: &Table<K, V>) -> Result<()> {
        let bytes = bincode::serialize(table).map_err(|source| BankError::CorruptStore {
            path: self.path.clone(),
            source,
        })?;

        if let Some(parent) = self.path.parent() {
            if !parent.exists() {
                fs::create_dir_all(parent)?;
            }
        }

        fs::write(self.staged_path(), bytes)?;
        debug!(path = %self.path.display(), entries = table.len(), "staged store");
        Ok(())
    }

    /// Move a staged file into place. Returns false if nothing was staged.
    pub fn promote(&self) -> Result<bool> {
        let staged = self.staged_path();
        if !staged.exists() {
            return Ok(false);
        }

        // rename does not replace an existing file on Windows
        #[cfg(windows)]
        {
            if self.path.exists() {
                fs::remove_file(&self.path)?;
            }
        }

        fs::rename(&staged, &self.path)?;
        Ok(true)
    }

    /// Remove a leftover staged file. Returns whether one existed.
    pub fn discard_staged(&self) -> Result<bool> {
        match fs::remove_file(self.staged_path()) {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
            Err(e) => Err(BankError::Storage(e)),
        }
    }

    /// Write an empty table if no backing file exists yet
    pub fn initialize_if_absent(&self) -> Result<bool> {
        if self.path.exists() {
            return Ok(false);
        }
        self.save(&Table::new())?;
        Ok(true)
    }
}
