//! Durable key-value storage backing the session.
//!
//! SYSTEM CONTEXT
//! ==============
//! Plays the role browser `localStorage` plays for a web client: a flat map
//! of string keys to string values that survives restarts. The session store
//! writes through on every mutation, so the next process observes the latest
//! tokens.

#[cfg(test)]
#[path = "storage_test.rs"]
mod storage_test;

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

use crate::error::StorageError;

/// Key holding the bearer access token.
pub const ACCESS_TOKEN_KEY: &str = "access_token";
/// Key holding the refresh token.
pub const REFRESH_TOKEN_KEY: &str = "refresh_token";
/// Key caching the logged-in user's email for contact forms.
pub const USER_EMAIL_KEY: &str = "user_email";

/// A batch of writes: `Some` sets the key, `None` removes it.
pub type Change<'a> = (&'a str, Option<&'a str>);

/// String key-value storage with synchronous write-through.
pub trait TokenStorage: Send + Sync {
    /// Read the current value for `key`.
    fn get(&self, key: &str) -> Option<String>;

    /// Apply all changes and persist them before returning.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing medium could not be written.
    fn apply(&self, changes: &[Change<'_>]) -> Result<(), StorageError>;

    /// Set a single key.
    ///
    /// # Errors
    ///
    /// See [`TokenStorage::apply`].
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.apply(&[(key, Some(value))])
    }

    /// Remove a single key.
    ///
    /// # Errors
    ///
    /// See [`TokenStorage::apply`].
    fn remove(&self, key: &str) -> Result<(), StorageError> {
        self.apply(&[(key, None)])
    }
}

fn apply_to_map(map: &mut BTreeMap<String, String>, changes: &[Change<'_>]) {
    for (key, value) in changes {
        match value {
            Some(value) => {
                map.insert((*key).to_owned(), (*value).to_owned());
            }
            None => {
                map.remove(*key);
            }
        }
    }
}

// =============================================================================
// MEMORY
// =============================================================================

/// Process-local storage; nothing survives a restart.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    entries: Mutex<BTreeMap<String, String>>,
}

impl MemoryStorage {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl TokenStorage for MemoryStorage {
    fn get(&self, key: &str) -> Option<String> {
        let entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        entries.get(key).cloned()
    }

    fn apply(&self, changes: &[Change<'_>]) -> Result<(), StorageError> {
        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        apply_to_map(&mut entries, changes);
        Ok(())
    }
}

// =============================================================================
// FILE
// =============================================================================

/// JSON-object file storage.
///
/// Writes go to a sibling temp file that is renamed over the target, so a
/// crash mid-write leaves the previous contents intact.
#[derive(Debug)]
pub struct FileStorage {
    path: PathBuf,
    entries: Mutex<BTreeMap<String, String>>,
}

impl FileStorage {
    /// Open (or lazily create) the storage file at `path`.
    ///
    /// A missing file is an empty store. A file that is not a JSON object of
    /// strings is ignored with a warning; the next write replaces it.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StorageError> {
        let path = path.into();
        let entries = match std::fs::read_to_string(&path) {
            Ok(raw) => match serde_json::from_str::<BTreeMap<String, String>>(&raw) {
                Ok(entries) => entries,
                Err(e) => {
                    tracing::warn!(path = %path.display(), error = %e, "session file unreadable; starting empty");
                    BTreeMap::new()
                }
            },
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => BTreeMap::new(),
            Err(e) => return Err(StorageError::Io(e)),
        };
        Ok(Self { path, entries: Mutex::new(entries) })
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn persist(&self, entries: &BTreeMap<String, String>) -> Result<(), StorageError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        let raw = serde_json::to_string_pretty(entries)?;
        let tmp = self.path.with_extension("json.tmp");
        std::fs::write(&tmp, raw)?;
        std::fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

impl TokenStorage for FileStorage {
    fn get(&self, key: &str) -> Option<String> {
        let entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        entries.get(key).cloned()
    }

    fn apply(&self, changes: &[Change<'_>]) -> Result<(), StorageError> {
        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        let mut next = entries.clone();
        apply_to_map(&mut next, changes);
        self.persist(&next)?;
        *entries = next;
        Ok(())
    }
}
