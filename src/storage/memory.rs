//! In-process storage, mainly for tests.
//!
//! Clones share the same underlying blob, so a test can keep a handle while
//! the store owns another.

use std::sync::{Arc, Mutex};

use super::{decode_blob, encode_blob, BookmarkStorage};
use crate::types::bookmark::{BookmarkItem, BookmarkTree};
use crate::types::errors::StorageError;

#[derive(Debug, Default)]
struct MemoryInner {
    blob: Option<String>,
    fail_saves: bool,
    saves: usize,
}

#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    inner: Arc<Mutex<MemoryInner>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Storage pre-filled with `tree`.
    pub fn with_tree(tree: &[Arc<BookmarkItem>]) -> Result<Self, StorageError> {
        let storage = Self::new();
        storage.lock()?.blob = Some(encode_blob(tree)?);
        Ok(storage)
    }

    /// Storage pre-filled with a raw blob (may be malformed).
    pub fn with_blob(blob: &str) -> Self {
        let storage = Self::new();
        if let Ok(mut inner) = storage.inner.lock() {
            inner.blob = Some(blob.to_string());
        }
        storage
    }

    /// Makes every subsequent save fail.
    pub fn set_fail_saves(&self, fail: bool) {
        if let Ok(mut inner) = self.inner.lock() {
            inner.fail_saves = fail;
        }
    }

    /// The raw blob last written, if any.
    pub fn blob(&self) -> Option<String> {
        self.inner.lock().ok().and_then(|inner| inner.blob.clone())
    }

    /// Number of successful saves.
    pub fn save_count(&self) -> usize {
        self.inner.lock().map(|inner| inner.saves).unwrap_or(0)
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, MemoryInner>, StorageError> {
        self.inner
            .lock()
            .map_err(|e| StorageError::Io(format!("memory storage poisoned: {}", e)))
    }
}

impl BookmarkStorage for MemoryStorage {
    fn load(&self) -> Result<BookmarkTree, StorageError> {
        match &self.lock()?.blob {
            Some(blob) => decode_blob(blob),
            None => Ok(Vec::new()),
        }
    }

    fn save(&mut self, tree: &[Arc<BookmarkItem>]) -> Result<(), StorageError> {
        let mut inner = self.lock()?;
        if inner.fail_saves {
            return Err(StorageError::Io("storage unavailable".to_string()));
        }
        inner.blob = Some(encode_blob(tree)?);
        inner.saves += 1;
        Ok(())
    }
}
