//! Storage in a plain JSON file.

use std::fs;
use std::path::PathBuf;
use std::sync::Arc;

use super::{decode_blob, encode_blob, BookmarkStorage};
use crate::types::bookmark::{BookmarkItem, BookmarkTree};
use crate::types::errors::StorageError;

pub struct JsonFileStorage {
    path: PathBuf,
}

impl JsonFileStorage {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn path(&self) -> &PathBuf {
        &self.path
    }
}

impl BookmarkStorage for JsonFileStorage {
    /// A missing file loads as an empty tree; a malformed one is an error.
    fn load(&self) -> Result<BookmarkTree, StorageError> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }
        let content = fs::read_to_string(&self.path)
            .map_err(|e| StorageError::Io(format!("Failed to read {}: {}", self.path.display(), e)))?;
        decode_blob(&content)
    }

    fn save(&mut self, tree: &[Arc<BookmarkItem>]) -> Result<(), StorageError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .map_err(|e| StorageError::Io(format!("Failed to create data directory: {}", e)))?;
        }
        let blob = encode_blob(tree)?;
        fs::write(&self.path, blob)
            .map_err(|e| StorageError::Io(format!("Failed to write {}: {}", self.path.display(), e)))
    }
}
