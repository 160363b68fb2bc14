//! Persistence collaborators for the bookmark store.
//!
//! Every backend stores the same blob, `{ "bookmarks": [...] }`, and restores
//! it verbatim. The store treats saving as best-effort.

use std::path::Path;
use std::sync::Arc;

use crate::types::bookmark::{self, BookmarkItem, BookmarkTree, PersistedBookmarks};
use crate::types::errors::StorageError;
use crate::types::settings::{StorageBackend, StorageSettings};

pub mod json_file;
pub mod memory;
pub mod sqlite;

pub use json_file::JsonFileStorage;
pub use memory::MemoryStorage;
pub use sqlite::SqliteStorage;

/// Load/save hook for the canonical bookmark tree.
pub trait BookmarkStorage: Send {
    /// Restores the persisted tree. A backend with nothing stored yet returns an empty tree.
    fn load(&self) -> Result<BookmarkTree, StorageError>;
    /// Persists `tree`, replacing whatever was stored before.
    fn save(&mut self, tree: &[Arc<BookmarkItem>]) -> Result<(), StorageError>;
}

/// Serializes a tree into the persisted blob layout.
pub fn encode_blob(tree: &[Arc<BookmarkItem>]) -> Result<String, StorageError> {
    let blob = PersistedBookmarks {
        bookmarks: tree.to_vec(),
    };
    Ok(serde_json::to_string(&blob)?)
}

/// Parses the persisted blob layout back into a tree.
pub fn decode_blob(blob: &str) -> Result<BookmarkTree, StorageError> {
    let persisted: PersistedBookmarks = bookmark::from_json_unbounded(blob)?;
    Ok(persisted.bookmarks)
}

/// Opens the backend selected in `settings`.
///
/// Relative or missing paths resolve against `data_dir`.
pub fn open_storage(
    settings: &StorageSettings,
    data_dir: &Path,
) -> Result<Box<dyn BookmarkStorage>, StorageError> {
    let path = match &settings.path {
        Some(p) => data_dir.join(p),
        None => data_dir.join(settings.backend.default_file_name()),
    };

    let storage: Box<dyn BookmarkStorage> = match settings.backend {
        StorageBackend::Sqlite => {
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent).map_err(|e| StorageError::Io(e.to_string()))?;
            }
            Box::new(SqliteStorage::open(&path)?)
        }
        StorageBackend::JsonFile => Box::new(JsonFileStorage::new(path.clone())),
        StorageBackend::Memory => Box::new(MemoryStorage::new()),
    };
    log::info!("using {:?} storage at {}", settings.backend, path.display());
    Ok(storage)
}
