//! SQLite-backed storage: the blob lives in the `kv_store` table.

use std::path::Path;
use std::sync::Arc;

use super::{decode_blob, encode_blob, BookmarkStorage};
use crate::database::Database;
use crate::types::bookmark::{BookmarkItem, BookmarkTree};
use crate::types::errors::StorageError;

/// Key under which the bookmark blob is stored.
pub const BOOKMARKS_KEY: &str = "bookmarks";

pub struct SqliteStorage {
    db: Database,
}

impl SqliteStorage {
    /// Opens (or creates) the database file at `path`.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, StorageError> {
        Ok(Self {
            db: Database::open(path)?,
        })
    }

    /// Storage over a fresh in-memory database.
    pub fn open_in_memory() -> Result<Self, StorageError> {
        Ok(Self {
            db: Database::open_in_memory()?,
        })
    }

    pub fn database(&self) -> &Database {
        &self.db
    }
}

impl BookmarkStorage for SqliteStorage {
    fn load(&self) -> Result<BookmarkTree, StorageError> {
        match self.db.get_value(BOOKMARKS_KEY)? {
            Some(blob) => decode_blob(&blob),
            None => Ok(Vec::new()),
        }
    }

    fn save(&mut self, tree: &[Arc<BookmarkItem>]) -> Result<(), StorageError> {
        let blob = encode_blob(tree)?;
        self.db.put_value(BOOKMARKS_KEY, &blob)?;
        Ok(())
    }
}
