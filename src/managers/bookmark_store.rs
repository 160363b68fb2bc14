//! Bookmark Store for Marktree.
//!
//! Holds the canonical bookmark tree, exposes the mutation operations, keeps
//! the derived search index in sync and persists through an injected
//! [`BookmarkStorage`]. Every mutation computes a whole new tree and swaps it
//! in at once; persistence is best-effort and never rolls the swap back.
//!
//! If the stored tree cannot be read at startup, the store starts empty and
//! refuses to write over the unreadable data until
//! [`BookmarkStore::overwrite_storage`] is called.

use std::sync::Arc;

use crate::services::export_selection;
use crate::services::id_allocator;
use crate::services::import_merger::{self, IdRemap};
use crate::services::search_index::{self, SearchIndex};
use crate::services::tree_mutator;
use crate::services::validation;
use crate::storage::{BookmarkStorage, MemoryStorage};
use crate::types::bookmark::{self, BookmarkItem, BookmarkTree};
use crate::types::errors::{BookmarkError, StorageError};
use crate::types::export::ExportableBookmarkItem;
use crate::types::search::BookmarkSearchResultItem;
use crate::types::settings::{LimitSettings, StoreSettings};

/// Trait defining the public bookmark store operations.
pub trait BookmarkStoreTrait {
    /// The canonical tree.
    fn bookmarks(&self) -> &[Arc<BookmarkItem>];
    /// The derived search index, in tree traversal order.
    fn search_index(&self) -> &[BookmarkSearchResultItem];
    /// Creates a URL bookmark. Returns its id, or `None` if `parent_id` names no folder.
    fn create_bookmark(
        &mut self,
        title: &str,
        url: &str,
        parent_id: Option<&str>,
    ) -> Result<Option<String>, BookmarkError>;
    /// Creates an empty folder. Returns its id, or `None` if `parent_id` names no folder.
    fn create_folder(&mut self, title: &str, parent_id: Option<&str>) -> Result<Option<String>, BookmarkError>;
    fn edit_bookmark(&mut self, id: &str, new_title: &str, new_url: &str) -> Result<(), BookmarkError>;
    fn edit_folder(&mut self, id: &str, new_title: &str) -> Result<(), BookmarkError>;
    /// Deletes a URL or folder (with its descendants). Unknown ids are ignored.
    fn delete_bookmark(&mut self, id: &str);
    /// Merges `items` at the root. Returns the ids that had to be reassigned.
    fn import_bookmarks(&mut self, items: &[Arc<BookmarkItem>]) -> Result<Vec<IdRemap>, BookmarkError>;
}

/// Bookmark store backed by a pluggable storage collaborator.
pub struct BookmarkStore {
    bookmarks: BookmarkTree,
    index: SearchIndex,
    storage: Box<dyn BookmarkStorage>,
    limits: LimitSettings,
    max_id_attempts: usize,
    /// Set when the initial load failed; saving would destroy what is stored.
    save_blocked: bool,
}

impl BookmarkStore {
    /// Creates a store, restoring the tree from `storage`.
    ///
    /// A failed load is logged and the store starts empty, with saving
    /// blocked so the unreadable data is left in place.
    pub fn new(storage: Box<dyn BookmarkStorage>, settings: &StoreSettings) -> Self {
        let (bookmarks, save_blocked) = match storage.load() {
            Ok(tree) => {
                log::info!("restored {} bookmark nodes", bookmark::count_nodes(&tree));
                (tree, false)
            }
            Err(e) => {
                log::warn!(
                    "failed to restore bookmarks, starting empty; stored data will not be overwritten: {}",
                    e
                );
                (Vec::new(), true)
            }
        };

        Self {
            index: SearchIndex::new(&bookmarks),
            bookmarks,
            storage,
            limits: settings.limits.clone(),
            max_id_attempts: settings.id.max_attempts,
            save_blocked,
        }
    }

    /// Store with default settings over fresh in-memory storage.
    pub fn in_memory() -> Self {
        Self::new(Box::new(MemoryStorage::new()), &StoreSettings::default())
    }

    /// Replaces the tree with `op(current)`.
    ///
    /// The search index is rebuilt and the tree persisted only if the new
    /// tree differs from the old one. Returns whether it did.
    pub fn apply<F>(&mut self, op: F) -> bool
    where
        F: FnOnce(&[Arc<BookmarkItem>]) -> BookmarkTree,
    {
        let next = op(&self.bookmarks);
        let changed = self.index.refresh(&next);
        self.bookmarks = next;

        if changed {
            log::info!(
                "bookmark tree updated: {} nodes",
                bookmark::count_nodes(&self.bookmarks)
            );
            self.persist();
        }
        changed
    }

    fn persist(&mut self) {
        if self.save_blocked {
            log::warn!("stored bookmarks were unreadable at startup; change kept in memory only");
            return;
        }
        if let Err(e) = self.storage.save(&self.bookmarks) {
            log::warn!("failed to persist bookmarks (kept in memory): {}", e);
        }
    }

    /// Whether mutations are being written to storage.
    pub fn is_persisting(&self) -> bool {
        !self.save_blocked
    }

    /// Writes the current tree over whatever storage holds and resumes
    /// persisting. Used to give up on data that failed to load.
    pub fn overwrite_storage(&mut self) -> Result<(), StorageError> {
        self.storage.save(&self.bookmarks)?;
        if self.save_blocked {
            log::warn!(
                "overwrote unreadable stored bookmarks with {} nodes",
                bookmark::count_nodes(&self.bookmarks)
            );
        }
        self.save_blocked = false;
        Ok(())
    }

    /// Looks up any node by id.
    pub fn find(&self, id: &str) -> Option<&Arc<BookmarkItem>> {
        bookmark::find_by_id(&self.bookmarks, id)
    }

    /// Case-insensitive search over titles and URLs.
    pub fn search(&self, term: &str) -> Vec<&BookmarkSearchResultItem> {
        search_index::search(self.index.entries(), term)
    }

    /// How many times the search index has been computed.
    pub fn index_rebuild_count(&self) -> usize {
        self.index.rebuild_count()
    }

    pub fn limits(&self) -> &LimitSettings {
        &self.limits
    }

    /// Applies new limits and id settings without touching the tree.
    pub fn update_settings(&mut self, settings: &StoreSettings) {
        self.limits = settings.limits.clone();
        self.max_id_attempts = settings.id.max_attempts;
    }

    /// Serializes the selected part of `selection` as a bare JSON array.
    pub fn export_bookmarks(&self, selection: &[ExportableBookmarkItem]) -> Result<String, BookmarkError> {
        let exported = export_selection::filter(selection);
        if exported.is_empty() {
            return Err(BookmarkError::NothingSelected);
        }
        serde_json::to_string(&exported).map_err(|e| BookmarkError::Serialization(e.to_string()))
    }

    /// Validates `text` as an import file and merges all of it.
    pub fn import_from_json(&mut self, text: &str) -> Result<Vec<IdRemap>, BookmarkError> {
        let items = validation::parse_import(text, self.limits.import_title_max)?;
        self.import_bookmarks(&items)
    }

    fn insert_new(
        &mut self,
        make: impl FnOnce(String) -> BookmarkItem,
        parent_id: Option<&str>,
    ) -> Result<Option<String>, BookmarkError> {
        let id = id_allocator::allocate_with_attempts(&self.bookmarks, self.max_id_attempts)?;
        let node = Arc::new(make(id.clone()));
        if self.apply(|tree| tree_mutator::insert(tree, node, parent_id)) {
            Ok(Some(id))
        } else {
            Ok(None)
        }
    }
}

impl BookmarkStoreTrait for BookmarkStore {
    fn bookmarks(&self) -> &[Arc<BookmarkItem>] {
        &self.bookmarks
    }

    fn search_index(&self) -> &[BookmarkSearchResultItem] {
        self.index.entries()
    }

    fn create_bookmark(
        &mut self,
        title: &str,
        url: &str,
        parent_id: Option<&str>,
    ) -> Result<Option<String>, BookmarkError> {
        let errors = validation::validate_bookmark(title, url, &self.limits);
        if !errors.is_empty() {
            return Err(BookmarkError::Validation(errors));
        }
        let (title, url) = (title.trim(), url.trim());
        self.insert_new(|id| BookmarkItem::url(id, title, url), parent_id)
    }

    fn create_folder(&mut self, title: &str, parent_id: Option<&str>) -> Result<Option<String>, BookmarkError> {
        let errors = validation::validate_folder(title, &self.limits);
        if !errors.is_empty() {
            return Err(BookmarkError::Validation(errors));
        }
        let title = title.trim();
        self.insert_new(|id| BookmarkItem::folder(id, title, Vec::new()), parent_id)
    }

    fn edit_bookmark(&mut self, id: &str, new_title: &str, new_url: &str) -> Result<(), BookmarkError> {
        let errors = validation::validate_bookmark(new_title, new_url, &self.limits);
        if !errors.is_empty() {
            return Err(BookmarkError::Validation(errors));
        }
        self.apply(|tree| tree_mutator::edit_bookmark(tree, id, new_title.trim(), new_url.trim()));
        Ok(())
    }

    fn edit_folder(&mut self, id: &str, new_title: &str) -> Result<(), BookmarkError> {
        let errors = validation::validate_folder(new_title, &self.limits);
        if !errors.is_empty() {
            return Err(BookmarkError::Validation(errors));
        }
        self.apply(|tree| tree_mutator::rename_folder(tree, id, new_title.trim()));
        Ok(())
    }

    fn delete_bookmark(&mut self, id: &str) {
        self.apply(|tree| tree_mutator::delete(tree, id));
    }

    fn import_bookmarks(&mut self, items: &[Arc<BookmarkItem>]) -> Result<Vec<IdRemap>, BookmarkError> {
        let outcome = import_merger::merge_with_attempts(&self.bookmarks, items, self.max_id_attempts)?;
        log::info!(
            "importing {} nodes ({} remapped)",
            bookmark::count_nodes(items),
            outcome.remapped.len()
        );
        self.apply(|_| outcome.bookmarks);
        Ok(outcome.remapped)
    }
}
