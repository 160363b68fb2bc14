//! Export and import selection sessions.
//!
//! A session owns a transient exportable copy of a tree. The user toggles
//! nodes, then finishes an export (serialize the selection) or commits an
//! import (merge the selection into the store). Nothing touches the
//! canonical tree until commit.

use std::sync::Arc;

use crate::managers::bookmark_store::{BookmarkStore, BookmarkStoreTrait};
use crate::services::export_selection;
use crate::services::import_merger::IdRemap;
use crate::services::validation;
use crate::types::bookmark::BookmarkItem;
use crate::types::errors::BookmarkError;
use crate::types::export::{ExportSelection, ExportableBookmarkItem};

/// What a session was opened for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransferKind {
    Export,
    Import,
}

impl TransferKind {
    pub fn label(&self) -> &'static str {
        match self {
            TransferKind::Export => "export selection",
            TransferKind::Import => "import selection",
        }
    }
}

#[derive(Debug, Clone)]
pub struct TransferSession {
    kind: TransferKind,
    items: Vec<ExportableBookmarkItem>,
}

impl TransferSession {
    /// Opens an export session over `tree`, with nothing selected.
    pub fn begin_export(tree: &[Arc<BookmarkItem>]) -> Self {
        log::debug!("export session started");
        Self {
            kind: TransferKind::Export,
            items: export_selection::make_exportable(tree),
        }
    }

    /// Opens an import session over the parsed contents of `text`.
    ///
    /// Fails with a single `InvalidImport` if the text is not a valid import file.
    pub fn begin_import(text: &str, max_title: usize) -> Result<Self, BookmarkError> {
        let tree = validation::parse_import(text, max_title)?;
        log::debug!("import session started with {} root entries", tree.len());
        Ok(Self {
            kind: TransferKind::Import,
            items: export_selection::make_exportable(&tree),
        })
    }

    pub fn kind(&self) -> TransferKind {
        self.kind
    }

    pub fn items(&self) -> &[ExportableBookmarkItem] {
        &self.items
    }

    pub fn toggle(&mut self, id: &str, requested: ExportSelection) {
        self.items = export_selection::toggle_at(&self.items, id, requested);
    }

    pub fn select_all(&mut self) {
        self.items = export_selection::set_all(&self.items, ExportSelection::Export);
    }

    pub fn deselect_all(&mut self) {
        self.items = export_selection::set_all(&self.items, ExportSelection::DontExport);
    }

    /// Serializes the selection as a JSON array.
    pub fn finish_export(&self, store: &BookmarkStore) -> Result<String, BookmarkError> {
        let json = store.export_bookmarks(&self.items)?;
        log::info!("export finished ({} bytes)", json.len());
        Ok(json)
    }

    /// Merges the selection into `store`. Returns the remapped ids.
    ///
    /// An empty selection merges nothing.
    pub fn commit_import(&self, store: &mut BookmarkStore) -> Result<Vec<IdRemap>, BookmarkError> {
        let selected = export_selection::filter(&self.items);
        if selected.is_empty() {
            log::debug!("import commit with empty selection");
            return Ok(Vec::new());
        }
        store.import_bookmarks(&selected)
    }
}
