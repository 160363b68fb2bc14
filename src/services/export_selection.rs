//! Tri-state export/import selection over a cloned bookmark tree.
//!
//! A folder's state is either set explicitly (which cascades to all of its
//! descendants) or derived from its children after they have been updated.
//! `PartialExport` is never applied as requested: on a URL node the request
//! is ignored, on a folder it re-derives the folder's state.

use std::sync::Arc;

use crate::types::bookmark::{BookmarkItem, BookmarkTree};
use crate::types::export::{ExportSelection, ExportableBookmarkItem, ExportableKind};

/// Clones `tree` into exportable form with every node set to `DontExport`.
pub fn make_exportable(tree: &[Arc<BookmarkItem>]) -> Vec<ExportableBookmarkItem> {
    tree.iter().map(|item| make_exportable_item(item)).collect()
}

fn make_exportable_item(item: &BookmarkItem) -> ExportableBookmarkItem {
    let kind = match item {
        BookmarkItem::Url(bookmark) => ExportableKind::Url {
            url: bookmark.url.clone(),
        },
        BookmarkItem::Folder(folder) => ExportableKind::Folder {
            children: make_exportable(&folder.children),
        },
    };
    ExportableBookmarkItem {
        id: item.id().to_string(),
        title: item.title().to_string(),
        kind,
        export: ExportSelection::DontExport,
    }
}

/// Forces every node to `state`. Only `Export` and `DontExport` are accepted;
/// a `PartialExport` request returns the items unchanged.
pub fn set_all(
    items: &[ExportableBookmarkItem],
    state: ExportSelection,
) -> Vec<ExportableBookmarkItem> {
    if state == ExportSelection::PartialExport {
        log::warn!("set_all: partial export cannot be set directly, ignoring");
        return items.to_vec();
    }
    items.iter().map(|item| with_state_deep(item, state)).collect()
}

fn with_state_deep(item: &ExportableBookmarkItem, state: ExportSelection) -> ExportableBookmarkItem {
    let kind = match &item.kind {
        ExportableKind::Url { url } => ExportableKind::Url { url: url.clone() },
        ExportableKind::Folder { children } => ExportableKind::Folder {
            children: children.iter().map(|c| with_state_deep(c, state)).collect(),
        },
    };
    ExportableBookmarkItem {
        id: item.id.clone(),
        title: item.title.clone(),
        kind,
        export: state,
    }
}

/// Applies `requested` to the node `id` and reconciles every ancestor.
///
/// Unknown ids leave the items unchanged.
pub fn toggle_at(
    items: &[ExportableBookmarkItem],
    id: &str,
    requested: ExportSelection,
) -> Vec<ExportableBookmarkItem> {
    toggle_in(items, id, requested).unwrap_or_else(|| {
        log::debug!("toggle_at: node {} not found", id);
        items.to_vec()
    })
}

/// Returns the updated sibling list if the target lies in `items` or below.
fn toggle_in(
    items: &[ExportableBookmarkItem],
    id: &str,
    requested: ExportSelection,
) -> Option<Vec<ExportableBookmarkItem>> {
    for (idx, item) in items.iter().enumerate() {
        if let Some(updated) = toggle_item(item, id, requested) {
            let mut out = items.to_vec();
            out[idx] = updated;
            return Some(out);
        }
    }
    None
}

// Post-order: children come back reconciled before the folder derives its own state.
fn toggle_item(
    item: &ExportableBookmarkItem,
    id: &str,
    requested: ExportSelection,
) -> Option<ExportableBookmarkItem> {
    if item.id == id {
        return Some(apply_request(item, requested));
    }

    let ExportableKind::Folder { children } = &item.kind else {
        return None;
    };
    let children = toggle_in(children, id, requested)?;
    let export = derive_state(&children);
    Some(ExportableBookmarkItem {
        id: item.id.clone(),
        title: item.title.clone(),
        kind: ExportableKind::Folder { children },
        export,
    })
}

fn apply_request(item: &ExportableBookmarkItem, requested: ExportSelection) -> ExportableBookmarkItem {
    match (&item.kind, requested) {
        (ExportableKind::Url { .. }, ExportSelection::PartialExport) => {
            log::debug!("toggle_at: partial export ignored for url {}", item.id);
            item.clone()
        }
        (ExportableKind::Url { .. }, state) => ExportableBookmarkItem {
            export: state,
            ..item.clone()
        },
        (ExportableKind::Folder { children }, ExportSelection::PartialExport) => {
            ExportableBookmarkItem {
                export: derive_state(children),
                ..item.clone()
            }
        }
        (ExportableKind::Folder { .. }, state) => with_state_deep(item, state),
    }
}

/// State of a folder computed from its already-reconciled children.
///
/// An empty folder derives `DontExport`.
pub fn derive_state(children: &[ExportableBookmarkItem]) -> ExportSelection {
    if children.is_empty() {
        return ExportSelection::DontExport;
    }
    if children.iter().all(|c| c.export == ExportSelection::Export) {
        ExportSelection::Export
    } else if children.iter().all(|c| c.export == ExportSelection::DontExport) {
        ExportSelection::DontExport
    } else {
        ExportSelection::PartialExport
    }
}

/// Keeps selected URL nodes and selected or partially selected folders,
/// stripping the selection annotation.
pub fn filter(items: &[ExportableBookmarkItem]) -> BookmarkTree {
    items
        .iter()
        .filter_map(|item| match (&item.kind, item.export) {
            (ExportableKind::Url { url }, ExportSelection::Export) => Some(Arc::new(
                BookmarkItem::url(item.id.clone(), item.title.clone(), url.clone()),
            )),
            (
                ExportableKind::Folder { children },
                ExportSelection::Export | ExportSelection::PartialExport,
            ) => Some(Arc::new(BookmarkItem::folder(
                item.id.clone(),
                item.title.clone(),
                filter(children),
            ))),
            _ => None,
        })
        .collect()
}

/// Looks up an exportable node by id.
pub fn find<'a>(items: &'a [ExportableBookmarkItem], id: &str) -> Option<&'a ExportableBookmarkItem> {
    for item in items {
        if item.id == id {
            return Some(item);
        }
        if let Some(found) = find(item.children(), id) {
            return Some(found);
        }
    }
    None
}
