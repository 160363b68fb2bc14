//! Merges an imported tree into the current one without id collisions.
//!
//! Incoming nodes whose id is already taken (by the current tree, or by an
//! earlier node of the same import) receive a fresh id. The decision is made
//! per node: remapping a folder does not remap its children. The remapped
//! incoming nodes are appended to the root of the current tree.
//!
//! Every rewrite is reported in import order. An import may repeat an id any
//! number of times, so the same `old_id` can appear in several entries.

use std::collections::HashSet;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::services::id_allocator::{self, DEFAULT_MAX_ATTEMPTS};
use crate::types::bookmark::{BookmarkItem, BookmarkTree, FolderItem, UrlItem};
use crate::types::errors::BookmarkError;

/// One incoming node whose id was replaced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdRemap {
    pub old_id: String,
    pub new_id: String,
}

/// Result of a merge: the new tree and the ids that had to change.
#[derive(Debug, Clone, PartialEq)]
pub struct MergeOutcome {
    pub bookmarks: BookmarkTree,
    /// One entry per remapped incoming node, in import order.
    pub remapped: Vec<IdRemap>,
}

impl MergeOutcome {
    /// New ids given to incoming nodes that carried `old_id`, in import order.
    pub fn new_ids_for<'a>(&'a self, old_id: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        self.remapped
            .iter()
            .filter(move |r| r.old_id == old_id)
            .map(|r| r.new_id.as_str())
    }
}

/// Merges `incoming` into `current`, appending it at the root.
pub fn merge(
    current: &[Arc<BookmarkItem>],
    incoming: &[Arc<BookmarkItem>],
) -> Result<BookmarkTree, BookmarkError> {
    merge_with_attempts(current, incoming, DEFAULT_MAX_ATTEMPTS).map(|outcome| outcome.bookmarks)
}

/// Like [`merge`], reporting the remapped ids and using a custom retry bound.
pub fn merge_with_attempts(
    current: &[Arc<BookmarkItem>],
    incoming: &[Arc<BookmarkItem>],
    max_attempts: usize,
) -> Result<MergeOutcome, BookmarkError> {
    let mut taken = HashSet::new();
    id_allocator::collect_ids(current, &mut taken);

    let mut remapped = Vec::new();
    let mut bookmarks = current.to_vec();
    for item in incoming {
        bookmarks.push(remap(item, &mut taken, &mut remapped, max_attempts)?);
    }

    if !remapped.is_empty() {
        log::info!("import: remapped {} conflicting ids", remapped.len());
    }
    Ok(MergeOutcome { bookmarks, remapped })
}

fn remap(
    item: &BookmarkItem,
    taken: &mut HashSet<String>,
    remapped: &mut Vec<IdRemap>,
    max_attempts: usize,
) -> Result<Arc<BookmarkItem>, BookmarkError> {
    let id = if taken.contains(item.id()) {
        let fresh = id_allocator::allocate_excluding(taken, max_attempts)?;
        log::debug!("import: id {} already taken, assigned {}", item.id(), fresh);
        remapped.push(IdRemap {
            old_id: item.id().to_string(),
            new_id: fresh.clone(),
        });
        fresh
    } else {
        item.id().to_string()
    };
    taken.insert(id.clone());

    let node = match item {
        BookmarkItem::Url(bookmark) => BookmarkItem::Url(UrlItem {
            id,
            title: bookmark.title.clone(),
            url: bookmark.url.clone(),
        }),
        BookmarkItem::Folder(folder) => {
            let mut children = Vec::with_capacity(folder.children.len());
            for child in &folder.children {
                children.push(remap(child, taken, remapped, max_attempts)?);
            }
            BookmarkItem::Folder(FolderItem {
                id,
                title: folder.title.clone(),
                children,
            })
        }
    };
    Ok(Arc::new(node))
}
