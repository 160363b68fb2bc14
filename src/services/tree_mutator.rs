//! Pure structural edits over a bookmark tree.
//!
//! Every operation returns a new root sequence. Only the nodes on the path
//! from the root to the edited node are reallocated; all other subtrees are
//! the same `Arc` allocations as in the input. Traversal is depth-first,
//! pre-order, and stops at the first match. A missing target leaves the tree
//! unchanged.

use std::sync::Arc;

use crate::types::bookmark::{BookmarkItem, BookmarkTree, FolderItem, UrlItem};

/// Appends `new_node` to the folder `parent_id`, or to the root when `parent_id` is `None`.
pub fn insert(
    tree: &[Arc<BookmarkItem>],
    new_node: Arc<BookmarkItem>,
    parent_id: Option<&str>,
) -> BookmarkTree {
    let Some(parent_id) = parent_id else {
        let mut out = tree.to_vec();
        out.push(new_node);
        return out;
    };

    let updated = update_first(tree, &|item: &BookmarkItem| match item {
        BookmarkItem::Folder(folder) if folder.id == parent_id => {
            let mut children = folder.children.clone();
            children.push(Arc::clone(&new_node));
            Some(BookmarkItem::Folder(FolderItem {
                id: folder.id.clone(),
                title: folder.title.clone(),
                children,
            }))
        }
        _ => None,
    });

    updated.unwrap_or_else(|| {
        log::debug!("insert: parent folder {} not found, tree unchanged", parent_id);
        tree.to_vec()
    })
}

/// Replaces the title of the URL node `id`.
pub fn rename(tree: &[Arc<BookmarkItem>], id: &str, new_title: &str) -> BookmarkTree {
    edit_url_node(tree, id, new_title, None)
}

/// Replaces the title and URL of the URL node `id`.
pub fn edit_bookmark(
    tree: &[Arc<BookmarkItem>],
    id: &str,
    new_title: &str,
    new_url: &str,
) -> BookmarkTree {
    edit_url_node(tree, id, new_title, Some(new_url))
}

/// Replaces the title of the folder `id`. Children are shared unchanged.
pub fn rename_folder(tree: &[Arc<BookmarkItem>], id: &str, new_title: &str) -> BookmarkTree {
    let updated = update_first(tree, &|item: &BookmarkItem| match item {
        BookmarkItem::Folder(folder) if folder.id == id => Some(BookmarkItem::Folder(FolderItem {
            id: folder.id.clone(),
            title: new_title.to_string(),
            children: folder.children.clone(),
        })),
        _ => None,
    });

    updated.unwrap_or_else(|| {
        log::debug!("rename_folder: folder {} not found, tree unchanged", id);
        tree.to_vec()
    })
}

/// Removes the node `id` (URL or folder, with all descendants).
pub fn delete(tree: &[Arc<BookmarkItem>], id: &str) -> BookmarkTree {
    remove_first(tree, id).unwrap_or_else(|| {
        log::debug!("delete: node {} not found, tree unchanged", id);
        tree.to_vec()
    })
}

fn edit_url_node(
    tree: &[Arc<BookmarkItem>],
    id: &str,
    new_title: &str,
    new_url: Option<&str>,
) -> BookmarkTree {
    let updated = update_first(tree, &|item: &BookmarkItem| match item {
        BookmarkItem::Url(bookmark) if bookmark.id == id => Some(BookmarkItem::Url(UrlItem {
            id: bookmark.id.clone(),
            title: new_title.to_string(),
            url: new_url.map_or_else(|| bookmark.url.clone(), str::to_string),
        })),
        _ => None,
    });

    updated.unwrap_or_else(|| {
        log::debug!("edit: bookmark {} not found, tree unchanged", id);
        tree.to_vec()
    })
}

/// Finds the first node for which `replace` yields a replacement and rebuilds
/// only its ancestors. Returns `None` when nothing matched.
fn update_first<F>(items: &[Arc<BookmarkItem>], replace: &F) -> Option<BookmarkTree>
where
    F: Fn(&BookmarkItem) -> Option<BookmarkItem>,
{
    for (idx, item) in items.iter().enumerate() {
        let replacement = match replace(item.as_ref()) {
            Some(updated) => Some(Arc::new(updated)),
            None => match item.as_ref() {
                BookmarkItem::Folder(folder) => {
                    update_first(&folder.children, replace).map(|children| {
                        Arc::new(BookmarkItem::Folder(FolderItem {
                            id: folder.id.clone(),
                            title: folder.title.clone(),
                            children,
                        }))
                    })
                }
                BookmarkItem::Url(_) => None,
            },
        };

        if let Some(replacement) = replacement {
            let mut out = items.to_vec();
            out[idx] = replacement;
            return Some(out);
        }
    }
    None
}

fn remove_first(items: &[Arc<BookmarkItem>], id: &str) -> Option<BookmarkTree> {
    for (idx, item) in items.iter().enumerate() {
        if item.id() == id {
            let mut out = items.to_vec();
            out.remove(idx);
            return Some(out);
        }

        if let BookmarkItem::Folder(folder) = item.as_ref() {
            if let Some(children) = remove_first(&folder.children, id) {
                let mut out = items.to_vec();
                out[idx] = Arc::new(BookmarkItem::Folder(FolderItem {
                    id: folder.id.clone(),
                    title: folder.title.clone(),
                    children,
                }));
                return Some(out);
            }
        }
    }
    None
}
