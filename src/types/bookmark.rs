use std::cmp::Ordering;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

/// An ordered sequence of top-level bookmark items. There is no implicit root folder.
///
/// Entries are reference-counted so that a mutated tree can share every
/// subtree that lies outside the edited path with its predecessor.
pub type BookmarkTree = Vec<Arc<BookmarkItem>>;

/// A single node in the bookmark tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum BookmarkItem {
    Url(UrlItem),
    Folder(FolderItem),
}

/// A saved link.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UrlItem {
    pub id: String,
    pub title: String,
    pub url: String,
}

/// A folder owning an ordered list of children (insertion order).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FolderItem {
    pub id: String,
    pub title: String,
    pub children: BookmarkTree,
}

/// Persisted state layout: `{ "bookmarks": [...] }`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersistedBookmarks {
    pub bookmarks: BookmarkTree,
}

/// Deserializes JSON text without serde_json's nesting limit.
///
/// Each folder level is two levels of JSON (the object and its `children`
/// array), so the default limit of 128 caps trees at about 63 folders. The
/// stack is grown on demand instead.
pub fn from_json_unbounded<T: serde::de::DeserializeOwned>(text: &str) -> serde_json::Result<T> {
    let mut de = serde_json::Deserializer::from_str(text);
    de.disable_recursion_limit();
    let value = T::deserialize(serde_stacker::Deserializer::new(&mut de))?;
    de.end()?;
    Ok(value)
}

impl BookmarkItem {
    /// Builds a URL node.
    pub fn url(id: impl Into<String>, title: impl Into<String>, url: impl Into<String>) -> Self {
        BookmarkItem::Url(UrlItem {
            id: id.into(),
            title: title.into(),
            url: url.into(),
        })
    }

    /// Builds a folder node with the given children.
    pub fn folder(id: impl Into<String>, title: impl Into<String>, children: BookmarkTree) -> Self {
        BookmarkItem::Folder(FolderItem {
            id: id.into(),
            title: title.into(),
            children,
        })
    }

    pub fn id(&self) -> &str {
        match self {
            BookmarkItem::Url(u) => &u.id,
            BookmarkItem::Folder(f) => &f.id,
        }
    }

    pub fn title(&self) -> &str {
        match self {
            BookmarkItem::Url(u) => &u.title,
            BookmarkItem::Folder(f) => &f.title,
        }
    }

    pub fn is_folder(&self) -> bool {
        matches!(self, BookmarkItem::Folder(_))
    }

    /// Children of a folder; empty for URL nodes.
    pub fn children(&self) -> &[Arc<BookmarkItem>] {
        match self {
            BookmarkItem::Url(_) => &[],
            BookmarkItem::Folder(f) => &f.children,
        }
    }
}

/// Depth-first, pre-order lookup of a node by id.
pub fn find_by_id<'a>(items: &'a [Arc<BookmarkItem>], id: &str) -> Option<&'a Arc<BookmarkItem>> {
    for item in items {
        if item.id() == id {
            return Some(item);
        }
        if let Some(found) = find_by_id(item.children(), id) {
            return Some(found);
        }
    }
    None
}

/// Total number of nodes (URLs and folders) in the tree.
pub fn count_nodes(items: &[Arc<BookmarkItem>]) -> usize {
    items
        .iter()
        .map(|item| 1 + count_nodes(item.children()))
        .sum()
}

/// Cheap structural equality between two tree versions.
///
/// Entries that are the same allocation are equal without descending;
/// the rest fall back to deep comparison.
pub fn trees_equal(a: &[Arc<BookmarkItem>], b: &[Arc<BookmarkItem>]) -> bool {
    a.len() == b.len()
        && a
            .iter()
            .zip(b.iter())
            .all(|(x, y)| Arc::ptr_eq(x, y) || x == y)
}

/// Returns a sibling sequence ordered for display: URL entries first, then
/// folders, each group by case-insensitive title. Ties keep insertion order.
///
/// The underlying sequence is left untouched.
pub fn display_order(items: &[Arc<BookmarkItem>]) -> Vec<&Arc<BookmarkItem>> {
    let mut ordered: Vec<&Arc<BookmarkItem>> = items.iter().collect();
    ordered.sort_by(|a, b| match (a.is_folder(), b.is_folder()) {
        (false, true) => Ordering::Less,
        (true, false) => Ordering::Greater,
        _ => a.title().to_lowercase().cmp(&b.title().to_lowercase()),
    });
    ordered
}
