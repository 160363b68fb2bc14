//! Flat search index derived from the bookmark tree.

use std::sync::Arc;

use crate::types::bookmark::{trees_equal, BookmarkItem, BookmarkTree};
use crate::types::search::BookmarkSearchResultItem;

/// Flattens `tree` into one entry per URL node, in depth-first pre-order.
///
/// Each entry carries the titles of its ancestor folders, root first.
/// Folders never produce entries of their own.
pub fn build(tree: &[Arc<BookmarkItem>]) -> Vec<BookmarkSearchResultItem> {
    let mut results = Vec::new();
    let mut hierarchy = Vec::new();
    collect(tree, &mut hierarchy, &mut results);
    results
}

fn collect(
    items: &[Arc<BookmarkItem>],
    hierarchy: &mut Vec<String>,
    results: &mut Vec<BookmarkSearchResultItem>,
) {
    for item in items {
        match item.as_ref() {
            BookmarkItem::Url(bookmark) => results.push(BookmarkSearchResultItem {
                bookmark: bookmark.clone(),
                hierarchy: hierarchy.clone(),
            }),
            BookmarkItem::Folder(folder) => {
                hierarchy.push(folder.title.clone());
                collect(&folder.children, hierarchy, results);
                hierarchy.pop();
            }
        }
    }
}

/// Filters the index by a case-insensitive substring of the bookmark title or URL.
///
/// An empty term matches every entry. Index order is preserved.
pub fn search<'a>(
    index: &'a [BookmarkSearchResultItem],
    term: &str,
) -> Vec<&'a BookmarkSearchResultItem> {
    if term.is_empty() {
        return index.iter().collect();
    }
    let needle = term.to_lowercase();
    index
        .iter()
        .filter(|entry| {
            entry.bookmark.title.to_lowercase().contains(&needle)
                || entry.bookmark.url.to_lowercase().contains(&needle)
        })
        .collect()
}

/// A search index memoized against the tree it was built from.
#[derive(Debug, Default)]
pub struct SearchIndex {
    source: BookmarkTree,
    entries: Vec<BookmarkSearchResultItem>,
    rebuilds: usize,
}

impl SearchIndex {
    /// Builds the index for `tree`.
    pub fn new(tree: &[Arc<BookmarkItem>]) -> Self {
        Self {
            source: tree.to_vec(),
            entries: build(tree),
            rebuilds: 1,
        }
    }

    /// Rebuilds the index if `tree` differs structurally from the tree the
    /// current entries were built from. Returns true if a rebuild happened.
    pub fn refresh(&mut self, tree: &[Arc<BookmarkItem>]) -> bool {
        if trees_equal(&self.source, tree) {
            return false;
        }
        self.source = tree.to_vec();
        self.entries = build(tree);
        self.rebuilds += 1;
        log::debug!("search index rebuilt: {} entries", self.entries.len());
        true
    }

    pub fn entries(&self) -> &[BookmarkSearchResultItem] {
        &self.entries
    }

    /// Number of times the entries have been computed.
    pub fn rebuild_count(&self) -> usize {
        self.rebuilds
    }
}
