//! Property-based tests for tree mutation, id allocation, merging and the
//! search index.
//!
//! Trees are generated as random shapes of folders and links; ids are
//! assigned sequentially so every generated tree starts out collision-free.

use std::collections::HashSet;
use std::sync::Arc;

use marktree::services::{id_allocator, import_merger, search_index, tree_mutator};
use marktree::types::bookmark::{self, BookmarkItem, BookmarkTree};
use proptest::prelude::*;

#[derive(Debug, Clone)]
enum Shape {
    Url(String),
    Folder(String, Vec<Shape>),
}

fn arb_title() -> impl Strategy<Value = String> {
    "[a-zA-Z][a-zA-Z0-9 ]{0,10}"
}

fn arb_shape() -> impl Strategy<Value = Shape> {
    let leaf = arb_title().prop_map(Shape::Url);
    leaf.prop_recursive(4, 40, 5, |inner| {
        (arb_title(), prop::collection::vec(inner, 0..5))
            .prop_map(|(title, children)| Shape::Folder(title, children))
    })
}

fn arb_tree() -> impl Strategy<Value = BookmarkTree> {
    prop::collection::vec(arb_shape(), 0..6).prop_map(|shapes| {
        let mut next = 0;
        build(&shapes, &mut next)
    })
}

fn build(shapes: &[Shape], next: &mut usize) -> BookmarkTree {
    shapes
        .iter()
        .map(|shape| {
            *next += 1;
            let id = format!("n{}", next);
            match shape {
                Shape::Url(title) => Arc::new(BookmarkItem::url(
                    id.clone(),
                    title.clone(),
                    format!("https://{}.example.com", id),
                )),
                Shape::Folder(title, children) => {
                    let children = build(children, next);
                    Arc::new(BookmarkItem::folder(id, title.clone(), children))
                }
            }
        })
        .collect()
}

fn all_ids(tree: &[Arc<BookmarkItem>]) -> Vec<String> {
    let mut out = Vec::new();
    walk(tree, &mut |item, _| out.push(item.id().to_string()), &mut Vec::new());
    out
}

fn folder_ids(tree: &[Arc<BookmarkItem>]) -> Vec<String> {
    let mut out = Vec::new();
    walk(
        tree,
        &mut |item, _| {
            if item.is_folder() {
                out.push(item.id().to_string());
            }
        },
        &mut Vec::new(),
    );
    out
}

/// Pre-order walk handing each node its ancestor titles.
fn walk<F: FnMut(&BookmarkItem, &[String])>(
    tree: &[Arc<BookmarkItem>],
    visit: &mut F,
    path: &mut Vec<String>,
) {
    for item in tree {
        visit(item, path);
        if item.is_folder() {
            path.push(item.title().to_string());
            walk(item.children(), visit, path);
            path.pop();
        }
    }
}

fn contains(item: &Arc<BookmarkItem>, id: &str) -> bool {
    bookmark::find_by_id(std::slice::from_ref(item), id).is_some()
}

/// Every subtree that does not contain `target` must be the same allocation
/// in `new`. With `removed`, the target slot is expected to be gone.
fn assert_shared(
    old: &[Arc<BookmarkItem>],
    new: &[Arc<BookmarkItem>],
    target: &str,
    removed: bool,
) -> Result<(), TestCaseError> {
    let old_kept: Vec<&Arc<BookmarkItem>> = old
        .iter()
        .filter(|o| !(removed && o.id() == target))
        .collect();
    for (o, n) in old_kept.into_iter().zip(new.iter()) {
        if !contains(o, target) {
            prop_assert!(Arc::ptr_eq(o, n), "node {} should be shared", o.id());
        } else if o.id() != target {
            prop_assert!(!Arc::ptr_eq(o, n), "ancestor {} should be rebuilt", o.id());
            assert_shared(o.children(), n.children(), target, removed)?;
        }
    }
    Ok(())
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    /// Inserting freshly allocated nodes anywhere never produces duplicate ids.
    #[test]
    fn inserted_ids_stay_unique(tree in arb_tree(), picks in prop::collection::vec(any::<usize>(), 1..12)) {
        let mut tree = tree;
        for pick in picks {
            let folders = folder_ids(&tree);
            let parent = if folders.is_empty() || pick % 3 == 0 {
                None
            } else {
                Some(folders[pick % folders.len()].clone())
            };
            let id = id_allocator::allocate(&tree).unwrap();
            prop_assert!(!id_allocator::is_id_taken(&tree, &id));
            let node = Arc::new(BookmarkItem::url(id, "New", "https://new.example.com"));
            tree = tree_mutator::insert(&tree, node, parent.as_deref());
        }
        let ids = all_ids(&tree);
        let unique: HashSet<&String> = ids.iter().collect();
        prop_assert_eq!(unique.len(), ids.len());
    }

    /// Insert reallocates only the parent path.
    #[test]
    fn insert_shares_nodes_off_the_path(tree in arb_tree(), pick in any::<usize>()) {
        let folders = folder_ids(&tree);
        prop_assume!(!folders.is_empty());
        let parent = &folders[pick % folders.len()];
        let node = Arc::new(BookmarkItem::url("fresh", "Fresh", "https://fresh.example.com"));

        let updated = tree_mutator::insert(&tree, node, Some(parent));
        prop_assert_eq!(bookmark::count_nodes(&updated), bookmark::count_nodes(&tree) + 1);
        assert_shared(&tree, &updated, parent, false)?;
    }

    /// Renames reallocate only the target and its ancestors.
    #[test]
    fn rename_shares_nodes_off_the_path(tree in arb_tree(), pick in any::<usize>()) {
        let ids = all_ids(&tree);
        prop_assume!(!ids.is_empty());
        let target = &ids[pick % ids.len()];
        let is_folder = bookmark::find_by_id(&tree, target).map(|n| n.is_folder()).unwrap_or(false);

        let updated = if is_folder {
            tree_mutator::rename_folder(&tree, target, "Renamed")
        } else {
            tree_mutator::rename(&tree, target, "Renamed")
        };
        let renamed = bookmark::find_by_id(&updated, target).unwrap();
        prop_assert_eq!(renamed.title(), "Renamed");
        assert_shared(&tree, &updated, target, false)?;
    }

    /// Delete removes the target with its subtree and shares everything else.
    #[test]
    fn delete_shares_nodes_off_the_path(tree in arb_tree(), pick in any::<usize>()) {
        let ids = all_ids(&tree);
        prop_assume!(!ids.is_empty());
        let target = &ids[pick % ids.len()];
        let removed = bookmark::count_nodes(std::slice::from_ref(bookmark::find_by_id(&tree, target).unwrap()));

        let updated = tree_mutator::delete(&tree, target);
        prop_assert!(bookmark::find_by_id(&updated, target).is_none());
        prop_assert_eq!(bookmark::count_nodes(&updated), bookmark::count_nodes(&tree) - removed);
        assert_shared(&tree, &updated, target, true)?;
    }

    /// Deleting an absent id returns a deep-equal tree.
    #[test]
    fn delete_absent_id_is_identity(tree in arb_tree()) {
        let updated = tree_mutator::delete(&tree, "not-a-node");
        prop_assert_eq!(&updated, &tree);
        let again = tree_mutator::delete(&updated, "not-a-node");
        prop_assert_eq!(again, updated);
    }

    /// Importing a tree into itself keeps every node, and all ids end up distinct.
    #[test]
    fn self_merge_keeps_everything_with_unique_ids(tree in arb_tree()) {
        let outcome = import_merger::merge_with_attempts(&tree, &tree, 16).unwrap();
        let ids = all_ids(&outcome.bookmarks);
        prop_assert_eq!(ids.len(), 2 * bookmark::count_nodes(&tree));
        let unique: HashSet<&String> = ids.iter().collect();
        prop_assert_eq!(unique.len(), ids.len());
        prop_assert_eq!(outcome.remapped.len(), bookmark::count_nodes(&tree));
        // The current side is kept as-is.
        for (old, merged) in tree.iter().zip(outcome.bookmarks.iter()) {
            prop_assert!(Arc::ptr_eq(old, merged));
        }
    }

    /// One index entry per URL, with the ancestor folder titles as hierarchy.
    #[test]
    fn search_index_matches_tree(tree in arb_tree()) {
        let mut expected = Vec::new();
        walk(
            &tree,
            &mut |item, path| {
                if !item.is_folder() {
                    expected.push((item.id().to_string(), path.to_vec()));
                }
            },
            &mut Vec::new(),
        );

        let index = search_index::build(&tree);
        let actual: Vec<(String, Vec<String>)> = index
            .iter()
            .map(|entry| (entry.bookmark.id.clone(), entry.hierarchy.clone()))
            .collect();
        prop_assert_eq!(actual, expected);
    }

    /// An empty search term returns the whole index; any URL title finds its own entry.
    #[test]
    fn search_finds_every_title(tree in arb_tree()) {
        let index = search_index::build(&tree);
        prop_assert_eq!(search_index::search(&index, "").len(), index.len());
        for entry in &index {
            let hits = search_index::search(&index, &entry.bookmark.title.to_uppercase());
            prop_assert!(hits.iter().any(|hit| hit.bookmark.id == entry.bookmark.id));
        }
    }
}
