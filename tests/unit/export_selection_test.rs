//! Unit tests for the tri-state export selection engine.

use std::sync::Arc;

use marktree::services::export_selection::{self, derive_state, filter, find, make_exportable, set_all, toggle_at};
use marktree::types::bookmark::{BookmarkItem, BookmarkTree};
use marktree::types::export::{ExportSelection, ExportableBookmarkItem};
use rstest::rstest;

use ExportSelection::{DontExport, Export, PartialExport};

fn url(id: &str) -> Arc<BookmarkItem> {
    Arc::new(BookmarkItem::url(id, id.to_uppercase(), format!("https://{}.example.com", id)))
}

fn folder(id: &str, children: BookmarkTree) -> Arc<BookmarkItem> {
    Arc::new(BookmarkItem::folder(id, id.to_uppercase(), children))
}

/// `root[ a, b, sub[ c, d ], empty[] ]`, plus a lone link `z` at the top level.
fn sample() -> Vec<ExportableBookmarkItem> {
    make_exportable(&[
        folder(
            "root",
            vec![url("a"), url("b"), folder("sub", vec![url("c"), url("d")]), folder("empty", Vec::new())],
        ),
        url("z"),
    ])
}

fn state(items: &[ExportableBookmarkItem], id: &str) -> ExportSelection {
    find(items, id).map(|item| item.export).unwrap_or_else(|| panic!("no node {}", id))
}

#[test]
fn test_make_exportable_starts_unselected() {
    let items = sample();
    for id in ["root", "a", "b", "sub", "c", "d", "empty", "z"] {
        assert_eq!(state(&items, id), DontExport, "{} should start as DontExport", id);
    }
}

/// Two URL children: the folder state follows the combination of the children.
#[rstest]
#[case(Export, Export, Export)]
#[case(Export, DontExport, PartialExport)]
#[case(DontExport, Export, PartialExport)]
#[case(DontExport, DontExport, DontExport)]
fn test_partial_propagation(
    #[case] first: ExportSelection,
    #[case] second: ExportSelection,
    #[case] expected: ExportSelection,
) {
    let items = make_exportable(&[folder("f", vec![url("x"), url("y")])]);
    let items = toggle_at(&items, "x", first);
    let items = toggle_at(&items, "y", second);
    assert_eq!(state(&items, "f"), expected);
}

/// Selecting a leaf deep in the tree updates every ancestor.
#[test]
fn test_toggle_bubbles_to_all_ancestors() {
    let items = toggle_at(&sample(), "c", Export);
    assert_eq!(state(&items, "c"), Export);
    assert_eq!(state(&items, "sub"), PartialExport);
    assert_eq!(state(&items, "root"), PartialExport);
    assert_eq!(state(&items, "z"), DontExport);

    let items = toggle_at(&items, "d", Export);
    assert_eq!(state(&items, "sub"), Export);
    assert_eq!(state(&items, "root"), PartialExport);
}

#[test]
fn test_folder_export_cascades_to_descendants() {
    let items = toggle_at(&sample(), "root", Export);
    for id in ["root", "a", "b", "sub", "c", "d", "empty"] {
        assert_eq!(state(&items, id), Export, "{} should be selected", id);
    }
    assert_eq!(state(&items, "z"), DontExport);

    let items = toggle_at(&items, "sub", DontExport);
    assert_eq!(state(&items, "c"), DontExport);
    assert_eq!(state(&items, "d"), DontExport);
    assert_eq!(state(&items, "root"), PartialExport);
}

/// Partial is never applied to a leaf.
#[test]
fn test_partial_request_on_url_is_ignored() {
    let items = toggle_at(&sample(), "a", Export);
    let after = toggle_at(&items, "a", PartialExport);
    assert_eq!(state(&after, "a"), Export);
    assert_eq!(after, items);
}

/// Partial on a folder only re-derives the folder from its children.
#[test]
fn test_partial_request_on_folder_rederives() {
    let items = toggle_at(&sample(), "c", Export);
    let after = toggle_at(&items, "sub", PartialExport);
    assert_eq!(state(&after, "sub"), PartialExport);
    assert_eq!(state(&after, "c"), Export);
    assert_eq!(state(&after, "d"), DontExport);

    let empty = toggle_at(&items, "empty", PartialExport);
    assert_eq!(state(&empty, "empty"), DontExport);
}

#[test]
fn test_toggle_unknown_id_is_noop() {
    let items = sample();
    assert_eq!(toggle_at(&items, "ghost", Export), items);
}

#[test]
fn test_empty_folder_never_derives_partial_or_export() {
    assert_eq!(derive_state(&[]), DontExport);
}

#[test]
fn test_set_all_and_partial_rejection() {
    let all = set_all(&sample(), Export);
    for id in ["root", "a", "sub", "empty", "z"] {
        assert_eq!(state(&all, id), Export);
    }
    let none = set_all(&all, DontExport);
    assert_eq!(none, sample());
    assert_eq!(set_all(&all, PartialExport), all);
}

#[test]
fn test_filter_keeps_selected_paths_only() {
    let items = toggle_at(&sample(), "c", Export);
    let items = toggle_at(&items, "z", Export);
    let exported = filter(&items);

    assert_eq!(exported.len(), 2);
    let root = &exported[0];
    assert_eq!(root.id(), "root");
    assert_eq!(root.children().len(), 1);
    let sub = &root.children()[0];
    assert_eq!(sub.id(), "sub");
    assert_eq!(sub.children().len(), 1);
    assert_eq!(sub.children()[0].id(), "c");
    assert_eq!(exported[1].id(), "z");
}

/// An explicitly selected empty folder is exported as an empty folder.
#[test]
fn test_filter_keeps_selected_empty_folder() {
    let items = toggle_at(&sample(), "empty", Export);
    assert_eq!(state(&items, "root"), PartialExport);

    let exported = filter(&items);
    let root = &exported[0];
    assert_eq!(root.children().len(), 1);
    assert_eq!(root.children()[0].id(), "empty");
    assert!(root.children()[0].is_folder());
}

#[test]
fn test_filter_with_nothing_selected_is_empty() {
    assert!(export_selection::filter(&sample()).is_empty());
}

#[test]
fn test_exportable_serializes_with_export_field() {
    let items = make_exportable(&[url("a")]);
    let value = serde_json::to_value(&items).unwrap();
    assert_eq!(value[0]["type"], "url");
    assert_eq!(value[0]["url"], "https://a.example.com");
    assert_eq!(value[0]["export"], "dont_export");
}
