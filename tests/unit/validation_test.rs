//! Unit tests for form validation and import schema validation.

use marktree::services::validation::{
    is_valid_url, parse_import, validate_bookmark, validate_folder, validate_import_json,
};
use marktree::types::errors::BookmarkError;
use marktree::types::settings::LimitSettings;
use rstest::rstest;
use serde_json::json;

fn limits() -> LimitSettings {
    LimitSettings::default()
}

// ─── Bookmark form ───

#[rstest]
#[case("Rust", "https://www.rust-lang.org", &[])]
#[case("  Rust  ", "  https://www.rust-lang.org  ", &[])]
#[case("", "https://www.rust-lang.org", &["Bookmark name is required"])]
#[case("   ", "https://www.rust-lang.org", &["Bookmark name is required"])]
#[case("Rust", "", &["URL is required"])]
#[case("Rust", "www.rust-lang.org", &["Invalid URL"])]
#[case("", "not a url", &["Bookmark name is required", "Invalid URL"])]
fn test_validate_bookmark(#[case] title: &str, #[case] url: &str, #[case] expected: &[&str]) {
    assert_eq!(validate_bookmark(title, url, &limits()), expected);
}

#[test]
fn test_bookmark_title_length_boundary() {
    let ok = "a".repeat(70);
    assert!(validate_bookmark(&ok, "https://a.example", &limits()).is_empty());

    let long = "a".repeat(71);
    assert_eq!(
        validate_bookmark(&long, "https://a.example", &limits()),
        vec!["Bookmark name is too long. Max: 70 characters"]
    );
}

/// Length counts characters, not bytes.
#[test]
fn test_title_length_counts_chars() {
    let title = "é".repeat(70);
    assert!(validate_bookmark(&title, "https://a.example", &limits()).is_empty());
}

#[test]
fn test_custom_limits_apply() {
    let limits = LimitSettings {
        bookmark_title_max: 5,
        folder_title_max: 3,
        import_title_max: 10,
    };
    assert_eq!(
        validate_bookmark("Sixsix", "https://a.example", &limits),
        vec!["Bookmark name is too long. Max: 5 characters"]
    );
    assert_eq!(
        validate_folder("Four", &limits),
        vec!["Folder name is too long. Max: 3 characters"]
    );
}

// ─── Folder form ───

#[rstest]
#[case("Work", &[])]
#[case("", &["Folder name is required"])]
#[case(" \t ", &["Folder name is required"])]
fn test_validate_folder(#[case] title: &str, #[case] expected: &[&str]) {
    assert_eq!(validate_folder(title, &limits()), expected);
}

#[test]
fn test_folder_title_length_boundary() {
    assert!(validate_folder(&"f".repeat(50), &limits()).is_empty());
    assert_eq!(
        validate_folder(&"f".repeat(51), &limits()),
        vec!["Folder name is too long. Max: 50 characters"]
    );
}

// ─── URL syntax ───

#[rstest]
#[case("https://example.com", true)]
#[case("http://localhost:8080/path?q=1", true)]
#[case("ftp://files.example.com", true)]
#[case("mailto:someone@example.com", true)]
#[case("example.com", false)]
#[case("/relative/path", false)]
#[case("", false)]
fn test_is_valid_url(#[case] url: &str, #[case] expected: bool) {
    assert_eq!(is_valid_url(url), expected);
}

// ─── Import schema ───

#[test]
fn test_valid_nested_import() {
    let value = json!([
        {"id": "f", "title": "Folder", "type": "folder", "children": [
            {"id": "u", "title": "Link", "type": "url", "url": "https://a.example"},
            {"id": "g", "title": "Empty", "type": "folder", "children": []}
        ]}
    ]);
    assert!(validate_import_json(&value, 128).is_ok());
}

#[rstest]
#[case(json!({"id": "x"}), "expected an array")]
#[case(json!([42]), "[0]: expected an object")]
#[case(json!([{"id": "", "title": "T", "type": "url", "url": "https://a.example"}]), "[0].id")]
#[case(json!([{"id": "a", "title": "", "type": "url", "url": "https://a.example"}]), "[0].title")]
#[case(json!([{"id": "a", "title": "T", "type": "link", "url": "https://a.example"}]), "[0].type")]
#[case(json!([{"id": "a", "title": "T", "type": "url", "url": "nope"}]), "[0].url")]
#[case(json!([{"id": "a", "title": "T", "type": "url"}]), "[0].url")]
#[case(json!([{"id": "a", "title": "T", "type": "folder"}]), "[0].children")]
#[case(
    json!([{"id": "f", "title": "F", "type": "folder", "children": [
        {"id": "a", "title": "A", "type": "url", "url": "https://a.example"},
        {"id": "b", "title": "B", "type": "url", "url": "https://b.example"},
        {"id": "c", "title": "C", "type": "url", "url": "bad"}
    ]}]),
    "[0].children[2].url"
)]
fn test_invalid_import_reports_path(#[case] value: serde_json::Value, #[case] expected: &str) {
    let err = validate_import_json(&value, 128).unwrap_err();
    assert!(err.contains(expected), "{:?} should mention {:?}", err, expected);
}

#[test]
fn test_import_title_limit() {
    let title = "t".repeat(129);
    let value = json!([{"id": "a", "title": title, "type": "url", "url": "https://a.example"}]);
    assert!(validate_import_json(&value, 128).is_err());
    assert!(validate_import_json(&value, 200).is_ok());
}

#[test]
fn test_parse_import_builds_tree() {
    let text = r#"[{"id":"f","title":"F","type":"folder","children":[{"id":"u","title":"U","type":"url","url":"https://u.example"}]}]"#;
    let tree = parse_import(text, 128).unwrap();
    assert_eq!(tree.len(), 1);
    assert_eq!(tree[0].children()[0].id(), "u");
}

#[test]
fn test_parse_import_accepts_deep_nesting() {
    let mut text = r#"{"id":"leaf","title":"Leaf","type":"url","url":"https://leaf.example"}"#.to_string();
    for level in 0..100 {
        text = format!(
            r#"{{"id":"f{}","title":"F","type":"folder","children":[{}]}}"#,
            level, text
        );
    }
    let tree = parse_import(&format!("[{}]", text), 128).unwrap();

    let mut depth = 0;
    let mut node = &tree[0];
    while let Some(child) = node.children().first() {
        node = child;
        depth += 1;
    }
    assert_eq!(depth, 100);
    assert_eq!(node.id(), "leaf");
}

#[test]
fn test_parse_import_rejects_malformed_json() {
    match parse_import("[{", 128) {
        Err(BookmarkError::InvalidImport(msg)) => assert!(msg.starts_with("Invalid JSON format")),
        other => panic!("expected InvalidImport, got {:?}", other),
    }
}

#[test]
fn test_parse_import_rejects_schema_violation() {
    let result = parse_import(r#"[{"id":"a","title":"A","type":"url","url":"relative"}]"#, 128);
    assert!(matches!(result, Err(BookmarkError::InvalidImport(_))));
}
