//! Display and trait checks for the per-domain error enums.

use marktree::types::errors::*;

// === BookmarkError Tests ===

#[test]
fn bookmark_error_validation_joins_messages() {
    let err = BookmarkError::Validation(vec![
        "Bookmark name is required".to_string(),
        "Invalid URL".to_string(),
    ]);
    assert_eq!(
        err.to_string(),
        "Validation failed: Bookmark name is required; Invalid URL"
    );
}

#[test]
fn bookmark_error_display_variants() {
    assert_eq!(
        BookmarkError::InvalidImport("[0].url: not a valid absolute URL".to_string()).to_string(),
        "Invalid import data: [0].url: not a valid absolute URL"
    );
    assert_eq!(
        BookmarkError::IdExhausted(16).to_string(),
        "Could not allocate a unique id after 16 attempts"
    );
    assert_eq!(
        BookmarkError::NothingSelected.to_string(),
        "No bookmarks selected for export."
    );
    assert_eq!(
        BookmarkError::NoSession("export selection".to_string()).to_string(),
        "No export selection in progress"
    );
    assert_eq!(
        BookmarkError::Serialization("boom".to_string()).to_string(),
        "Bookmark serialization error: boom"
    );
}

#[test]
fn bookmark_error_is_comparable() {
    assert_eq!(BookmarkError::NothingSelected, BookmarkError::NothingSelected);
    assert_ne!(BookmarkError::IdExhausted(1), BookmarkError::IdExhausted(2));
}

// === StorageError Tests ===

#[test]
fn storage_error_display_variants() {
    assert_eq!(
        StorageError::Io("disk full".to_string()).to_string(),
        "Storage I/O error: disk full"
    );
    assert_eq!(
        StorageError::Serialization("eof".to_string()).to_string(),
        "Storage serialization error: eof"
    );
    assert_eq!(
        StorageError::Database("locked".to_string()).to_string(),
        "Storage database error: locked"
    );
}

#[test]
fn storage_error_from_serde_json() {
    let json_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
    let err: StorageError = json_err.into();
    assert!(matches!(err, StorageError::Serialization(_)));
}

#[test]
fn storage_error_from_rusqlite() {
    let err: StorageError = rusqlite::Error::QueryReturnedNoRows.into();
    assert!(matches!(err, StorageError::Database(_)));
}

// === SettingsError Tests ===

#[test]
fn settings_error_display_variants() {
    assert_eq!(
        SettingsError::IoError("file not found".to_string()).to_string(),
        "Settings I/O error: file not found"
    );
    assert_eq!(
        SettingsError::SerializationError("malformed json".to_string()).to_string(),
        "Settings serialization error: malformed json"
    );
    assert_eq!(
        SettingsError::InvalidKey("unknown.key".to_string()).to_string(),
        "Invalid settings key: unknown.key"
    );
    assert_eq!(
        SettingsError::InvalidValue("negative number".to_string()).to_string(),
        "Invalid settings value: negative number"
    );
}

// === Cross-cutting ===

#[test]
fn all_errors_box_as_std_error() {
    let errors: Vec<Box<dyn std::error::Error>> = vec![
        Box::new(BookmarkError::NothingSelected),
        Box::new(StorageError::Io("msg".to_string())),
        Box::new(SettingsError::IoError("msg".to_string())),
    ];
    for err in &errors {
        assert!(err.source().is_none());
        assert!(!err.to_string().is_empty());
    }
}
