//! Input validation for bookmark forms and imported JSON.
//!
//! Form validation returns every problem as a human-readable message.
//! Import validation stops at the first schema violation and reports it with
//! the path of the offending field.

use serde_json::Value;
use url::Url;

use crate::types::bookmark::{self, BookmarkTree};
use crate::types::errors::BookmarkError;
use crate::types::settings::LimitSettings;

/// Returns true if `url` parses as an absolute URL.
pub fn is_valid_url(url: &str) -> bool {
    Url::parse(url).is_ok()
}

/// Validates the bookmark create/edit form. Empty result means valid.
pub fn validate_bookmark(title: &str, url: &str, limits: &LimitSettings) -> Vec<String> {
    let mut errors = Vec::new();
    let title = title.trim();
    let url = url.trim();

    if title.is_empty() {
        errors.push("Bookmark name is required".to_string());
    } else if title.chars().count() > limits.bookmark_title_max {
        errors.push(format!(
            "Bookmark name is too long. Max: {} characters",
            limits.bookmark_title_max
        ));
    }

    if url.is_empty() {
        errors.push("URL is required".to_string());
    } else if !is_valid_url(url) {
        errors.push("Invalid URL".to_string());
    }

    errors
}

/// Validates the folder create/edit form. Empty result means valid.
pub fn validate_folder(title: &str, limits: &LimitSettings) -> Vec<String> {
    let mut errors = Vec::new();
    let title = title.trim();

    if title.is_empty() {
        errors.push("Folder name is required".to_string());
    } else if title.chars().count() > limits.folder_title_max {
        errors.push(format!(
            "Folder name is too long. Max: {} characters",
            limits.folder_title_max
        ));
    }

    errors
}

/// Checks that `value` is an array of bookmark items, recursively.
pub fn validate_import_json(value: &Value, max_title: usize) -> Result<(), String> {
    let items = value
        .as_array()
        .ok_or_else(|| "expected an array of bookmarks".to_string())?;
    validate_items(items, "", max_title)
}

fn validate_items(items: &[Value], path: &str, max_title: usize) -> Result<(), String> {
    for (idx, item) in items.iter().enumerate() {
        validate_item(item, &format!("{}[{}]", path, idx), max_title)?;
    }
    Ok(())
}

fn validate_item(item: &Value, path: &str, max_title: usize) -> Result<(), String> {
    let obj = item
        .as_object()
        .ok_or_else(|| format!("{}: expected an object", path))?;

    match obj.get("id").and_then(Value::as_str) {
        Some(id) if !id.is_empty() => {}
        _ => return Err(format!("{}.id: must be a non-empty string", path)),
    }

    let title = obj
        .get("title")
        .and_then(Value::as_str)
        .ok_or_else(|| format!("{}.title: must be a string", path))?;
    let title_len = title.chars().count();
    if title_len == 0 || title_len > max_title {
        return Err(format!(
            "{}.title: must be between 1 and {} characters",
            path, max_title
        ));
    }

    match obj.get("type").and_then(Value::as_str) {
        Some("url") => {
            let url = obj
                .get("url")
                .and_then(Value::as_str)
                .ok_or_else(|| format!("{}.url: must be a string", path))?;
            if !is_valid_url(url) {
                return Err(format!("{}.url: not a valid absolute URL", path));
            }
            Ok(())
        }
        Some("folder") => {
            let children = obj
                .get("children")
                .and_then(Value::as_array)
                .ok_or_else(|| format!("{}.children: must be an array", path))?;
            validate_items(children, &format!("{}.children", path), max_title)
        }
        _ => Err(format!("{}.type: must be \"url\" or \"folder\"", path)),
    }
}

/// Parses and validates import text into a bookmark tree.
///
/// Any failure (malformed JSON or schema violation) is reported as a single
/// `InvalidImport` error.
pub fn parse_import(text: &str, max_title: usize) -> Result<BookmarkTree, BookmarkError> {
    let value: Value = bookmark::from_json_unbounded(text)
        .map_err(|e| BookmarkError::InvalidImport(format!("Invalid JSON format: {}", e)))?;
    validate_import_json(&value, max_title).map_err(BookmarkError::InvalidImport)?;
    serde_json::from_value(value).map_err(|e| BookmarkError::InvalidImport(e.to_string()))
}
