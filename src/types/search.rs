use serde::{Deserialize, Serialize};

use super::bookmark::UrlItem;

/// One searchable URL bookmark with the titles of its ancestor folders,
/// ordered root to immediate parent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookmarkSearchResultItem {
    pub bookmark: UrlItem,
    pub hierarchy: Vec<String>,
}
