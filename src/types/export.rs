use serde::{Deserialize, Serialize};

/// Tri-state selection used while choosing what to export or import.
///
/// `PartialExport` only ever appears on folders and is always derived from
/// the folder's children.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExportSelection {
    Export,
    PartialExport,
    DontExport,
}

impl Default for ExportSelection {
    fn default() -> Self {
        ExportSelection::DontExport
    }
}

/// A bookmark node annotated with its selection state.
///
/// Built by cloning a `BookmarkItem` tree; never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportableBookmarkItem {
    pub id: String,
    pub title: String,
    #[serde(flatten)]
    pub kind: ExportableKind,
    pub export: ExportSelection,
}

/// Variant-specific payload of an exportable node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ExportableKind {
    Url { url: String },
    Folder { children: Vec<ExportableBookmarkItem> },
}

impl ExportableBookmarkItem {
    pub fn is_folder(&self) -> bool {
        matches!(self.kind, ExportableKind::Folder { .. })
    }

    /// Children of a folder; empty for URL nodes.
    pub fn children(&self) -> &[ExportableBookmarkItem] {
        match &self.kind {
            ExportableKind::Url { .. } => &[],
            ExportableKind::Folder { children } => children,
        }
    }
}
