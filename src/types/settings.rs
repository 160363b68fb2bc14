use serde::{Deserialize, Serialize};

/// Top-level settings container.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(default)]
pub struct StoreSettings {
    pub storage: StorageSettings,
    pub limits: LimitSettings,
    pub id: IdSettings,
}

/// Where the bookmark tree is persisted.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct StorageSettings {
    pub backend: StorageBackend,
    /// Overrides the default data file location when set.
    pub path: Option<String>,
}

impl Default for StorageSettings {
    fn default() -> Self {
        Self {
            backend: StorageBackend::Sqlite,
            path: None,
        }
    }
}

/// Available persistence backends.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum StorageBackend {
    Sqlite,
    JsonFile,
    Memory,
}

impl StorageBackend {
    /// File name used under the data directory when no path override is set.
    pub fn default_file_name(&self) -> &'static str {
        match self {
            StorageBackend::Sqlite => "marktree.db",
            StorageBackend::JsonFile => "bookmarks.json",
            StorageBackend::Memory => "",
        }
    }
}

/// Title length limits (in characters, measured after trimming).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct LimitSettings {
    pub bookmark_title_max: usize,
    pub folder_title_max: usize,
    pub import_title_max: usize,
}

impl Default for LimitSettings {
    fn default() -> Self {
        Self {
            bookmark_title_max: 70,
            folder_title_max: 50,
            import_title_max: 128,
        }
    }
}

/// Identifier allocation settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct IdSettings {
    /// Upper bound on fresh-id attempts before giving up.
    pub max_attempts: usize,
}

impl Default for IdSettings {
    fn default() -> Self {
        Self { max_attempts: 16 }
    }
}
