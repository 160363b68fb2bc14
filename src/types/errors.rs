use std::fmt;

// === BookmarkError ===

/// Errors surfaced by bookmark store operations.
///
/// Lookups of unknown ids are not errors: edits and deletes that target a
/// missing node leave the tree unchanged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BookmarkError {
    /// User input failed validation; carries the human-readable messages.
    Validation(Vec<String>),
    /// Import data was malformed or did not match the bookmark schema.
    InvalidImport(String),
    /// No free identifier was found within the configured number of attempts.
    IdExhausted(usize),
    /// An export was requested with nothing selected.
    NothingSelected,
    /// No export or import selection is in progress.
    NoSession(String),
    /// Serialization of the tree failed.
    Serialization(String),
}

impl fmt::Display for BookmarkError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BookmarkError::Validation(messages) => {
                write!(f, "Validation failed: {}", messages.join("; "))
            }
            BookmarkError::InvalidImport(msg) => write!(f, "Invalid import data: {}", msg),
            BookmarkError::IdExhausted(attempts) => {
                write!(f, "Could not allocate a unique id after {} attempts", attempts)
            }
            BookmarkError::NothingSelected => {
                write!(f, "No bookmarks selected for export.")
            }
            BookmarkError::NoSession(kind) => write!(f, "No {} in progress", kind),
            BookmarkError::Serialization(msg) => {
                write!(f, "Bookmark serialization error: {}", msg)
            }
        }
    }
}

impl std::error::Error for BookmarkError {}

// === StorageError ===

/// Errors raised by persistence backends.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StorageError {
    /// An I/O error occurred while reading or writing the data file.
    Io(String),
    /// The persisted blob could not be serialized or deserialized.
    Serialization(String),
    /// Database operation failed.
    Database(String),
}

impl fmt::Display for StorageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StorageError::Io(msg) => write!(f, "Storage I/O error: {}", msg),
            StorageError::Serialization(msg) => {
                write!(f, "Storage serialization error: {}", msg)
            }
            StorageError::Database(msg) => write!(f, "Storage database error: {}", msg),
        }
    }
}

impl std::error::Error for StorageError {}

impl From<rusqlite::Error> for StorageError {
    fn from(e: rusqlite::Error) -> Self {
        StorageError::Database(e.to_string())
    }
}

impl From<serde_json::Error> for StorageError {
    fn from(e: serde_json::Error) -> Self {
        StorageError::Serialization(e.to_string())
    }
}

// === SettingsError ===

/// Errors related to settings management.
#[derive(Debug)]
pub enum SettingsError {
    /// An I/O error occurred while reading or writing settings.
    IoError(String),
    /// Failed to serialize or deserialize settings.
    SerializationError(String),
    /// The provided settings key is invalid.
    InvalidKey(String),
    /// The provided settings value is invalid.
    InvalidValue(String),
}

impl fmt::Display for SettingsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SettingsError::IoError(msg) => write!(f, "Settings I/O error: {}", msg),
            SettingsError::SerializationError(msg) => {
                write!(f, "Settings serialization error: {}", msg)
            }
            SettingsError::InvalidKey(key) => write!(f, "Invalid settings key: {}", key),
            SettingsError::InvalidValue(msg) => {
                write!(f, "Invalid settings value: {}", msg)
            }
        }
    }
}

impl std::error::Error for SettingsError {}
