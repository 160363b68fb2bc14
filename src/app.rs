//! App Core for Marktree.
//!
//! Central struct wiring settings, storage and the bookmark store, plus the
//! at-most-one export and import sessions a UI may have open.

use std::path::Path;

use crate::managers::bookmark_store::{BookmarkStore, BookmarkStoreTrait};
use crate::managers::transfer_session::{TransferKind, TransferSession};
use crate::services::import_merger::IdRemap;
use crate::services::settings_engine::{SettingsEngine, SettingsEngineTrait};
use crate::storage::{self, BookmarkStorage};
use crate::types::errors::{BookmarkError, SettingsError};
use crate::types::settings::StoreSettings;

/// Central application struct.
pub struct App {
    pub settings_engine: SettingsEngine,
    pub store: BookmarkStore,
    export_session: Option<TransferSession>,
    import_session: Option<TransferSession>,
}

impl App {
    /// Creates a new App: loads settings, opens the configured storage under
    /// `data_dir` and restores the bookmark tree from it.
    ///
    /// Unreadable settings fall back to defaults. Failing to open storage is fatal.
    pub fn new(data_dir: &Path, settings_path: Option<String>) -> Result<Self, Box<dyn std::error::Error>> {
        let mut settings_engine = SettingsEngine::new(settings_path);
        let settings = match settings_engine.load() {
            Ok(s) => s,
            Err(e) => {
                log::warn!("using default settings: {}", e);
                StoreSettings::default()
            }
        };

        let storage = storage::open_storage(&settings.storage, data_dir)?;
        Ok(Self::with_storage(storage, settings_engine))
    }

    /// Creates an App over an already-opened storage backend.
    pub fn with_storage(storage: Box<dyn BookmarkStorage>, settings_engine: SettingsEngine) -> Self {
        let store = BookmarkStore::new(storage, settings_engine.get_settings());
        Self {
            settings_engine,
            store,
            export_session: None,
            import_session: None,
        }
    }

    /// Updates (and saves) a setting by dot path, then applies it to the store.
    ///
    /// Returns whether the change waits for a restart (storage keys do).
    pub fn set_setting(&mut self, key: &str, value: serde_json::Value) -> Result<bool, SettingsError> {
        let key = self.settings_engine.set_value(key, value)?;
        self.store.update_settings(self.settings_engine.get_settings());
        Ok(key.requires_restart())
    }

    // ─── Export session ───

    /// Opens an export session over the current tree, replacing any open one.
    pub fn begin_export(&mut self) -> &TransferSession {
        self.export_session
            .insert(TransferSession::begin_export(self.store.bookmarks()))
    }

    pub fn export_session(&self) -> Option<&TransferSession> {
        self.export_session.as_ref()
    }

    pub fn export_session_mut(&mut self) -> Result<&mut TransferSession, BookmarkError> {
        self.export_session
            .as_mut()
            .ok_or_else(|| BookmarkError::NoSession(TransferKind::Export.label().to_string()))
    }

    /// Serializes the export selection and closes the session.
    ///
    /// With nothing selected the session stays open.
    pub fn finish_export(&mut self) -> Result<String, BookmarkError> {
        let json = match &self.export_session {
            Some(session) => session.finish_export(&self.store)?,
            None => return Err(BookmarkError::NoSession(TransferKind::Export.label().to_string())),
        };
        self.export_session = None;
        Ok(json)
    }

    pub fn cancel_export(&mut self) -> bool {
        self.export_session.take().is_some()
    }

    // ─── Import session ───

    /// Parses `text` and opens an import session, replacing any open one.
    ///
    /// Invalid text leaves the previous session (if any) untouched.
    pub fn begin_import(&mut self, text: &str) -> Result<&TransferSession, BookmarkError> {
        let session = TransferSession::begin_import(text, self.store.limits().import_title_max)?;
        Ok(self.import_session.insert(session))
    }

    pub fn import_session(&self) -> Option<&TransferSession> {
        self.import_session.as_ref()
    }

    pub fn import_session_mut(&mut self) -> Result<&mut TransferSession, BookmarkError> {
        self.import_session
            .as_mut()
            .ok_or_else(|| BookmarkError::NoSession(TransferKind::Import.label().to_string()))
    }

    /// Merges the import selection into the store and closes the session.
    pub fn commit_import(&mut self) -> Result<Vec<IdRemap>, BookmarkError> {
        let remapped = match &self.import_session {
            Some(session) => session.commit_import(&mut self.store)?,
            None => return Err(BookmarkError::NoSession(TransferKind::Import.label().to_string())),
        };
        self.import_session = None;
        Ok(remapped)
    }

    pub fn cancel_import(&mut self) -> bool {
        self.import_session.take().is_some()
    }
}
