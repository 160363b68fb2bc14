//! Store settings persisted as a JSON file.
//!
//! Settings are edited one [`SettingKey`] at a time. Every key has a typed
//! parser: limits and the id retry bound must be whole numbers of at least 1,
//! the backend must name a known [`StorageBackend`], and the storage path is a
//! non-empty string or `null`. Storage keys are saved immediately but only
//! take effect the next time storage is opened.

use std::fmt;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde_json::Value;

use crate::platform;
use crate::types::errors::SettingsError;
use crate::types::settings::{StorageBackend, StoreSettings};

/// File name used under the platform config directory.
pub const SETTINGS_FILE: &str = "settings.json";

/// Trait defining the settings engine interface.
pub trait SettingsEngineTrait {
    fn load(&mut self) -> Result<StoreSettings, SettingsError>;
    fn save(&self) -> Result<(), SettingsError>;
    fn get_settings(&self) -> &StoreSettings;
    /// Parses `value` for `key`, applies it and saves. Returns the key that changed.
    fn set_value(&mut self, key: &str, value: Value) -> Result<SettingKey, SettingsError>;
    fn reset(&mut self) -> Result<(), SettingsError>;
    fn config_path(&self) -> &Path;
}

/// Every setting that can be changed at runtime.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettingKey {
    StorageBackend,
    StoragePath,
    BookmarkTitleMax,
    FolderTitleMax,
    ImportTitleMax,
    IdMaxAttempts,
}

impl SettingKey {
    pub const ALL: [SettingKey; 6] = [
        SettingKey::StorageBackend,
        SettingKey::StoragePath,
        SettingKey::BookmarkTitleMax,
        SettingKey::FolderTitleMax,
        SettingKey::ImportTitleMax,
        SettingKey::IdMaxAttempts,
    ];

    /// Dot path of the key in the settings file.
    pub fn as_str(self) -> &'static str {
        match self {
            SettingKey::StorageBackend => "storage.backend",
            SettingKey::StoragePath => "storage.path",
            SettingKey::BookmarkTitleMax => "limits.bookmark_title_max",
            SettingKey::FolderTitleMax => "limits.folder_title_max",
            SettingKey::ImportTitleMax => "limits.import_title_max",
            SettingKey::IdMaxAttempts => "id.max_attempts",
        }
    }

    /// Whether a change only applies once storage is reopened.
    pub fn requires_restart(self) -> bool {
        matches!(self, SettingKey::StorageBackend | SettingKey::StoragePath)
    }

    fn apply(self, settings: &mut StoreSettings, value: &Value) -> Result<(), SettingsError> {
        match self {
            SettingKey::StorageBackend => settings.storage.backend = parse_backend(value)?,
            SettingKey::StoragePath => settings.storage.path = parse_path(value)?,
            SettingKey::BookmarkTitleMax => settings.limits.bookmark_title_max = parse_positive(self, value)?,
            SettingKey::FolderTitleMax => settings.limits.folder_title_max = parse_positive(self, value)?,
            SettingKey::ImportTitleMax => settings.limits.import_title_max = parse_positive(self, value)?,
            SettingKey::IdMaxAttempts => settings.id.max_attempts = parse_positive(self, value)?,
        }
        Ok(())
    }
}

impl fmt::Display for SettingKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SettingKey {
    type Err = SettingsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SettingKey::ALL
            .into_iter()
            .find(|key| key.as_str() == s)
            .ok_or_else(|| SettingsError::InvalidKey(s.to_string()))
    }
}

fn parse_positive(key: SettingKey, value: &Value) -> Result<usize, SettingsError> {
    value
        .as_u64()
        .filter(|n| *n >= 1)
        .and_then(|n| usize::try_from(n).ok())
        .ok_or_else(|| {
            SettingsError::InvalidValue(format!(
                "{} must be a whole number of at least 1, got {}",
                key, value
            ))
        })
}

fn parse_backend(value: &Value) -> Result<StorageBackend, SettingsError> {
    serde_json::from_value(value.clone()).map_err(|_| {
        SettingsError::InvalidValue(format!(
            "{} must be \"sqlite\", \"json_file\" or \"memory\", got {}",
            SettingKey::StorageBackend,
            value
        ))
    })
}

fn parse_path(value: &Value) -> Result<Option<String>, SettingsError> {
    match value {
        Value::Null => Ok(None),
        Value::String(s) if !s.trim().is_empty() => Ok(Some(s.trim().to_string())),
        _ => Err(SettingsError::InvalidValue(format!(
            "{} must be a non-empty string or null, got {}",
            SettingKey::StoragePath,
            value
        ))),
    }
}

/// Rejects values a hand-edited file could contain but `set_value` never writes.
fn check_loaded(settings: &StoreSettings) -> Result<(), SettingsError> {
    let counts = [
        (SettingKey::BookmarkTitleMax, settings.limits.bookmark_title_max),
        (SettingKey::FolderTitleMax, settings.limits.folder_title_max),
        (SettingKey::ImportTitleMax, settings.limits.import_title_max),
        (SettingKey::IdMaxAttempts, settings.id.max_attempts),
    ];
    match counts.iter().find(|(_, n)| *n == 0) {
        Some((key, _)) => Err(SettingsError::InvalidValue(format!("{} must be at least 1", key))),
        None => Ok(()),
    }
}

fn write_settings(path: &Path, settings: &StoreSettings) -> Result<(), SettingsError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .map_err(|e| SettingsError::IoError(format!("{}: {}", parent.display(), e)))?;
    }
    let json = serde_json::to_string_pretty(settings)
        .map_err(|e| SettingsError::SerializationError(e.to_string()))?;

    // Readers see either the old file or the new one.
    let tmp = path.with_extension("json.tmp");
    fs::write(&tmp, json).map_err(|e| SettingsError::IoError(format!("{}: {}", tmp.display(), e)))?;
    fs::rename(&tmp, path).map_err(|e| SettingsError::IoError(format!("{}: {}", path.display(), e)))
}

/// Settings engine backed by a JSON file.
pub struct SettingsEngine {
    path: PathBuf,
    settings: StoreSettings,
}

impl SettingsEngine {
    /// Engine over `path_override`, or `settings.json` in the platform config directory.
    pub fn new(path_override: Option<String>) -> Self {
        let path = path_override
            .map(PathBuf::from)
            .unwrap_or_else(|| platform::get_config_dir().join(SETTINGS_FILE));
        Self {
            path,
            settings: StoreSettings::default(),
        }
    }
}

impl SettingsEngineTrait for SettingsEngine {
    /// A missing file yields defaults; fields missing from the file take their defaults.
    fn load(&mut self) -> Result<StoreSettings, SettingsError> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                log::debug!("no settings file at {}, using defaults", self.path.display());
                self.settings = StoreSettings::default();
                return Ok(self.settings.clone());
            }
            Err(e) => return Err(SettingsError::IoError(format!("{}: {}", self.path.display(), e))),
        };

        let settings: StoreSettings = serde_json::from_str(&content)
            .map_err(|e| SettingsError::SerializationError(format!("{}: {}", self.path.display(), e)))?;
        check_loaded(&settings)?;

        self.settings = settings;
        Ok(self.settings.clone())
    }

    fn save(&self) -> Result<(), SettingsError> {
        write_settings(&self.path, &self.settings)
    }

    fn get_settings(&self) -> &StoreSettings {
        &self.settings
    }

    fn set_value(&mut self, key: &str, value: Value) -> Result<SettingKey, SettingsError> {
        let key: SettingKey = key.parse()?;
        let mut next = self.settings.clone();
        key.apply(&mut next, &value)?;

        write_settings(&self.path, &next)?;
        self.settings = next;

        if key.requires_restart() {
            log::warn!("{} set to {}; takes effect after restart", key, value);
        } else {
            log::info!("{} set to {}", key, value);
        }
        Ok(key)
    }

    fn reset(&mut self) -> Result<(), SettingsError> {
        let defaults = StoreSettings::default();
        write_settings(&self.path, &defaults)?;
        self.settings = defaults;
        log::info!("settings reset to defaults");
        Ok(())
    }

    fn config_path(&self) -> &Path {
        &self.path
    }
}
