// Marktree platform paths
// Resolves where settings and bookmark data live on Windows, macOS and Linux.
//
// Uses `cfg(target_os)` to pick the platform module at compile time.

use std::env;
use std::path::PathBuf;

#[cfg(target_os = "linux")]
mod linux;

#[cfg(target_os = "macos")]
mod macos;

#[cfg(target_os = "windows")]
mod windows;

/// Environment variable that overrides the data directory.
pub const DATA_DIR_ENV: &str = "MARKTREE_DATA_DIR";

/// Returns the platform-specific configuration directory.
///
/// - **Linux**: `$XDG_CONFIG_HOME/marktree` or `~/.config/marktree`
/// - **macOS**: `~/Library/Application Support/Marktree`
/// - **Windows**: `%APPDATA%/Marktree`
pub fn get_config_dir() -> PathBuf {
    #[cfg(target_os = "linux")]
    {
        linux::get_config_dir()
    }
    #[cfg(target_os = "macos")]
    {
        macos::get_config_dir()
    }
    #[cfg(target_os = "windows")]
    {
        windows::get_config_dir()
    }
}

/// Returns the platform-specific data directory, where bookmark storage lives.
pub fn get_data_dir() -> PathBuf {
    #[cfg(target_os = "linux")]
    {
        linux::get_data_dir()
    }
    #[cfg(target_os = "macos")]
    {
        macos::get_data_dir()
    }
    #[cfg(target_os = "windows")]
    {
        windows::get_data_dir()
    }
}

/// The data directory after applying the `MARKTREE_DATA_DIR` override.
pub fn resolve_data_dir() -> PathBuf {
    data_dir_or(env::var(DATA_DIR_ENV).ok())
}

fn data_dir_or(over: Option<String>) -> PathBuf {
    match over {
        Some(dir) if !dir.trim().is_empty() => PathBuf::from(dir),
        _ => get_data_dir(),
    }
}
