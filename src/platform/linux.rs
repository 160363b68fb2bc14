// Marktree paths on Linux
// Config: $XDG_CONFIG_HOME/marktree, else ~/.config/marktree
// Data:   $XDG_DATA_HOME/marktree, else ~/.local/share/marktree

use std::env;
use std::path::PathBuf;

const APP_DIR: &str = "marktree";

pub fn get_config_dir() -> PathBuf {
    xdg_dir(env::var("XDG_CONFIG_HOME").ok(), env::var("HOME").ok(), &[".config"])
}

pub fn get_data_dir() -> PathBuf {
    xdg_dir(env::var("XDG_DATA_HOME").ok(), env::var("HOME").ok(), &[".local", "share"])
}

/// `$xdg/marktree` when the XDG variable is set, else `$home/<fallback...>/marktree`.
fn xdg_dir(xdg: Option<String>, home: Option<String>, fallback: &[&str]) -> PathBuf {
    match xdg.filter(|x| !x.is_empty()) {
        Some(base) => PathBuf::from(base).join(APP_DIR),
        None => {
            let mut path = PathBuf::from(home.unwrap_or_else(|| String::from("/tmp")));
            for part in fallback {
                path.push(part);
            }
            path.join(APP_DIR)
        }
    }
}
