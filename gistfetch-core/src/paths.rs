//! Layout of the per-user state directory.
//!
//! ```text
//! ~/.gistfetch/
//!   settings.json          (mode 0600)
//!   run/sync.lock          (present while a sync runs)
//!   templates/notes/*.tera (optional user overrides)
//! ```

use std::path::{Path, PathBuf};

use crate::error::SettingsError;

pub const STATE_DIR: &str = ".gistfetch";
pub const SETTINGS_FILE: &str = "settings.json";
pub const SYNC_LOCK_FILE: &str = "sync.lock";

pub fn gistfetch_root(home: &Path) -> PathBuf {
    home.join(STATE_DIR)
}

pub fn settings_path(home: &Path) -> PathBuf {
    gistfetch_root(home).join(SETTINGS_FILE)
}

pub fn run_dir(home: &Path) -> PathBuf {
    gistfetch_root(home).join("run")
}

pub fn sync_lock_path(home: &Path) -> PathBuf {
    run_dir(home).join(SYNC_LOCK_FILE)
}

pub fn templates_dir(home: &Path) -> PathBuf {
    gistfetch_root(home).join("templates")
}

/// The current user's home directory.
pub fn home_dir() -> Result<PathBuf, SettingsError> {
    dirs::home_dir().ok_or(SettingsError::HomeNotFound)
}
