//! User settings — load, merge over defaults, save, set.
//!
//! # Storage
//!
//! A single JSON object at `~/.gistfetch/settings.json`:
//!
//! ```json
//! { "ownerSetting": "octocat", "mirrorPath": "/Gists", "includePrivate": false }
//! ```
//!
//! Keys this version does not know about are carried through load/save
//! untouched.
//!
//! # API pattern
//!
//! - `SettingsStore::load_at(home)` — explicit home; used in tests with `TempDir`
//! - `SettingsStore::load()` — derives home from `dirs::home_dir()`

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{io_err, SettingsError};
use crate::paths;
use crate::types::{MirrorPath, OwnerName};

pub const DEFAULT_OWNER: &str = "default";
pub const DEFAULT_MIRROR_PATH: &str = "/";

// ---------------------------------------------------------------------------
// Settings
// ---------------------------------------------------------------------------

/// Persisted user settings, exactly as stored on disk.
///
/// Values are not validated here; call [`Settings::validate`] before use.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    /// GitHub account whose gists are mirrored.
    pub owner_setting: String,
    /// Vault folder that receives one subfolder per gist.
    pub mirror_path: String,
    /// Stored and displayed only; private gists are not fetched.
    pub include_private: bool,
    /// Unknown keys found on disk.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            owner_setting: DEFAULT_OWNER.to_string(),
            mirror_path: DEFAULT_MIRROR_PATH.to_string(),
            include_private: false,
            extra: Map::new(),
        }
    }
}

impl Settings {
    /// Overlay a persisted JSON document on the defaults.
    ///
    /// Persisted keys win, `null` values keep the default, and a document that
    /// is not an object yields plain defaults.
    pub fn merged_over_defaults(persisted: Value) -> Result<Self, serde_json::Error> {
        let mut merged = match serde_json::to_value(Settings::default())? {
            Value::Object(map) => map,
            _ => Map::new(),
        };
        if let Value::Object(overrides) = persisted {
            for (key, value) in overrides {
                if !value.is_null() {
                    merged.insert(key, value);
                }
            }
        }
        serde_json::from_value(Value::Object(merged))
    }

    /// Current value of `field`, rendered for display.
    pub fn value_of(&self, field: SettingField) -> String {
        match field {
            SettingField::Owner => self.owner_setting.clone(),
            SettingField::MirrorPath => self.mirror_path.clone(),
            SettingField::IncludePrivate => self.include_private.to_string(),
        }
    }

    /// Validate every field and produce the configuration a sync runs with.
    pub fn validate(&self) -> Result<SyncConfig, SettingsError> {
        Ok(SyncConfig {
            owner: OwnerName::parse(&self.owner_setting)?,
            mirror_path: MirrorPath::parse(&self.mirror_path)?,
            include_private: self.include_private,
        })
    }
}

/// Validated, explicitly passed configuration for one sync run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncConfig {
    pub owner: OwnerName,
    pub mirror_path: MirrorPath,
    pub include_private: bool,
}

// ---------------------------------------------------------------------------
// SettingField
// ---------------------------------------------------------------------------

/// A user-configurable setting, addressable from the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SettingField {
    Owner,
    MirrorPath,
    IncludePrivate,
}

impl SettingField {
    /// All fields in display order.
    pub fn all() -> &'static [SettingField] {
        &[
            SettingField::Owner,
            SettingField::MirrorPath,
            SettingField::IncludePrivate,
        ]
    }

    /// Key under which the field is persisted.
    pub fn key(&self) -> &'static str {
        match self {
            SettingField::Owner => "ownerSetting",
            SettingField::MirrorPath => "mirrorPath",
            SettingField::IncludePrivate => "includePrivate",
        }
    }

    /// Human-readable description for `config show`.
    pub fn description(&self) -> &'static str {
        match self {
            SettingField::Owner => "GitHub username",
            SettingField::MirrorPath => "Vault folder to receive fetched gists",
            SettingField::IncludePrivate => "Include private gists (not implemented yet)",
        }
    }
}

impl fmt::Display for SettingField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for SettingField {
    type Err = SettingsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ownerSetting" | "owner" => Ok(SettingField::Owner),
            "mirrorPath" | "mirror-path" | "mirror_path" => Ok(SettingField::MirrorPath),
            "includePrivate" | "include-private" | "include_private" => {
                Ok(SettingField::IncludePrivate)
            }
            other => Err(SettingsError::UnknownField(other.to_string())),
        }
    }
}

fn parse_bool(field: SettingField, value: &str) -> Result<bool, SettingsError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "yes" | "on" | "1" => Ok(true),
        "false" | "no" | "off" | "0" => Ok(false),
        _ => Err(SettingsError::InvalidValue {
            field: field.key(),
            value: value.to_string(),
            reason: "expected true or false".to_string(),
        }),
    }
}

// ---------------------------------------------------------------------------
// SettingsStore
// ---------------------------------------------------------------------------

/// Settings bound to the file they were loaded from.
#[derive(Debug, Clone)]
pub struct SettingsStore {
    path: PathBuf,
    settings: Settings,
}

impl SettingsStore {
    /// Load settings from `<home>/.gistfetch/settings.json`.
    ///
    /// A missing file yields defaults; nothing is written until [`save`](Self::save).
    pub fn load_at(home: &Path) -> Result<Self, SettingsError> {
        let path = paths::settings_path(home);
        if !path.exists() {
            return Ok(Self {
                path,
                settings: Settings::default(),
            });
        }
        let contents = std::fs::read_to_string(&path).map_err(|e| io_err(&path, e))?;
        let settings = serde_json::from_str::<Value>(&contents)
            .and_then(Settings::merged_over_defaults)
            .map_err(|source| SettingsError::Parse {
                path: path.clone(),
                source,
            })?;
        Ok(Self { path, settings })
    }

    /// `load_at` convenience wrapper.
    pub fn load() -> Result<Self, SettingsError> {
        Self::load_at(&paths::home_dir()?)
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Persist the whole snapshot atomically.
    ///
    /// Write flow: serialize → `settings.json.tmp` sibling → `chmod 0600` → `rename`.
    pub fn save(&self) -> Result<(), SettingsError> {
        let Some(dir) = self.path.parent() else {
            return Err(io_err(
                &self.path,
                std::io::Error::other("invalid settings path"),
            ));
        };
        if !dir.exists() {
            std::fs::create_dir_all(dir).map_err(|e| io_err(dir, e))?;
            set_dir_permissions(dir)?;
        }

        let json = serde_json::to_string_pretty(&self.settings)?;
        let tmp = self.path.with_extension("json.tmp");
        std::fs::write(&tmp, json).map_err(|e| io_err(&tmp, e))?;
        set_file_permissions(&tmp)?;
        std::fs::rename(&tmp, &self.path).map_err(|e| io_err(&self.path, e))?;
        Ok(())
    }

    /// Change one field and save immediately.
    ///
    /// String fields are stored as given; they are checked by
    /// [`Settings::validate`] when a sync uses them.
    pub fn set(&mut self, field: SettingField, value: &str) -> Result<(), SettingsError> {
        match field {
            SettingField::Owner => self.settings.owner_setting = value.to_string(),
            SettingField::MirrorPath => self.settings.mirror_path = value.to_string(),
            SettingField::IncludePrivate => {
                self.settings.include_private = parse_bool(field, value)?
            }
        }
        self.save()
    }
}

// ---------------------------------------------------------------------------
// Private helpers
// ---------------------------------------------------------------------------

#[cfg(unix)]
fn set_dir_permissions(path: &Path) -> Result<(), SettingsError> {
    use std::os::unix::fs::PermissionsExt;
    std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o700))
        .map_err(|e| io_err(path, e))
}
#[cfg(not(unix))]
fn set_dir_permissions(_path: &Path) -> Result<(), SettingsError> {
    Ok(())
}

#[cfg(unix)]
fn set_file_permissions(path: &Path) -> Result<(), SettingsError> {
    use std::os::unix::fs::PermissionsExt;
    std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o600))
        .map_err(|e| io_err(path, e))
}
#[cfg(not(unix))]
fn set_file_permissions(_path: &Path) -> Result<(), SettingsError> {
    Ok(())
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
