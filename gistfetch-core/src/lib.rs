//! gistfetch core library — domain types, settings persistence, errors.
//!
//! Public API surface:
//! - [`types`] — remote gist payloads and validated newtypes
//! - [`error`] — [`SettingsError`]
//! - [`settings`] — load / merge / save / set
//! - [`paths`] — `~/.gistfetch/` layout

pub mod error;
pub mod paths;
pub mod settings;
pub mod types;

pub use error::SettingsError;
pub use settings::{SettingField, Settings, SettingsStore, SyncConfig};
pub use types::{Gist, GistFile, GistId, MirrorPath, OwnerName};
