//! Error types for gistfetch-core.

use std::path::PathBuf;

use thiserror::Error;

/// All errors that can arise from settings operations.
#[derive(Debug, Error)]
pub enum SettingsError {
    /// Underlying I/O failure, annotated with the path involved.
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// JSON serialization error (save path).
    #[error("settings serialization error: {0}")]
    Json(#[from] serde_json::Error),

    /// JSON parse error on load, with the offending file.
    #[error("failed to parse settings at {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// `dirs::home_dir()` returned `None` — cannot locate `~/.gistfetch/`.
    #[error("cannot determine home directory; set $HOME or equivalent")]
    HomeNotFound,

    /// `config set` was given a field name that does not exist.
    #[error("unknown setting '{0}'; expected: ownerSetting, mirrorPath, includePrivate")]
    UnknownField(String),

    /// A value could not be converted to the field's type.
    #[error("invalid value '{value}' for {field}: {reason}")]
    InvalidValue {
        field: &'static str,
        value: String,
        reason: String,
    },

    /// The owner identifier is not a valid GitHub account name.
    #[error("invalid owner '{owner}': {reason}")]
    InvalidOwner { owner: String, reason: String },

    /// The mirror path cannot be used as a vault-relative folder.
    #[error("invalid mirror path '{path}': {reason}")]
    InvalidMirrorPath { path: String, reason: String },
}

/// Convenience constructor for [`SettingsError::Io`].
pub(crate) fn io_err(path: impl Into<PathBuf>, source: std::io::Error) -> SettingsError {
    SettingsError::Io {
        path: path.into(),
        source,
    }
}
