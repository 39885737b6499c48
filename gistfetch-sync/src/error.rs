//! Error types for gistfetch-sync.

use std::path::PathBuf;

use thiserror::Error;

use gistfetch_client::ClientError;
use gistfetch_core::SettingsError;
use gistfetch_renderer::RenderError;

/// All errors that can arise from sync operations.
#[derive(Debug, Error)]
pub enum SyncError {
    /// An error from the note renderer.
    #[error("render error: {0}")]
    Render(#[from] RenderError),

    /// An error from the settings layer (home lookup, validation).
    #[error("settings error: {0}")]
    Settings(#[from] SettingsError),

    /// An error from the gist API.
    #[error("{0}")]
    Client(#[from] ClientError),

    /// An I/O error, with annotated path for context.
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The vault root does not exist or is not a directory.
    #[error("vault not found at {path}")]
    VaultNotFound { path: PathBuf },

    /// Another sync holds the run lock.
    #[error("another sync is already running (lock held at {path})")]
    Locked { path: PathBuf },
}

/// Convenience constructor for [`SyncError::Io`].
pub(crate) fn io_err(path: impl Into<PathBuf>, source: std::io::Error) -> SyncError {
    SyncError::Io {
        path: path.into(),
        source,
    }
}
