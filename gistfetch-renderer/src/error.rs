//! Error types for gistfetch-renderer.

use std::path::PathBuf;

use thiserror::Error;

/// All errors that can arise while building a note.
#[derive(Debug, Error)]
pub enum RenderError {
    /// Tera template engine error.
    #[error("template engine error: {0}")]
    Tera(#[from] tera::Error),

    /// Frontmatter serialization error.
    #[error("frontmatter serialization error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// Filesystem error while loading user templates.
    #[error("template io error at {path}: {source}")]
    Io { path: PathBuf, source: std::io::Error },
}
