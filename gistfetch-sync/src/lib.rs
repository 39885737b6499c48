//! # gistfetch-sync
//!
//! Mirrors gists into a vault as notes.
//!
//! [`Vault`] owns the filesystem side (folders, trash, atomic note writes),
//! [`pipeline::run`] drives a whole sync and returns a [`SyncReport`], and
//! [`SyncLock`] keeps concurrent syncs apart.

pub mod error;
pub mod lock;
pub mod pipeline;
pub mod vault;

pub use error::SyncError;
pub use lock::SyncLock;
pub use pipeline::{note_path, run, NoteOutcome, NoteResult, SyncReport};
pub use vault::{FolderStatus, Vault, TRASH_DIR};
