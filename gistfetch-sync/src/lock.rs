//! Run lock that keeps two syncs from writing into a vault at the same time.
//!
//! The lock is an exclusive advisory lock on `~/.gistfetch/run/sync.lock`,
//! held for as long as the [`SyncLock`] guard lives. The OS drops it when the
//! process exits, so a killed run never leaves the lock behind. The file
//! itself stays in place and records the pid and start time of the last run.

use std::fs::{File, OpenOptions};
use std::io::{Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

use chrono::Utc;
use fs4::FileExt;

use gistfetch_core::paths;

use crate::error::{io_err, SyncError};

/// Guard for the sync run lock. Dropping it releases the lock.
#[derive(Debug)]
pub struct SyncLock {
    path: PathBuf,
    file: File,
}

impl SyncLock {
    /// Acquire the lock under `home` without waiting.
    ///
    /// Fails with [`SyncError::Locked`] while another process holds it.
    pub fn acquire_at(home: &Path) -> Result<Self, SyncError> {
        let path = paths::sync_lock_path(home);
        if let Some(dir) = path.parent() {
            std::fs::create_dir_all(dir).map_err(|e| io_err(dir, e))?;
        }

        let mut file = OpenOptions::new()
            .create(true)
            .truncate(false)
            .read(true)
            .write(true)
            .open(&path)
            .map_err(|e| io_err(&path, e))?;

        if let Err(e) = file.try_lock_exclusive() {
            if is_contended(&e) {
                return Err(SyncError::Locked { path });
            }
            return Err(io_err(&path, e));
        }

        record_owner(&mut file).map_err(|e| io_err(&path, e))?;
        tracing::debug!("acquired sync lock {}", path.display());
        Ok(Self { path, file })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for SyncLock {
    fn drop(&mut self) {
        if let Err(e) = self.file.unlock() {
            tracing::warn!("failed to release sync lock {}: {e}", self.path.display());
        }
    }
}

fn is_contended(err: &std::io::Error) -> bool {
    err.kind() == std::io::ErrorKind::WouldBlock
        || err.raw_os_error() == fs4::lock_contended_error().raw_os_error()
}

fn record_owner(file: &mut File) -> std::io::Result<()> {
    file.set_len(0)?;
    file.seek(SeekFrom::Start(0))?;
    writeln!(file, "pid={}", std::process::id())?;
    writeln!(file, "started_at={}", Utc::now().to_rfc3339())?;
    file.flush()
}
