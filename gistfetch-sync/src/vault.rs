//! Note writer — folders, trash, and atomic note writes inside a vault.
//!
//! All paths taken by [`Vault`] methods are relative to the vault root.
//!
//! ## `write_note` protocol
//!
//! 1. Ensure the parent folder exists.
//! 2. Write to `<path>.gistfetch.tmp`.
//! 3. Rename to the final path (atomic on POSIX); remove the tmp on failure.
//! 4. Set the note's modification time.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use chrono::{DateTime, Utc};
use filetime::FileTime;

use crate::error::{io_err, SyncError};

/// Folder at the vault root that receives replaced notes.
pub const TRASH_DIR: &str = ".trash";

const TMP_SUFFIX: &str = ".gistfetch.tmp";

/// Outcome of [`Vault::ensure_folder`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FolderStatus {
    Created,
    Existed,
}

/// A directory of notes.
#[derive(Debug, Clone)]
pub struct Vault {
    root: PathBuf,
}

impl Vault {
    /// Open the vault at `root`, which must be an existing directory.
    pub fn open(root: impl Into<PathBuf>) -> Result<Self, SyncError> {
        let root = root.into();
        if !root.is_dir() {
            return Err(SyncError::VaultNotFound { path: root });
        }
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Absolute location of a vault-relative path.
    pub fn resolve(&self, relative: &Path) -> PathBuf {
        self.root.join(relative)
    }

    /// Create `relative` (and missing parents). An existing folder is success.
    pub fn ensure_folder(&self, relative: &Path) -> Result<FolderStatus, SyncError> {
        let path = self.resolve(relative);
        if path.is_dir() {
            return Ok(FolderStatus::Existed);
        }
        std::fs::create_dir_all(&path).map_err(|e| io_err(&path, e))?;
        tracing::debug!("created folder {}", path.display());
        Ok(FolderStatus::Created)
    }

    /// Move the note at `relative` into the vault trash.
    ///
    /// Returns the trash location, or `None` when there was nothing to remove.
    pub fn remove_existing(&self, relative: &Path) -> Result<Option<PathBuf>, SyncError> {
        let path = self.resolve(relative);
        match std::fs::symlink_metadata(&path) {
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(io_err(&path, e)),
            Ok(meta) if meta.is_dir() => {
                return Err(io_err(
                    &path,
                    std::io::Error::other("a folder exists where the note should be"),
                ))
            }
            Ok(_) => {}
        }

        let target = self.trash_slot(relative);
        if let Some(parent) = target.parent() {
            std::fs::create_dir_all(parent).map_err(|e| io_err(parent, e))?;
        }
        std::fs::rename(&path, &target).map_err(|e| io_err(&path, e))?;
        tracing::info!("trashed {} -> {}", path.display(), target.display());
        Ok(Some(target))
    }

    /// First free trash location for `relative`: `.trash/<relative>`, then
    /// `.trash/<stem> 1.<ext>`, `.trash/<stem> 2.<ext>`, …
    fn trash_slot(&self, relative: &Path) -> PathBuf {
        let base = self.root.join(TRASH_DIR).join(relative);
        if !base.exists() {
            return base;
        }
        let stem = base
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        let ext = base
            .extension()
            .map(|e| format!(".{}", e.to_string_lossy()))
            .unwrap_or_default();
        (1u32..)
            .map(|n| base.with_file_name(format!("{stem} {n}{ext}")))
            .find(|candidate| !candidate.exists())
            .unwrap_or(base)
    }

    /// Atomically write `content` to `relative` and stamp it with `modified`.
    ///
    /// Returns the absolute path written.
    pub fn write_note(
        &self,
        relative: &Path,
        content: &str,
        modified: DateTime<Utc>,
    ) -> Result<PathBuf, SyncError> {
        let path = self.resolve(relative);
        let tmp = PathBuf::from(format!("{}{TMP_SUFFIX}", path.display()));
        write_atomic(&path, content, &tmp)?;

        let mtime = FileTime::from_system_time(SystemTime::from(modified));
        filetime::set_file_mtime(&path, mtime).map_err(|e| io_err(&path, e))?;

        tracing::info!("wrote: {}", path.display());
        Ok(path)
    }
}

fn write_atomic(path: &Path, content: &str, tmp: &Path) -> Result<(), SyncError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| io_err(parent, e))?;
    }
    if let Some(tmp_parent) = tmp.parent() {
        std::fs::create_dir_all(tmp_parent).map_err(|e| io_err(tmp_parent, e))?;
    }
    std::fs::write(tmp, content).map_err(|e| io_err(tmp, e))?;

    if let Err(e) = std::fs::rename(tmp, path) {
        let _ = std::fs::remove_file(tmp);
        return Err(io_err(path, e));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use std::fs;
    use tempfile::TempDir;

    fn make_vault() -> (TempDir, Vault) {
        let dir = TempDir::new().unwrap();
        let vault = Vault::open(dir.path()).unwrap();
        (dir, vault)
    }

    fn stamp() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 2, 3, 4, 5, 6).unwrap()
    }

    #[test]
    fn open_missing_root_fails() {
        let dir = TempDir::new().unwrap();
        let err = Vault::open(dir.path().join("nope")).unwrap_err();
        assert!(matches!(err, SyncError::VaultNotFound { .. }));
    }

    #[test]
    fn ensure_folder_is_idempotent() {
        let (_dir, vault) = make_vault();
        let rel = Path::new("Gists/demo");
        assert_eq!(vault.ensure_folder(rel).unwrap(), FolderStatus::Created);
        assert_eq!(vault.ensure_folder(rel).unwrap(), FolderStatus::Existed);
        assert!(vault.resolve(rel).is_dir());
    }

    #[test]
    fn ensure_vault_root_already_exists() {
        let (_dir, vault) = make_vault();
        assert_eq!(vault.ensure_folder(Path::new("")).unwrap(), FolderStatus::Existed);
    }

    #[test]
    fn ensure_folder_blocked_by_file_is_an_error() {
        let (_dir, vault) = make_vault();
        fs::write(vault.resolve(Path::new("Gists")), "not a folder").unwrap();
        assert!(vault.ensure_folder(Path::new("Gists")).is_err());
    }

    #[test]
    fn remove_missing_note_is_a_noop() {
        let (_dir, vault) = make_vault();
        assert_eq!(vault.remove_existing(Path::new("demo/a.md")).unwrap(), None);
    }

    #[test]
    fn remove_moves_note_to_trash() {
        let (_dir, vault) = make_vault();
        let rel = Path::new("demo/notes.txt.md");
        vault.write_note(rel, "old", stamp()).unwrap();

        let trashed = vault.remove_existing(rel).unwrap().expect("trashed");
        assert_eq!(trashed, vault.root().join(".trash/demo/notes.txt.md"));
        assert!(!vault.resolve(rel).exists());
        assert_eq!(fs::read_to_string(trashed).unwrap(), "old");
    }

    #[test]
    fn repeated_trash_gets_numbered_names() {
        let (_dir, vault) = make_vault();
        let rel = Path::new("demo/notes.txt.md");
        let mut slots = Vec::new();
        for version in ["v1", "v2", "v3"] {
            vault.write_note(rel, version, stamp()).unwrap();
            slots.push(vault.remove_existing(rel).unwrap().expect("trashed"));
        }
        let trash = vault.root().join(".trash/demo");
        assert_eq!(
            slots,
            vec![
                trash.join("notes.txt.md"),
                trash.join("notes.txt 1.md"),
                trash.join("notes.txt 2.md"),
            ]
        );
        assert_eq!(fs::read_to_string(&slots[2]).unwrap(), "v3");
    }

    #[test]
    fn remove_refuses_folders() {
        let (_dir, vault) = make_vault();
        vault.ensure_folder(Path::new("demo/notes.txt.md")).unwrap();
        assert!(vault.remove_existing(Path::new("demo/notes.txt.md")).is_err());
    }

    #[test]
    fn write_creates_parents_and_keeps_bytes() {
        let (_dir, vault) = make_vault();
        let rel = Path::new("Gists/demo/README.md");
        let content = "line1\r\nline2\n";
        let path = vault.write_note(rel, content, stamp()).unwrap();
        assert_eq!(fs::read_to_string(path).unwrap(), content);
    }

    #[test]
    fn write_sets_modification_time() {
        let (_dir, vault) = make_vault();
        let path = vault.write_note(Path::new("a.md"), "x", stamp()).unwrap();
        let mtime = FileTime::from_last_modification_time(&fs::metadata(path).unwrap());
        assert_eq!(mtime.unix_seconds(), stamp().timestamp());
    }

    #[test]
    fn tmp_file_removed_after_write() {
        let (_dir, vault) = make_vault();
        let path = vault.write_note(Path::new("clean.md"), "data", stamp()).unwrap();
        let tmp = PathBuf::from(format!("{}{TMP_SUFFIX}", path.display()));
        assert!(!tmp.exists(), ".gistfetch.tmp must be cleaned up");
    }

    #[test]
    #[cfg(unix)]
    fn rename_failure_leaves_original_and_cleans_tmp() {
        use std::os::unix::fs::PermissionsExt;

        let root = TempDir::new().unwrap();
        let readonly_dir = root.path().join("readonly");
        fs::create_dir_all(&readonly_dir).unwrap();

        let path = readonly_dir.join("note.md");
        fs::write(&path, "original").unwrap();

        let set_mode = |mode: u32| {
            let mut perms = fs::metadata(&readonly_dir).unwrap().permissions();
            perms.set_mode(mode);
            fs::set_permissions(&readonly_dir, perms).unwrap();
        };
        set_mode(0o555);

        let canary = readonly_dir.join(".writable-check");
        if fs::write(&canary, "").is_ok() {
            fs::remove_file(&canary).unwrap();
            set_mode(0o755);
            eprintln!("skipping: directory permissions are not enforced for this user");
            return;
        }

        let tmp_dir = TempDir::new().unwrap();
        let tmp_path = tmp_dir.path().join("note.md.gistfetch.tmp");

        let result = write_atomic(&path, "new content", &tmp_path);
        set_mode(0o755);

        result.expect_err("rename into a read-only directory must fail");
        let current = fs::read_to_string(&path).unwrap();
        assert_eq!(current, "original", "original note should be intact");
        assert!(!tmp_path.exists(), ".gistfetch.tmp should be cleaned up");
    }
}
