//! Sync orchestration: gist listing → folders → one note per file.
//!
//! A run is strictly sequential. Each file goes through
//! ensure-parent → remove-existing → fetch-raw → render → write-note (which
//! also applies the modification time); a failing step ends that file's
//! pipeline and is recorded in the [`SyncReport`], other files continue.

use std::path::{Path, PathBuf};

use gistfetch_client::GistSource;
use gistfetch_core::{Gist, GistFile, GistId, MirrorPath, OwnerName, SyncConfig};
use gistfetch_renderer::Renderer;

use crate::error::SyncError;
use crate::vault::{FolderStatus, Vault};

/// What happened to one note.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NoteResult {
    /// Note written; `trashed` is where the previous version went, if any.
    Written { trashed: Option<PathBuf> },
    /// Dry run: the note rendered and would have been written.
    WouldWrite,
    /// A step failed; nothing new was written for this note.
    Failed { error: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoteOutcome {
    pub gist_id: GistId,
    /// Vault-relative note path.
    pub path: PathBuf,
    pub result: NoteResult,
}

/// Summary of a sync run, produced after all work has finished.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncReport {
    pub owner: OwnerName,
    /// Number of gists in the listing (zero when the listing failed).
    pub gists: usize,
    pub listing_error: Option<String>,
    pub notes: Vec<NoteOutcome>,
    pub dry_run: bool,
}

impl SyncReport {
    pub fn written(&self) -> usize {
        self.count(|r| matches!(r, NoteResult::Written { .. }))
    }

    pub fn would_write(&self) -> usize {
        self.count(|r| matches!(r, NoteResult::WouldWrite))
    }

    pub fn failed(&self) -> impl Iterator<Item = &NoteOutcome> {
        self.notes
            .iter()
            .filter(|n| matches!(n.result, NoteResult::Failed { .. }))
    }

    fn count(&self, pred: impl Fn(&NoteResult) -> bool) -> usize {
        self.notes.iter().filter(|n| pred(&n.result)).count()
    }
}

/// Vault-relative path of the note for `file`.
pub fn note_path(mirror: &MirrorPath, gist: &Gist, file: &GistFile) -> PathBuf {
    mirror
        .to_relative()
        .join(gist.folder_name())
        .join(file.note_file_name())
}

/// Mirror every gist of `config.owner` into `vault`.
///
/// Errors never abort the run: a listing failure is reported in
/// [`SyncReport::listing_error`] with nothing written, per-file failures in
/// the note outcomes. With `dry_run`, notes are fetched and rendered but the
/// vault is left untouched.
pub fn run<S: GistSource + ?Sized>(
    source: &S,
    vault: &Vault,
    renderer: &Renderer,
    config: &SyncConfig,
    dry_run: bool,
) -> SyncReport {
    let mut report = SyncReport {
        owner: config.owner.clone(),
        gists: 0,
        listing_error: None,
        notes: Vec::new(),
        dry_run,
    };

    if config.include_private {
        tracing::warn!(
            "includePrivate is set but private gists are not supported; syncing public gists only"
        );
    }

    let mirror_root = config.mirror_path.to_relative();
    if !dry_run && !config.mirror_path.is_root() {
        ensure_folder_logged(vault, &mirror_root);
    }

    let gists = match source.fetch_gists(&config.owner) {
        Ok(gists) => gists,
        Err(e) => {
            tracing::error!("failed to fetch gists for {}: {e}", config.owner);
            report.listing_error = Some(e.to_string());
            return report;
        }
    };
    report.gists = gists.len();
    tracing::info!("{} gists listed for {}", gists.len(), config.owner);

    for gist in &gists {
        if !dry_run {
            ensure_folder_logged(vault, &mirror_root.join(gist.folder_name()));
        }
        for file in gist.files.values() {
            let path = note_path(&config.mirror_path, gist, file);
            let result = match sync_file(source, vault, renderer, gist, file, &path, dry_run) {
                Ok(result) => result,
                Err(e) => {
                    tracing::error!("{}: {e}", path.display());
                    NoteResult::Failed {
                        error: e.to_string(),
                    }
                }
            };
            report.notes.push(NoteOutcome {
                gist_id: gist.id.clone(),
                path,
                result,
            });
        }
    }

    tracing::info!(
        "sync finished: {} gists, {} notes written, {} would write",
        report.gists,
        report.written(),
        report.would_write()
    );
    report
}

fn ensure_folder_logged(vault: &Vault, relative: &Path) {
    match vault.ensure_folder(relative) {
        Ok(FolderStatus::Created) => tracing::info!("{} folder created", relative.display()),
        Ok(FolderStatus::Existed) => {}
        Err(e) => tracing::error!("{e}"),
    }
}

fn sync_file<S: GistSource + ?Sized>(
    source: &S,
    vault: &Vault,
    renderer: &Renderer,
    gist: &Gist,
    file: &GistFile,
    path: &Path,
    dry_run: bool,
) -> Result<NoteResult, SyncError> {
    if dry_run {
        let raw = source.fetch_raw(file)?;
        renderer.render_note(gist, file, &raw)?;
        return Ok(NoteResult::WouldWrite);
    }

    if let Some(parent) = path.parent() {
        vault.ensure_folder(parent)?;
    }
    let trashed = vault.remove_existing(path)?;
    let raw = source.fetch_raw(file)?;
    let note = renderer.render_note(gist, file, &raw)?;
    vault.write_note(path, &note.content, gist.updated_at)?;
    Ok(NoteResult::Written { trashed })
}
