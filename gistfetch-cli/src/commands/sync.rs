//! `gistfetch sync` — mirror every gist into the vault.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;

use gistfetch_client::{GistClient, DEFAULT_API_BASE};
use gistfetch_core::{paths, SettingsStore};
use gistfetch_renderer::Renderer;
use gistfetch_sync::{pipeline, NoteResult, SyncLock, SyncReport, Vault};

/// Arguments for `gistfetch sync`.
#[derive(Args, Debug)]
pub struct SyncArgs {
    /// Vault directory the notes are written into.
    #[arg(long, default_value = ".")]
    pub vault: PathBuf,

    /// Mirror this account instead of the configured owner.
    #[arg(long)]
    pub owner: Option<String>,

    /// Vault folder for this run instead of the configured mirror path.
    #[arg(long)]
    pub mirror_path: Option<String>,

    /// Fetch and render every note without touching the vault.
    #[arg(long)]
    pub dry_run: bool,

    /// Base URL of the GitHub API.
    #[arg(long, default_value = DEFAULT_API_BASE)]
    pub api_base: String,
}

impl SyncArgs {
    pub fn run(self) -> Result<()> {
        let home = paths::home_dir().context("could not determine home directory")?;

        let store = SettingsStore::load_at(&home).context("failed to load settings")?;
        let mut settings = store.settings().clone();
        if let Some(owner) = self.owner {
            settings.owner_setting = owner;
        }
        if let Some(mirror_path) = self.mirror_path {
            settings.mirror_path = mirror_path;
        }
        let config = settings
            .validate()
            .context("invalid settings; fix them with `gistfetch config set`")?;

        let vault = Vault::open(&self.vault)
            .with_context(|| format!("cannot use '{}' as a vault", self.vault.display()))?;
        let renderer = Renderer::with_user_templates(&paths::templates_dir(&home))
            .context("failed to load note templates")?;
        let client = GistClient::with_base_url(&self.api_base);

        let _lock = if self.dry_run {
            None
        } else {
            Some(SyncLock::acquire_at(&home).context("could not start sync")?)
        };

        let report = pipeline::run(&client, &vault, &renderer, &config, self.dry_run);
        print_report(&report);
        Ok(())
    }
}

fn print_report(report: &SyncReport) {
    if report.listing_error.is_some() {
        println!("{}", "Failed to fetch gists!".red());
        return;
    }

    let prefix = if report.dry_run { "[dry-run] " } else { "" };
    for note in &report.notes {
        let path = note.path.display();
        match &note.result {
            NoteResult::Written { trashed: None } => println!("  ✎  {path}"),
            NoteResult::Written { trashed: Some(_) } => {
                println!("  ✎  {path} {}", "(replaced)".bright_black())
            }
            NoteResult::WouldWrite => println!("  ~  {path}"),
            NoteResult::Failed { error } => {
                println!("  {}  {path}: {error}", "✗".red())
            }
        }
    }

    println!("{prefix}{} gists fetched!", report.gists);

    let failed = report.failed().count();
    if failed > 0 {
        println!("{}", format!("{failed} notes could not be written").yellow());
    }
}
