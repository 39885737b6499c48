//! `gistfetch list` — show the remote gist listing.

use anyhow::{Context, Result};
use chrono::Local;
use clap::Args;
use serde::Serialize;
use tabled::{settings::Style, Table, Tabled};

use gistfetch_client::{GistClient, GistSource, DEFAULT_API_BASE};
use gistfetch_core::{Gist, OwnerName, SettingsStore};

/// Arguments for `gistfetch list`.
#[derive(Args, Debug)]
pub struct ListArgs {
    /// List this account instead of the configured owner.
    #[arg(long)]
    pub owner: Option<String>,

    /// Emit machine-readable JSON.
    #[arg(long)]
    pub json: bool,

    /// Base URL of the GitHub API.
    #[arg(long, default_value = DEFAULT_API_BASE)]
    pub api_base: String,
}

impl ListArgs {
    pub fn run(self) -> Result<()> {
        let owner = match self.owner {
            Some(owner) => owner,
            None => {
                let store = SettingsStore::load().context("failed to load settings")?;
                store.settings().owner_setting.clone()
            }
        };
        let owner = OwnerName::parse(&owner).context("invalid owner")?;

        let client = GistClient::with_base_url(&self.api_base);
        let gists = client
            .fetch_gists(&owner)
            .with_context(|| format!("failed to list gists for {owner}"))?;

        if self.json {
            let rows: Vec<GistJson> = gists.iter().map(GistJson::from).collect();
            println!(
                "{}",
                serde_json::to_string_pretty(&rows).context("failed to serialize gist listing")?
            );
            return Ok(());
        }

        println!("{} gists for {owner}", gists.len());
        if gists.is_empty() {
            return Ok(());
        }
        let rows: Vec<GistRow> = gists.iter().map(GistRow::from).collect();
        let mut table = Table::new(rows);
        table.with(Style::rounded());
        println!("{table}");
        Ok(())
    }
}

#[derive(Serialize)]
struct GistJson {
    id: String,
    description: Option<String>,
    folder: String,
    public: bool,
    updated_at: String,
    files: Vec<String>,
}

impl From<&Gist> for GistJson {
    fn from(gist: &Gist) -> Self {
        Self {
            id: gist.id.0.clone(),
            description: gist.description.clone(),
            folder: gist.folder_name(),
            public: gist.public,
            updated_at: gist.updated_at.to_rfc3339(),
            files: gist.files.values().map(|f| f.note_file_name()).collect(),
        }
    }
}

#[derive(Tabled)]
struct GistRow {
    #[tabled(rename = "folder")]
    folder: String,
    #[tabled(rename = "id")]
    id: String,
    #[tabled(rename = "files")]
    files: usize,
    #[tabled(rename = "updated")]
    updated: String,
}

impl From<&Gist> for GistRow {
    fn from(gist: &Gist) -> Self {
        Self {
            folder: gist.folder_name(),
            id: gist.id.0.clone(),
            files: gist.files.len(),
            updated: gist
                .updated_at
                .with_timezone(&Local)
                .format("%Y-%m-%d %H:%M")
                .to_string(),
        }
    }
}
