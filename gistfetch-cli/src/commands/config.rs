//! `gistfetch config show|set|path` — the settings panel.

use anyhow::{Context, Result};
use clap::{Args, Subcommand};
use colored::Colorize;
use tabled::{settings::Style, Table, Tabled};

use gistfetch_core::{paths, SettingField, SettingsStore};

/// Show or change persisted settings.
#[derive(Subcommand, Debug)]
pub enum ConfigCommand {
    /// Print every setting with its current value.
    Show(ShowArgs),

    /// Change one setting and save it immediately.
    Set(SetArgs),

    /// Print the location of the settings file.
    Path,
}

#[derive(Args, Debug)]
pub struct ShowArgs {
    /// Emit the persisted JSON document.
    #[arg(long)]
    pub json: bool,
}

#[derive(Args, Debug)]
pub struct SetArgs {
    /// Setting to change: owner, mirror-path or include-private.
    pub field: String,

    /// New value.
    pub value: String,
}

pub fn run(cmd: ConfigCommand) -> Result<()> {
    let home = paths::home_dir().context("could not determine home directory")?;
    match cmd {
        ConfigCommand::Show(args) => show(&SettingsStore::load_at(&home)?, args.json),
        ConfigCommand::Set(args) => set(SettingsStore::load_at(&home)?, args),
        ConfigCommand::Path => {
            println!("{}", paths::settings_path(&home).display());
            Ok(())
        }
    }
}

#[derive(Tabled)]
struct SettingRow {
    #[tabled(rename = "setting")]
    key: &'static str,
    #[tabled(rename = "value")]
    value: String,
    #[tabled(rename = "description")]
    description: &'static str,
}

fn show(store: &SettingsStore, json: bool) -> Result<()> {
    let settings = store.settings();
    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(settings).context("failed to serialize settings")?
        );
        return Ok(());
    }

    let rows: Vec<SettingRow> = SettingField::all()
        .iter()
        .map(|&field| SettingRow {
            key: field.key(),
            value: settings.value_of(field),
            description: field.description(),
        })
        .collect();
    let mut table = Table::new(rows);
    table.with(Style::rounded());
    println!("{table}");

    if let Err(e) = settings.validate() {
        println!("{} {e}", "warning:".yellow());
    }
    Ok(())
}

fn set(mut store: SettingsStore, args: SetArgs) -> Result<()> {
    let field: SettingField = args.field.parse()?;
    store
        .set(field, &args.value)
        .with_context(|| format!("failed to save {field}"))?;
    println!("✓ {field} = {}", store.settings().value_of(field));

    if let Err(e) = store.settings().validate() {
        println!("{} {e}", "warning:".yellow());
    }
    Ok(())
}
