//! gistfetch — mirror GitHub gists into a notes vault.
//!
//! # Usage
//!
//! ```text
//! gistfetch sync [--vault DIR] [--owner NAME] [--mirror-path PATH] [--dry-run]
//! gistfetch list [--owner NAME] [--json]
//! gistfetch config show [--json]
//! gistfetch config set <field> <value>
//! gistfetch config path
//! ```

mod commands;

use anyhow::Result;
use clap::{ArgAction, Parser, Subcommand};

use commands::{config::ConfigCommand, list::ListArgs, sync::SyncArgs};

// ---------------------------------------------------------------------------
// CLI entry point
// ---------------------------------------------------------------------------

#[derive(Parser, Debug)]
#[command(
    name = "gistfetch",
    version,
    about = "Mirror a GitHub user's gists into a folder of markdown notes",
    long_about = None,
)]
struct Cli {
    /// Increase log output (-v info, -vv debug). RUST_LOG takes precedence.
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Fetch every gist and write one note per file into the vault.
    Sync(SyncArgs),

    /// Show the remote gist listing without writing anything.
    List(ListArgs),

    /// Show or change persisted settings.
    Config {
        #[command(subcommand)]
        command: ConfigCommand,
    },
}

// ---------------------------------------------------------------------------
// Main
// ---------------------------------------------------------------------------

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    match cli.command {
        Commands::Sync(args) => args.run(),
        Commands::List(args) => args.run(),
        Commands::Config { command } => commands::config::run(command),
    }
}

fn init_tracing(verbose: u8) {
    use tracing_subscriber::{fmt, EnvFilter};

    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let _ = fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}
