//! # paw-cli
//!
//! Command-line front end for Paw Planet.
//!
//! - `paw animal list/show/add/options` — browse and register profiles
//! - `paw sighting submit` — record a sighting
//! - `paw timeline <id>` — one animal's sightings, newest first
//! - `paw report submit/list/categories` — moderation reports
//! - `paw pending` — new-profile proposals awaiting curation
//! - `paw verify` — check the record logs' hash chains
//! - `paw seed` — register the demo animals
//! - `paw shell` — interactive, screen-by-screen navigation

mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use paw_core::PawConfig;
use tracing_subscriber::EnvFilter;

/// Paw Planet — record gentle campus encounters with stray animals.
#[derive(Parser)]
#[command(name = "paw", version, about)]
struct Cli {
    /// Project root directory (defaults to current directory).
    #[arg(long, default_value = ".")]
    project_root: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Browse and register animal profiles.
    Animal {
        #[command(subcommand)]
        command: commands::animal::AnimalCommands,
    },
    /// Record sightings.
    Sighting {
        #[command(subcommand)]
        command: commands::sighting::SightingCommands,
    },
    /// Show an animal's sightings, newest first.
    Timeline {
        /// Animal id.
        id: paw_core::AnimalId,
        /// Print JSON instead of text.
        #[arg(long)]
        json: bool,
    },
    /// File and review moderation reports.
    Report {
        #[command(subcommand)]
        command: commands::report::ReportCommands,
    },
    /// List new-profile proposals awaiting curation.
    Pending,
    /// Verify the hash chains of the record logs.
    Verify,
    /// Register the demo animals if the registry is empty.
    Seed,
    /// Navigate the screens interactively.
    Shell,
}

fn main() -> anyhow::Result<()> {
    // Logs go to stderr so command output on stdout stays clean.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env()
                .add_directive("paw_core=info".parse()?)
                .add_directive("paw_records=info".parse()?),
        )
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .init();

    let cli = Cli::parse();
    let project_root = cli.project_root.canonicalize().unwrap_or(cli.project_root);
    let config = PawConfig::load(&project_root)?;

    match &cli.command {
        Commands::Animal { command } => commands::animal::execute(command, &config),
        Commands::Sighting { command } => commands::sighting::execute(command, &config),
        Commands::Timeline { id, json } => commands::timeline::execute(*id, *json, &config),
        Commands::Report { command } => commands::report::execute(command, &config),
        Commands::Pending => commands::timeline::pending(&config),
        Commands::Verify => commands::verify::execute(&config),
        Commands::Seed => commands::seed::execute(&config),
        Commands::Shell => commands::shell::execute(&config),
    }
}
