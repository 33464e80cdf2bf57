// Morrow command-line entry point

mod commands;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use log::LevelFilter;
use morrow::services::settings::{resolve_data_file, SettingsService};

use commands::Context;

#[derive(Parser)]
#[command(name = "morrow", version, about = "Count down to the events that matter")]
struct Cli {
    /// Config file (defaults to the platform config directory)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Event file, overriding the configured one
    #[arg(long, global = true)]
    data: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List events with their remaining time
    List(commands::list::ListArgs),
    /// Add an event
    Add(commands::add::AddArgs),
    /// Change fields of an existing event
    Edit(commands::edit::EditArgs),
    /// Remove an event by id
    Remove {
        id: String,
    },
    /// Import events from a GraphQL JSON export
    Import {
        file: PathBuf,
    },
    /// Show live countdowns until Ctrl-C or every event has ended
    Watch(commands::watch::WatchArgs),
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging before the config is read. Without RUST_LOG the
    // configured level is applied as the max level once it is known.
    let env_filter = std::env::var_os(env_logger::DEFAULT_FILTER_ENV).is_some();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("trace")).init();
    if !env_filter {
        log::set_max_level(LevelFilter::Info);
    }

    let settings_service = match &cli.config {
        Some(path) => SettingsService::new(path),
        None => SettingsService::at_default_location(),
    };
    let mut settings = settings_service.get()?;
    if let Some(data) = cli.data {
        settings.data_file = Some(data);
    }
    if !env_filter {
        log::set_max_level(settings.log_filter());
    }

    let data_file = resolve_data_file(&settings);
    log::debug!(
        "Using config {} and events {}",
        settings_service.path().display(),
        data_file.display()
    );

    let ctx = Context {
        settings,
        data_file,
    };

    match cli.command {
        Command::List(args) => commands::list::run(&ctx, args),
        Command::Add(args) => commands::add::run(&ctx, args),
        Command::Edit(args) => commands::edit::run(&ctx, args),
        Command::Remove { id } => commands::remove::run(&ctx, &id),
        Command::Import { file } => commands::import::run(&ctx, &file),
        Command::Watch(args) => commands::watch::run(&ctx, args).await,
    }
}
