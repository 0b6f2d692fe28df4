#![forbid(unsafe_code)]

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;
use tracing_subscriber::FmtSubscriber;

use flux_studio::api::MockProjectSource;
use flux_studio::cli::{self, Cli, Command};
use flux_studio::constants::logging::LOG_LEVEL_ENV;
use flux_studio::gui;
use flux_studio::settings::{FileStorage, SettingsStore};

fn init_tracing(flag: Option<&str>) -> Result<()> {
    // --log-level wins over LOG_LEVEL
    let raw = match flag {
        Some(level) => level.to_string(),
        None => std::env::var(LOG_LEVEL_ENV).unwrap_or_else(|_| "info".to_string()),
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(cli::parse_log_level(&raw))
        .with_writer(std::io::stderr)
        .finish();

    tracing::subscriber::set_global_default(subscriber).context("Failed to install tracing subscriber")
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.log_level.as_deref())?;

    let storage = match &cli.config_dir {
        Some(dir) => FileStorage::new(dir.clone()),
        None => FileStorage::default_location(),
    };
    info!(dir = %storage.dir().display(), "Using settings storage");
    let mut store = SettingsStore::load(storage);

    match cli.command.unwrap_or(Command::Studio) {
        Command::Studio => gui::run_gui(store),
        Command::Settings(command) => cli::run_settings(command, &mut store, &mut std::io::stdout().lock()),
        Command::Projects { impact } => {
            let runtime = tokio::runtime::Builder::new_current_thread()
                .enable_time()
                .build()
                .context("Failed to build runtime")?;
            let source = MockProjectSource::default();
            runtime.block_on(cli::run_projects(&source, impact.as_deref(), &mut std::io::stdout().lock()))
        }
    }
}
