mod cli;
mod commands;

use std::{process::ExitCode, sync::Arc};

use anyhow::Context;
use clap::Parser;
use tracing::debug;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use cli::{Cli, Commands, Config};
use commands::{detail, report, search, stats, status, units};
use lisdes::{AreaTable, AtlasError, AtlasStore, Dashboard, MemoryStore, MongoStore, Snapshot};

fn init_tracing(config: &Config) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| format!("lisdes={},warn", config.log_level).into());
    let registry = tracing_subscriber::registry().with(filter);
    // Logs go to stderr; stdout carries the JSON output.
    if config.log_json {
        registry.with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr)).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr)).init();
    }
}

async fn dashboard(config: &Config) -> anyhow::Result<Dashboard> {
    let areas = match &config.area_table {
        Some(path) => AreaTable::install(AreaTable::from_json_file(path)?)
            .with_context(|| format!("[main] Failed to install area table from {}", path.display()))?,
        None => AreaTable::global(),
    };

    let store: Arc<dyn AtlasStore> = match &config.fixture {
        Some(path) => {
            debug!("[main] serving fixture {}", path.display());
            Arc::new(MemoryStore::new(Snapshot::from_json_file(path)?))
        }
        None => Arc::new(
            MongoStore::connect(&config.mongodb_uri, &config.mongodb_db, config.collections()).await
                .context("[main] Failed to open storage")?,
        ),
    };
    Ok(Dashboard::new(store, areas))
}

async fn run(cli: &Cli) -> anyhow::Result<()> {
    let dashboard = dashboard(&cli.config).await?;
    match &cli.command {
        Commands::Stats => stats::statistics(&dashboard).await,
        Commands::Areas => stats::areas(&dashboard).await,
        Commands::Regency(args) => detail::regency(&dashboard, args).await,
        Commands::District(args) => detail::district(&dashboard, args).await,
        Commands::Village(args) => detail::village(&dashboard, args).await,
        Commands::Units(args) => units::grouping(&dashboard, args).await,
        Commands::Offices(args) => units::offices(&dashboard, args).await,
        Commands::Search(args) => search::run(&dashboard, args).await,
        Commands::SetStatus(args) => status::run(&dashboard, args).await,
        Commands::Report(args) => report::run(&dashboard, args).await,
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let _ = dotenvy::dotenv();
    let cli = Cli::parse();
    init_tracing(&cli.config);

    match run(&cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {:#}", err);
            let retryable = err.chain().any(|e| e.downcast_ref::<AtlasError>().is_some_and(AtlasError::is_retryable));
            if retryable {
                eprintln!("storage is unavailable; try again later");
            }
            ExitCode::FAILURE
        }
    }
}
