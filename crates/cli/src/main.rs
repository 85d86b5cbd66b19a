mod commands;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use casebook_core::ENV_DATABASE_URL;
use casebook_service::{MigrationService, RunnerConfig};
use casebook_storage::PgMigrationStore;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "casebook")]
#[command(about = "Schema migrations for the casebook test-case manager", long_about = None)]
struct Cli {
    /// PostgreSQL URL (defaults to $DATABASE_URL)
    #[arg(long, global = true)]
    database_url: Option<String>,
    /// Directory holding the .sql migration files (defaults to $CASEBOOK_MIGRATIONS_DIR)
    #[arg(long, global = true)]
    migrations_dir: Option<PathBuf>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Apply or inspect migrations
    Migrate {
        #[command(subcommand)]
        action: MigrateAction,
    },
    /// Serve the migration admin API over HTTP
    Serve {
        #[arg(short, long, default_value = "37780")]
        port: u16,
        #[arg(short = 'H', long, default_value = "127.0.0.1")]
        host: String,
    },
}

#[derive(Subcommand)]
enum MigrateAction {
    /// Apply every pending migration
    Run,
    /// Show applied and pending migrations
    Status,
    /// List ledger rows with their timestamps
    History,
}

pub(crate) fn get_database_url(flag: Option<String>) -> Result<String> {
    flag.or_else(|| std::env::var(ENV_DATABASE_URL).ok())
        .filter(|url| !url.trim().is_empty())
        .ok_or_else(|| anyhow::anyhow!("{ENV_DATABASE_URL} must be set or --database-url given"))
}

pub(crate) async fn build_service(
    database_url: &str,
    migrations_dir: Option<PathBuf>,
) -> Result<Arc<MigrationService>> {
    let mut config = RunnerConfig::from_env();
    if let Some(dir) = migrations_dir {
        config = config.with_migrations_dir(dir);
    }
    tracing::debug!(dir = %config.migrations_dir.display(), "using migrations directory");
    let store = PgMigrationStore::connect(database_url, config.max_connections).await?;
    Ok(Arc::new(MigrationService::from_config(Arc::new(store), &config)))
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let database_url = get_database_url(cli.database_url)?;
    let service = build_service(&database_url, cli.migrations_dir).await?;

    match cli.command {
        Commands::Migrate { action } => match action {
            MigrateAction::Run => commands::migrate::run(&service).await?,
            MigrateAction::Status => commands::migrate::status(&service).await?,
            MigrateAction::History => commands::migrate::history(&service).await?,
        },
        Commands::Serve { port, host } => commands::serve::run(service, port, host).await?,
    }

    Ok(())
}
