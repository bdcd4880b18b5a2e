mod commands;

use clap::{Parser, Subcommand};
use repolens_pipeline::Services;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "repolens-cli")]
#[command(about = "Operate the repolens ingestion engine from the shell")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Apply pending database migrations
    Migrate,
    /// Run one batch ingest tick now
    Tick,
    /// Analyze a single repository in the foreground
    Analyze {
        /// Repository URL, e.g. `https://github.com/owner/name`
        url: String,
    },
    /// Generate a new cover image for a stored profile
    Regenerate {
        /// Profile id
        id: i64,
    },
    /// Delete profiles older than the retention window
    Sweep,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = repolens_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let pool_config = repolens_db::PoolConfig::from_app_config(&config);
    let pool = repolens_db::connect_pool(&config.database_url, pool_config).await?;

    let services = || Services::from_config(&config, pool.clone());
    match cli.command {
        Commands::Migrate => commands::run_migrate(&pool).await,
        Commands::Tick => commands::run_tick(&services()?).await,
        Commands::Analyze { url } => commands::run_analyze(&services()?, &url).await,
        Commands::Regenerate { id } => commands::run_regenerate(&services()?, id).await,
        Commands::Sweep => commands::run_sweep(&services()?).await,
    }
}
