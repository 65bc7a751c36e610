mod db;
mod discover;
mod estimate;
mod ingest;

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "laudo-cli")]
#[command(about = "Listing ingestion and comparable-based valuation")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Database maintenance.
    Db {
        #[command(subcommand)]
        command: DbCommands,
    },
    /// Fetch the listings named in a file of print-page URLs and store them.
    Ingest {
        /// File with one listing URL per line.
        #[arg(long)]
        input: PathBuf,
        /// Fetch and parse, but do not write to the database.
        #[arg(long)]
        dry_run: bool,
    },
    /// Check a range of listing ids and record which ones are live.
    Discover {
        /// First id to check (inclusive).
        #[arg(long)]
        start: i64,
        /// Last id to check (inclusive). Sweeps downward when below `start`.
        #[arg(long)]
        end: i64,
        /// Directory for `valid_urls.txt` and `invalid_urls.txt`.
        #[arg(long, default_value = ".")]
        out_dir: PathBuf,
        /// Skip URLs already present in the output files.
        #[arg(long)]
        resume: bool,
    },
    /// Estimate a property's value from stored comparables.
    Estimate(EstimateArgs),
}

#[derive(Debug, Subcommand)]
enum DbCommands {
    Ping,
    Migrate,
}

#[derive(Debug, Args)]
pub(crate) struct EstimateArgs {
    #[arg(long)]
    pub city: Option<String>,
    #[arg(long)]
    pub neighborhood: Option<String>,
    #[arg(long)]
    pub address: Option<String>,
    #[arg(long)]
    pub property_type: Option<String>,
    /// `Venda` or `Aluguel`; `*` disables the filter.
    #[arg(long, default_value = "Venda")]
    pub transaction_type: String,
    #[arg(long)]
    pub bedrooms: Option<i32>,
    #[arg(long)]
    pub suites: Option<i32>,
    #[arg(long)]
    pub parking: Option<i32>,
    /// `"200-250"`, `"220"` or `"*"`.
    #[arg(long)]
    pub area: Option<String>,
    /// Area to value, overriding anything derived from `--area`.
    #[arg(long)]
    pub target_area: Option<f64>,
    /// `reformado`, `original`, or anything else for standard condition.
    #[arg(long)]
    pub condition: Option<String>,
    /// Relative area tolerance; defaults to `LAUDO_AREA_TOLERANCE`.
    #[arg(long)]
    pub tolerance: Option<f64>,
    /// Print the raw valuation as JSON.
    #[arg(long)]
    pub json: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    let Some(command) = cli.command else {
        println!("laudo-cli: run with --help to list commands");
        return Ok(());
    };

    let config = laudo_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    match command {
        Commands::Db { command } => {
            let pool = connect(&config).await?;
            match command {
                DbCommands::Ping => db::run_db_ping(&pool).await?,
                DbCommands::Migrate => db::run_db_migrate(&pool).await?,
            }
        }
        Commands::Ingest { input, dry_run } => {
            let pool = if dry_run {
                None
            } else {
                Some(connect(&config).await?)
            };
            ingest::run_ingest(pool.as_ref(), &config, &input).await?;
        }
        Commands::Discover {
            start,
            end,
            out_dir,
            resume,
        } => {
            let options = discover::DiscoverOptions {
                start,
                end,
                out_dir,
                resume,
            };
            discover::run_discover(&config, &options).await?;
        }
        Commands::Estimate(args) => {
            let pool = connect(&config).await?;
            estimate::run_estimate(&pool, &config, &args).await?;
        }
    }

    Ok(())
}

async fn connect(config: &laudo_core::AppConfig) -> anyhow::Result<sqlx::PgPool> {
    let pool_config = laudo_db::PoolConfig::from_app_config(config);
    let pool = laudo_db::connect_pool(config.require_database_url()?, pool_config).await?;
    Ok(pool)
}
