//! Article-Harvest main entry point
//!
//! This is the command-line interface for the article harvester.

use anyhow::Context;
use article_harvest::config::{load_config, validate, validate_database_path, Config, SinkKind};
use article_harvest::crawler::{harvest, StopReason};
use clap::Parser;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Article-Harvest: an incremental article harvester
///
/// Walks a paginated article listing, stores every new article together
/// with its full content, and refreshes the engagement counters of
/// articles it has already seen.
#[derive(Parser, Debug)]
#[command(name = "article-harvest")]
#[command(version)]
#[command(about = "An incremental article harvester", long_about = None)]
struct Cli {
    /// Path to the database (or JSON lines log) file
    #[arg(value_name = "DATABASE")]
    database: PathBuf,

    /// Maximum number of listing pages to walk
    #[arg(short, long, value_name = "N")]
    max: Option<u32>,

    /// Cursor of the first listing page, relative to the base URL
    #[arg(short = 'u', long, value_name = "CURSOR")]
    start_url: Option<String>,

    /// Path to an optional TOML configuration file
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Where records are written
    #[arg(long, value_enum)]
    sink: Option<SinkKind>,

    /// Minimum delay between listing pages in milliseconds
    #[arg(long, value_name = "MS")]
    delay_ms: Option<u64>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Show statistics from the database and exit
    #[arg(long, conflicts_with_all = ["max", "start_url", "sink", "delay_ms"])]
    stats: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    if cli.stats {
        return handle_stats(&cli).inspect_err(|e| tracing::error!("{:#}", e));
    }

    let config = build_config(&cli).inspect_err(|e| tracing::error!("{:#}", e))?;
    handle_harvest(config).await
}

/// Sets up the logging/tracing subscriber based on verbosity level
///
/// Logs go to stderr; stdout carries the progress lines.
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("article_harvest=info,warn"),
            1 => EnvFilter::new("article_harvest=debug,info"),
            2 => EnvFilter::new("article_harvest=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Merges the config file with command-line overrides and validates the result
fn build_config(cli: &Cli) -> anyhow::Result<Config> {
    let mut config = match &cli.config {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path.display());
            load_config(path)
                .with_context(|| format!("Failed to load configuration {}", path.display()))?
        }
        None => Config::default(),
    };

    config.output.database_path = cli.database.display().to_string();
    if let Some(max) = cli.max {
        config.crawler.max_pages = max;
    }
    if let Some(cursor) = &cli.start_url {
        config.crawler.start_cursor = cursor.clone();
    }
    if let Some(sink) = cli.sink {
        config.output.sink = sink;
    }
    if let Some(delay) = cli.delay_ms {
        config.crawler.page_delay_ms = delay;
    }

    validate(&config).context("Invalid configuration")?;
    validate_database_path(&config.output).context("Invalid database path")?;

    Ok(config)
}

/// Handles the --stats mode: shows statistics from the database
fn handle_stats(cli: &Cli) -> anyhow::Result<()> {
    use article_harvest::output::{load_statistics, print_statistics};
    use article_harvest::storage::SqliteStore;

    if !cli.database.exists() {
        anyhow::bail!("Database {} does not exist", cli.database.display());
    }

    println!("Database: {}\n", cli.database.display());

    let store = SqliteStore::new(&cli.database)
        .with_context(|| format!("Failed to open {}", cli.database.display()))?;
    let stats = load_statistics(&store)?;
    print_statistics(&stats);

    Ok(())
}

/// Handles the main harvest operation
async fn handle_harvest(config: Config) -> anyhow::Result<()> {
    tracing::info!(
        "Harvesting into {} ({:?} sink)",
        config.output.database_path,
        config.output.sink
    );

    match harvest(&config).await {
        Ok(report) => {
            let reason = match report.stop {
                StopReason::Exhausted => "listing exhausted",
                StopReason::BudgetReached => "page budget reached",
            };
            tracing::info!(
                "Harvest completed after {} pages ({}): {} new, {} refreshed",
                report.totals.pages,
                reason,
                report.totals.inserted,
                report.totals.refreshed
            );
            Ok(())
        }
        Err(e) => {
            tracing::error!("Harvest failed: {}", e);
            Err(e.into())
        }
    }
}
