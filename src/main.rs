//! Sozluk-Harvester main entry point
//!
//! This is the command-line interface for the topic entry harvester.

use clap::Parser;
use sozluk_harvester::config::{load_config_or_default, validate, Config};
use sozluk_harvester::crawler::harvest;
use sozluk_harvester::output::{print_summary, HarvestSummary};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Sozluk-Harvester: collect every entry of a topic
///
/// Walks all pages of a topic, following next-page links until the end,
/// and saves the deduplicated entries as a JSON array.
#[derive(Parser, Debug)]
#[command(name = "sozluk-harvester")]
#[command(version = "1.0.0")]
#[command(about = "Harvest all entries of a paginated topic", long_about = None)]
struct Cli {
    /// Topic slug or full topic URL (e.g. 'python--12345')
    #[arg(value_name = "TOPIC")]
    topic: String,

    /// Output JSON filename [default: entries.json]
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Maximum number of pages to visit (0 = unbounded)
    #[arg(long, value_name = "N")]
    max_pages: Option<u32>,

    /// Delay between page navigations in milliseconds [default: 1200]
    #[arg(long, value_name = "MS")]
    delay: Option<u64>,

    /// Single-line Cookie header to inject
    #[arg(long, env = "EKSI_COOKIE", hide_env_values = true)]
    cookie: Option<String>,

    /// Run with a visible browser window
    #[arg(long)]
    no_headless: bool,

    /// Path to a TOML configuration file
    #[arg(short, long, value_name = "CONFIG")]
    config: Option<PathBuf>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    let config = match build_config(&cli) {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("Failed to load configuration: {}", e);
            return Err(e);
        }
    };

    tracing::info!(
        "Headless: {}   Delay between pages: {} ms",
        config.browser.headless,
        config.harvest.delay_ms
    );

    match harvest(&config, &cli.topic, cli.cookie.as_deref()).await {
        Ok(outcome) => {
            if !cli.quiet {
                print_summary(&HarvestSummary::from_outcome(&outcome));
            }
            Ok(())
        }
        Err(e) => {
            tracing::error!("Harvest failed: {}", e);
            Err(e.into())
        }
    }
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("sozluk_harvester=info,warn"),
            1 => EnvFilter::new("sozluk_harvester=debug,info"),
            2 => EnvFilter::new("sozluk_harvester=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Loads the configuration file, if any, and applies command-line overrides
fn build_config(cli: &Cli) -> Result<Config, Box<dyn std::error::Error>> {
    if let Some(path) = &cli.config {
        tracing::info!("Loading configuration from: {}", path.display());
    }
    let mut config = load_config_or_default(cli.config.as_deref())?;

    if let Some(output) = &cli.output {
        config.harvest.output_path = output.to_string_lossy().into_owned();
    }
    if let Some(max_pages) = cli.max_pages {
        config.harvest.max_pages = Some(max_pages);
    }
    if let Some(delay) = cli.delay {
        config.harvest.delay_ms = delay;
    }
    if cli.no_headless {
        config.browser.enabled = true;
        config.browser.headless = false;
    }

    validate(&config)?;
    Ok(config)
}
