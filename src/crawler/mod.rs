//! Crawler module for topic harvesting
//!
//! This module contains the core harvesting logic, including:
//! - Page rendering through HTTP or a headless browser
//! - Entry extraction from rendered markup
//! - Next-page discovery
//! - The crawl loop tying them together

#[cfg(feature = "browser")]
mod browser;
mod coordinator;
mod fetcher;
mod pagination;
mod parser;
mod progress;

#[cfg(feature = "browser")]
pub use browser::BrowserFetcher;
pub use coordinator::{Coordinator, HarvestOutcome};
pub use fetcher::{build_http_client, parse_cookie_header, HttpFetcher, PageFetcher, SessionCookie};
pub use pagination::{find_next_page, PaginationResolver};
pub use parser::{extract_entries, EntryExtractor, EntryRecord};
pub use progress::{NullProgress, ProgressSink, ProgressSnapshot, TracingProgress};

use crate::config::Config;
use crate::output::write_entries;
use crate::{FetchError, HarvestError};
use std::path::Path;

/// Runs a complete harvest of a topic
///
/// This is the main entry point for a run. It will:
/// 1. Validate the configuration and compile selectors
/// 2. Start the configured renderer
/// 3. Walk the topic page by page
/// 4. Write the accepted entries to the configured output path
///
/// A failed write is logged but does not fail the run; the outcome is still
/// returned.
///
/// # Arguments
///
/// * `config` - The harvester configuration
/// * `topic` - Topic slug or full topic URL
/// * `cookie_header` - Optional single-line `Cookie` header
pub async fn harvest(
    config: &Config,
    topic: &str,
    cookie_header: Option<&str>,
) -> Result<HarvestOutcome, HarvestError> {
    let coordinator = Coordinator::new(config)?;
    let mut fetcher = build_fetcher(config).await?;
    let mut progress = TracingProgress;

    let outcome = coordinator
        .run(topic, cookie_header, fetcher.as_mut(), &mut progress)
        .await?;

    save_outcome(&outcome, Path::new(&config.harvest.output_path));
    Ok(outcome)
}

/// Writes the outcome's entries, reporting but not propagating failures
pub fn save_outcome(outcome: &HarvestOutcome, path: &Path) -> bool {
    match write_entries(path, &outcome.records) {
        Ok(()) => {
            tracing::info!(
                "Harvest finished. {} entries saved -> {}",
                outcome.records.len(),
                path.display()
            );
            true
        }
        Err(e) => {
            tracing::error!("Error writing output file {}: {}", path.display(), e);
            false
        }
    }
}

/// Starts the renderer selected by the configuration
pub async fn build_fetcher(config: &Config) -> Result<Box<dyn PageFetcher>, FetchError> {
    #[cfg(feature = "browser")]
    if config.browser.enabled {
        return Ok(Box::new(BrowserFetcher::launch(&config.browser).await?));
    }

    tracing::info!("Rendering pages over plain HTTP");
    Ok(Box::new(HttpFetcher::new(&config.browser)?))
}
