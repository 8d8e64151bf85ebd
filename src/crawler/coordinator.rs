//! Crawler coordinator - main harvest orchestration logic
//!
//! This module contains the crawl loop that walks a topic page by page:
//! - Normalizing the topic to its first page
//! - Injecting session cookies
//! - Fetching, extracting and deduplicating each page
//! - Following next-page links until pagination ends or the budget runs out

use crate::config::{validate, Config, HarvestConfig};
use crate::crawler::fetcher::{parse_cookie_header, PageFetcher};
use crate::crawler::pagination::PaginationResolver;
use crate::crawler::parser::{EntryExtractor, EntryRecord};
use crate::crawler::progress::{ProgressSink, ProgressSnapshot};
use crate::state::{CrawlPhase, CrawlState, StopReason};
use crate::url::{normalize_topic, trim_origin, PageAddress};
use crate::{ConfigError, FetchError, HarvestError};
use std::time::{Duration, Instant};

/// Result of a finished harvest run
#[derive(Debug, Clone)]
pub struct HarvestOutcome {
    /// Normalized first-page address
    pub start: PageAddress,

    /// Accepted entries in first-seen order
    pub records: Vec<EntryRecord>,

    /// Number of pages fetched
    pub pages_visited: u32,

    /// Entries extracted across all pages before deduplication
    pub raw_entries: usize,

    /// Entries dropped because their identity was already recorded
    pub duplicates: usize,

    /// Entries kept without an identity
    pub anonymous: usize,

    /// Why the run stopped
    pub stop_reason: StopReason,

    /// Wall-clock duration of the crawl loop
    pub elapsed: Duration,
}

/// Main harvest coordinator structure
pub struct Coordinator {
    settings: HarvestConfig,
    cookie_domain: String,
    extractor: EntryExtractor,
    pagination: PaginationResolver,
}

impl Coordinator {
    /// Creates a new coordinator instance
    ///
    /// # Arguments
    ///
    /// * `config` - The harvester configuration
    ///
    /// # Returns
    ///
    /// * `Ok(Coordinator)` - Configuration is valid and selectors compiled
    /// * `Err(ConfigError)` - The configuration was rejected
    pub fn new(config: &Config) -> Result<Self, ConfigError> {
        validate(config)?;

        Ok(Self {
            settings: config.harvest.clone(),
            cookie_domain: config.cookie_domain(),
            extractor: EntryExtractor::new(&config.selectors, &config.harvest.base_url)?,
            pagination: PaginationResolver::new(&config.selectors)?,
        })
    }

    /// Runs one harvest of a topic
    ///
    /// This is the core loop that:
    /// 1. Normalizes the topic to its first page
    /// 2. Injects cookies from the header, if any
    /// 3. Fetches, extracts and deduplicates each page
    /// 4. Follows next-page links until pagination ends or the budget is used up
    /// 5. Closes the fetcher, whether the crawl succeeded or not
    pub async fn run(
        &self,
        topic: &str,
        cookie_header: Option<&str>,
        fetcher: &mut dyn PageFetcher,
        progress: &mut dyn ProgressSink,
    ) -> Result<HarvestOutcome, HarvestError> {
        let start = normalize_topic(topic, &self.settings.base_url);
        tracing::info!("Starting harvest for: {}", start);
        tracing::info!("Delay between pages: {} ms", self.settings.delay_ms);
        match self.settings.max_pages {
            Some(max) if max > 0 => tracing::info!("Page budget: {}", max),
            _ => tracing::info!("Page budget: unbounded"),
        }

        self.inject_cookies(cookie_header, fetcher).await;

        let result = self.crawl(start, fetcher, progress).await;
        fetcher.close().await;
        result
    }

    /// Injects cookies from a header string; failures only produce a warning
    async fn inject_cookies(&self, cookie_header: Option<&str>, fetcher: &mut dyn PageFetcher) {
        let header = match cookie_header.map(str::trim).filter(|h| !h.is_empty()) {
            Some(header) => header,
            None => {
                tracing::info!("No cookie header provided: public pages only.");
                return;
            }
        };

        let cookies = parse_cookie_header(header, &self.cookie_domain);
        tracing::info!(
            "Cookie header provided: {} cookies will be injected for {}",
            cookies.len(),
            self.cookie_domain
        );

        if let Err(e) = fetcher.inject_cookies(&cookies).await {
            tracing::warn!("Failed to add cookies, continuing without them: {}", e);
        }
    }

    async fn crawl(
        &self,
        start: PageAddress,
        fetcher: &mut dyn PageFetcher,
        progress: &mut dyn ProgressSink,
    ) -> Result<HarvestOutcome, HarvestError> {
        let started = Instant::now();
        let first_referer = format!("{}/", trim_origin(&self.settings.base_url));
        let delay = Duration::from_millis(self.settings.delay_ms);
        let mut state = CrawlState::new(start.clone());
        let mut revisited = None;

        let stop_reason = loop {
            state.pages_visited += 1;
            report(progress, CrawlPhase::Fetching, &state, &state.current, 0, 0);

            let referer = match &state.previous {
                Some(previous) => previous.as_str().to_string(),
                None => first_referer.clone(),
            };
            let settle = state.previous.is_none();
            let markup = self.fetch(&state.current, &referer, settle, fetcher).await?;

            report(progress, CrawlPhase::Extracting, &state, &state.current, 0, 0);
            let entries = self.extractor.extract(&markup);
            let raw = entries.len();

            report(progress, CrawlPhase::Deduping, &state, &state.current, raw, 0);
            let new = state.accept_page(entries);

            report(progress, CrawlPhase::Resolving, &state, &state.current, raw, new);
            if state.budget_exhausted(self.settings.max_pages) {
                break StopReason::PageBudget;
            }

            let next = match self.pagination.next_page(&markup, &state.current) {
                Some(next) if state.has_visited(&next) => {
                    revisited = Some(next);
                    break StopReason::RevisitedPage;
                }
                Some(next) => next,
                None => break StopReason::EndOfPagination,
            };

            report(progress, CrawlPhase::Advancing, &state, &next, raw, new);
            fetcher.wait(delay).await;
            state.advance(next);
        };

        let last = revisited.as_ref().unwrap_or(&state.current);
        report(progress, CrawlPhase::Done(stop_reason), &state, last, 0, 0);

        Ok(HarvestOutcome {
            start,
            duplicates: state.ledger.duplicates(),
            anonymous: state.ledger.anonymous(),
            records: state.records,
            pages_visited: state.pages_visited,
            raw_entries: state.raw_entries,
            stop_reason,
            elapsed: started.elapsed(),
        })
    }

    /// Navigates to a page and returns its markup
    ///
    /// With `settle` set, the page gets `settle_ms` to finish client-side
    /// rendering before it is read again. Only the first page needs this;
    /// later pages already get the inter-page delay.
    async fn fetch(
        &self,
        address: &PageAddress,
        referer: &str,
        settle: bool,
        fetcher: &mut dyn PageFetcher,
    ) -> Result<String, FetchError> {
        let markup = fetcher.navigate(address, referer).await?;
        if !settle || self.settings.settle_ms == 0 {
            return Ok(markup);
        }

        fetcher
            .wait(Duration::from_millis(self.settings.settle_ms))
            .await;
        fetcher.render(address).await
    }
}

fn report(
    progress: &mut dyn ProgressSink,
    phase: CrawlPhase,
    state: &CrawlState,
    address: &PageAddress,
    raw_on_page: usize,
    new_on_page: usize,
) {
    progress.transition(&ProgressSnapshot {
        phase,
        page: state.pages_visited,
        address: address.clone(),
        raw_on_page,
        new_on_page,
        total: state.records.len(),
    });
}
