//! Progress reporting for the crawl loop
//!
//! A run may span hundreds of pages, so every phase transition is reported
//! to a sink. The default sink writes the familiar one-line-per-page log.

use crate::state::{CrawlPhase, StopReason};
use crate::url::PageAddress;

/// What the crawl loop looks like at a phase transition
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProgressSnapshot {
    /// Phase being entered
    pub phase: CrawlPhase,

    /// Pages fetched so far, including the current one
    pub page: u32,

    /// Current page, or the next page when entering `Advancing`
    pub address: PageAddress,

    /// Entries extracted from the current page
    pub raw_on_page: usize,

    /// Entries from the current page that were new
    pub new_on_page: usize,

    /// Entries accepted so far across all pages
    pub total: usize,
}

/// Receives progress at every phase transition
pub trait ProgressSink: Send {
    fn transition(&mut self, snapshot: &ProgressSnapshot);
}

/// Logs progress through `tracing`
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingProgress;

impl ProgressSink for TracingProgress {
    fn transition(&mut self, s: &ProgressSnapshot) {
        match s.phase {
            CrawlPhase::Fetching => {
                tracing::info!("[page {}] Visiting: {}", s.page, s.address);
            }
            CrawlPhase::Extracting => {
                tracing::debug!("[page {}] Extracting entries", s.page);
            }
            CrawlPhase::Deduping => {
                tracing::debug!("[page {}] {} raw entries extracted", s.page, s.raw_on_page);
            }
            CrawlPhase::Resolving => {
                tracing::info!(
                    "[page {}] Found {} raw entries, {} new -> total {}",
                    s.page,
                    s.raw_on_page,
                    s.new_on_page,
                    s.total
                );
            }
            CrawlPhase::Advancing => {
                tracing::info!("[page {}] Next page: {}", s.page, s.address);
            }
            CrawlPhase::Done(StopReason::PageBudget) => {
                tracing::info!("Reached page budget after {} pages. Stopping.", s.page);
            }
            CrawlPhase::Done(StopReason::EndOfPagination) => {
                tracing::info!("No next page found. Reached the end.");
            }
            CrawlPhase::Done(StopReason::RevisitedPage) => {
                tracing::warn!("Next page {} was already visited. Stopping.", s.address);
            }
        }
    }
}

/// Discards all progress
#[derive(Debug, Default, Clone, Copy)]
pub struct NullProgress;

impl ProgressSink for NullProgress {
    fn transition(&mut self, _snapshot: &ProgressSnapshot) {}
}

/// Collects every snapshot, mainly for inspection in tests
impl ProgressSink for Vec<ProgressSnapshot> {
    fn transition(&mut self, snapshot: &ProgressSnapshot) {
        self.push(snapshot.clone());
    }
}
