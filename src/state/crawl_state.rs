use super::DedupLedger;
use crate::crawler::EntryRecord;
use crate::url::PageAddress;
use std::collections::HashSet;

/// Mutable state of a single harvest run
///
/// Created when a run starts and consumed when it ends. Nothing outside the
/// crawl loop sees it mid-run.
#[derive(Debug)]
pub struct CrawlState {
    /// Address of the page being processed
    pub current: PageAddress,

    /// Address visited before `current`, used as the referer
    pub previous: Option<PageAddress>,

    /// Number of pages fetched so far
    pub pages_visited: u32,

    /// Identities accepted so far
    pub ledger: DedupLedger,

    /// Accepted entries in first-seen order
    pub records: Vec<EntryRecord>,

    /// Entries extracted across all pages, before deduplication
    pub raw_entries: usize,

    /// Every address fetched or about to be fetched
    visited: HashSet<PageAddress>,
}

impl CrawlState {
    pub fn new(start: PageAddress) -> Self {
        let mut visited = HashSet::new();
        visited.insert(start.clone());

        Self {
            current: start,
            previous: None,
            pages_visited: 0,
            ledger: DedupLedger::new(),
            records: Vec::new(),
            raw_entries: 0,
            visited,
        }
    }

    /// Accepts the entries of one page, returning how many were new
    pub fn accept_page(&mut self, entries: Vec<EntryRecord>) -> usize {
        self.raw_entries += entries.len();

        let before = self.records.len();
        for entry in entries {
            if self.ledger.observe(&entry.entry_id) {
                self.records.push(entry);
            }
        }
        self.records.len() - before
    }

    /// Moves on to the next page
    pub fn advance(&mut self, next: PageAddress) {
        self.visited.insert(next.clone());
        let previous = std::mem::replace(&mut self.current, next);
        self.previous = Some(previous);
    }

    /// Returns true if the address was already part of this run
    pub fn has_visited(&self, address: &PageAddress) -> bool {
        self.visited.contains(address)
    }

    /// Returns true if a non-zero budget has been reached
    pub fn budget_exhausted(&self, max_pages: Option<u32>) -> bool {
        match max_pages {
            Some(max) if max > 0 => self.pages_visited >= max,
            _ => false,
        }
    }
}
