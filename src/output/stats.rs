//! Run statistics and summary output

use crate::crawler::HarvestOutcome;
use crate::state::StopReason;
use std::time::Duration;

/// Aggregated numbers for a finished run
#[derive(Debug, Clone, PartialEq)]
pub struct HarvestSummary {
    pub start: String,
    pub pages_visited: u32,
    pub raw_entries: usize,
    pub saved_entries: usize,
    pub duplicates: usize,
    pub anonymous: usize,
    pub stop_reason: StopReason,
    pub elapsed: Duration,
}

impl HarvestSummary {
    pub fn from_outcome(outcome: &HarvestOutcome) -> Self {
        Self {
            start: outcome.start.to_string(),
            pages_visited: outcome.pages_visited,
            raw_entries: outcome.raw_entries,
            saved_entries: outcome.records.len(),
            duplicates: outcome.duplicates,
            anonymous: outcome.anonymous,
            stop_reason: outcome.stop_reason,
            elapsed: outcome.elapsed,
        }
    }

    /// Pages fetched per second over the whole run
    pub fn pages_per_second(&self) -> f64 {
        let secs = self.elapsed.as_secs_f64();
        if secs > 0.0 {
            self.pages_visited as f64 / secs
        } else {
            0.0
        }
    }

    /// Human-readable stop cause
    pub fn stop_description(&self) -> &'static str {
        match self.stop_reason {
            StopReason::EndOfPagination => "reached the last page",
            StopReason::PageBudget => "page budget exhausted",
            StopReason::RevisitedPage => "next page was already visited",
        }
    }
}

/// Prints a run summary to stdout
pub fn print_summary(summary: &HarvestSummary) {
    println!("=== Harvest Summary ===\n");
    println!("Topic: {}", summary.start);
    println!("Stopped: {}", summary.stop_description());
    println!();
    println!("Pages visited: {}", summary.pages_visited);
    println!("Entries found: {}", summary.raw_entries);
    println!("Entries saved: {}", summary.saved_entries);
    println!("  Duplicates skipped: {}", summary.duplicates);
    println!("  Without identity: {}", summary.anonymous);
    println!();
    println!(
        "Elapsed: {:.1}s ({:.2} pages/sec)",
        summary.elapsed.as_secs_f64(),
        summary.pages_per_second()
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crawler::EntryRecord;
    use crate::url::PageAddress;

    fn outcome() -> HarvestOutcome {
        HarvestOutcome {
            start: PageAddress::new("https://eksisozluk.com/t?p=1"),
            records: vec![EntryRecord::default(); 4],
            pages_visited: 2,
            raw_entries: 5,
            duplicates: 1,
            anonymous: 1,
            stop_reason: StopReason::EndOfPagination,
            elapsed: Duration::from_secs(4),
        }
    }

    #[test]
    fn test_from_outcome() {
        let summary = HarvestSummary::from_outcome(&outcome());
        assert_eq!(summary.saved_entries, 4);
        assert_eq!(summary.raw_entries, 5);
        assert_eq!(summary.start, "https://eksisozluk.com/t?p=1");
        assert_eq!(summary.stop_description(), "reached the last page");
    }

    #[test]
    fn test_revisit_description() {
        let mut summary = HarvestSummary::from_outcome(&outcome());
        summary.stop_reason = StopReason::RevisitedPage;
        assert_eq!(summary.stop_description(), "next page was already visited");
    }

    #[test]
    fn test_pages_per_second() {
        let summary = HarvestSummary::from_outcome(&outcome());
        assert!((summary.pages_per_second() - 0.5).abs() < f64::EPSILON);

        let mut instant = summary.clone();
        instant.elapsed = Duration::ZERO;
        assert_eq!(instant.pages_per_second(), 0.0);
    }
}
