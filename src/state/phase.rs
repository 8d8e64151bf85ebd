/// Phase definitions for the crawl loop
///
/// One run moves through these phases once per page until it reaches `Done`.
use std::fmt;

/// Why a harvest run stopped
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StopReason {
    /// The last visited page had no next-page link
    EndOfPagination,

    /// The configured page budget was used up
    PageBudget,

    /// The next-page link pointed back to a page already visited
    RevisitedPage,
}

impl StopReason {
    /// Returns a stable string form used in logs and summaries
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::EndOfPagination => "end_of_pagination",
            Self::PageBudget => "page_budget",
            Self::RevisitedPage => "revisited_page",
        }
    }
}

impl fmt::Display for StopReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Represents the current phase of the crawl loop
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CrawlPhase {
    // ===== Per-page Phases =====
    /// The current address is being navigated to and rendered
    Fetching,

    /// Entries are being extracted from the rendered markup
    Extracting,

    /// Extracted entries are being checked against the ledger
    Deduping,

    /// The budget is checked and the next page link is looked up
    Resolving,

    /// Waiting out the inter-page delay before the next page
    Advancing,

    // ===== Terminal Phase =====
    /// The run is finished, tagged with the cause
    Done(StopReason),
}

impl CrawlPhase {
    /// Returns true if this is the terminal phase
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Done(_))
    }

    /// Returns the stop reason if the run is finished
    pub fn stop_reason(&self) -> Option<StopReason> {
        match self {
            Self::Done(reason) => Some(*reason),
            _ => None,
        }
    }

    /// Returns a stable string form used in logs
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Fetching => "fetching",
            Self::Extracting => "extracting",
            Self::Deduping => "deduping",
            Self::Resolving => "resolving",
            Self::Advancing => "advancing",
            Self::Done(_) => "done",
        }
    }

    /// Checks if a transition from this phase to another is valid
    ///
    /// Valid transitions:
    /// - Fetching → Extracting
    /// - Extracting → Deduping
    /// - Deduping → Resolving
    /// - Resolving → Advancing | Done
    /// - Advancing → Fetching
    pub fn can_transition_to(&self, to: CrawlPhase) -> bool {
        matches!(
            (self, to),
            (Self::Fetching, Self::Extracting)
                | (Self::Extracting, Self::Deduping)
                | (Self::Deduping, Self::Resolving)
                | (Self::Resolving, Self::Advancing)
                | (Self::Resolving, Self::Done(_))
                | (Self::Advancing, Self::Fetching)
        )
    }
}

impl fmt::Display for CrawlPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Done(reason) => write!(f, "done ({})", reason),
            other => write!(f, "{}", other.as_str()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_terminal() {
        assert!(CrawlPhase::Done(StopReason::PageBudget).is_terminal());
        assert!(!CrawlPhase::Fetching.is_terminal());
        assert!(!CrawlPhase::Advancing.is_terminal());
    }

    #[test]
    fn test_stop_reason() {
        assert_eq!(
            CrawlPhase::Done(StopReason::EndOfPagination).stop_reason(),
            Some(StopReason::EndOfPagination)
        );
        assert_eq!(CrawlPhase::Resolving.stop_reason(), None);
    }

    #[test]
    fn test_valid_transitions() {
        assert!(CrawlPhase::Fetching.can_transition_to(CrawlPhase::Extracting));
        assert!(CrawlPhase::Resolving.can_transition_to(CrawlPhase::Advancing));
        assert!(CrawlPhase::Resolving
            .can_transition_to(CrawlPhase::Done(StopReason::EndOfPagination)));
        assert!(CrawlPhase::Advancing.can_transition_to(CrawlPhase::Fetching));
    }

    #[test]
    fn test_invalid_transitions() {
        assert!(!CrawlPhase::Fetching.can_transition_to(CrawlPhase::Resolving));
        assert!(!CrawlPhase::Deduping.can_transition_to(CrawlPhase::Done(StopReason::PageBudget)));
        assert!(!CrawlPhase::Done(StopReason::PageBudget).can_transition_to(CrawlPhase::Fetching));
    }

    #[test]
    fn test_display() {
        assert_eq!(CrawlPhase::Deduping.to_string(), "deduping");
        assert_eq!(
            CrawlPhase::Done(StopReason::PageBudget).to_string(),
            "done (page_budget)"
        );
        assert_eq!(StopReason::RevisitedPage.to_string(), "revisited_page");
    }
}
