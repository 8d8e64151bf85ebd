//! State module for tracking harvest progress
//!
//! # Components
//!
//! - `CrawlPhase`: the phases of the crawl loop and why it stopped
//! - `DedupLedger`: remembers which entry identities were already accepted
//! - `CrawlState`: the mutable state owned by a single harvest run

mod crawl_state;
mod ledger;
mod phase;

// Re-export main types
pub use crawl_state::CrawlState;
pub use ledger::DedupLedger;
pub use phase::{CrawlPhase, StopReason};
