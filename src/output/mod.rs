//! Output module for writing harvested entries
//!
//! This module handles:
//! - Writing the accepted entries as a pretty-printed JSON array
//! - Reading such a file back
//! - Summarizing a finished run for the operator

mod json;
pub mod stats;

pub use json::{read_entries, write_entries};
pub use stats::{print_summary, HarvestSummary};

use thiserror::Error;

/// Errors that can occur during output operations
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("Failed to serialize entries: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for output operations
pub type OutputResult<T> = Result<T, OutputError>;
