use super::OutputResult;
use crate::crawler::EntryRecord;
use std::fs;
use std::path::Path;

/// Writes entries as a pretty-printed JSON array
///
/// The file is UTF-8 and non-ASCII text is written as is, not escaped.
///
/// # Arguments
///
/// * `path` - Destination file, replaced if it exists
/// * `records` - Entries in the order they should appear
pub fn write_entries(path: &Path, records: &[EntryRecord]) -> OutputResult<()> {
    let mut json = serde_json::to_string_pretty(records)?;
    json.push('\n');
    fs::write(path, json)?;
    Ok(())
}

/// Reads a JSON array of entries written by `write_entries`
pub fn read_entries(path: &Path) -> OutputResult<Vec<EntryRecord>> {
    let content = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&content)?)
}
