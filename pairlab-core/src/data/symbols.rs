//! Symbol list input: one ticker per line.

use super::provider::DataError;
use std::collections::HashSet;
use std::path::Path;

/// Parse a symbol list.
///
/// Lines are trimmed; blank lines and `#` comments are skipped; a repeated
/// symbol keeps its first position.
pub fn parse_symbols(text: &str) -> Vec<String> {
    let mut seen = HashSet::new();
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .filter(|line| seen.insert(*line))
        .map(str::to_string)
        .collect()
}

pub fn read_symbols(path: &Path) -> Result<Vec<String>, DataError> {
    let text = std::fs::read_to_string(path)?;
    Ok(parse_symbols(&text))
}
