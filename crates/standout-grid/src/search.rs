//! Free-text search across a row's cells.

use crate::value::{Row, Value};

/// Trimmed search terms shorter than this are ignored.
pub const DEFAULT_MIN_SEARCH_LEN: usize = 2;

/// A normalized search term: trimmed and lowercased.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchTerm {
    needle: String,
}

impl SearchTerm {
    /// Normalizes `raw`, returning `None` when the trimmed term has fewer than
    /// `min_len` characters. `None` means "no search": every row matches.
    pub fn new(raw: &str, min_len: usize) -> Option<Self> {
        let needle = raw.trim().to_lowercase();
        if needle.chars().count() < min_len {
            return None;
        }
        Some(SearchTerm { needle })
    }

    /// Returns the normalized term.
    pub fn as_str(&self) -> &str {
        &self.needle
    }

    /// Tests the term against a row.
    ///
    /// With no `fields`, every cell is scanned; otherwise only the named
    /// columns are, and a named column the row lacks is skipped. Null cells
    /// never match.
    pub fn matches(&self, row: &Row, fields: &[String]) -> bool {
        if fields.is_empty() {
            row.values().any(|value| self.matches_value(value))
        } else {
            fields
                .iter()
                .filter_map(|field| row.get(field))
                .any(|value| self.matches_value(value))
        }
    }

    fn matches_value(&self, value: &Value) -> bool {
        if value.is_null() {
            return false;
        }
        value.to_text().to_lowercase().contains(&self.needle)
    }
}

/// Tests `query` against `row`, case-insensitively.
///
/// Queries shorter than [`DEFAULT_MIN_SEARCH_LEN`] characters after trimming
/// match every row.
///
/// # Example
///
/// ```
/// use standout_grid::{search_matches, Row};
///
/// let row = Row::new("1").with("name", "Bob Smith").with("age", 30);
/// assert!(search_matches(&row, "SMITH", &[]));
/// assert!(search_matches(&row, "30", &[]));
/// assert!(!search_matches(&row, "30", &["name".to_string()]));
/// assert!(search_matches(&row, "z", &[])); // too short to filter
/// ```
pub fn search_matches(row: &Row, query: &str, fields: &[String]) -> bool {
    match SearchTerm::new(query, DEFAULT_MIN_SEARCH_LEN) {
        Some(term) => term.matches(row, fields),
        None => true,
    }
}

/// Keeps the rows matching `term`, preserving their order.
pub fn apply_search<'a>(rows: &[&'a Row], term: &SearchTerm, fields: &[String]) -> Vec<&'a Row> {
    rows.iter()
        .copied()
        .filter(|row| term.matches(row, fields))
        .collect()
}
