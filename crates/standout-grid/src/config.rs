//! Processor configuration.

use serde::{Deserialize, Serialize};

use crate::error::{GridError, Result};
use crate::ordering::Dir;
use crate::search::DEFAULT_MIN_SEARCH_LEN;

/// Page size used when a query does not set one.
pub const DEFAULT_PAGE_SIZE: usize = 25;

/// Largest page size a query may request by default.
pub const DEFAULT_MAX_PAGE_SIZE: usize = 1000;

/// Settings shared by every query a [`Processor`](crate::Processor) runs.
///
/// Every field is optional on the wire and falls back to its default.
///
/// # Example
///
/// ```
/// use standout_grid::GridConfig;
///
/// let config = GridConfig::from_json(r#"{"maxPageSize": 200}"#).unwrap();
/// assert_eq!(config.max_page_size, 200);
/// assert_eq!(config.default_page_size, 25);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GridConfig {
    /// Page size for queries built with [`Query::from_config`](crate::Query::from_config).
    pub default_page_size: usize,
    /// Upper bound for a query's page size.
    pub max_page_size: usize,
    /// Direction used when a query sorts by a column without naming a direction.
    pub default_sort_order: Dir,
    /// Trimmed search terms shorter than this are ignored.
    pub min_search_length: usize,
}

impl Default for GridConfig {
    fn default() -> Self {
        GridConfig {
            default_page_size: DEFAULT_PAGE_SIZE,
            max_page_size: DEFAULT_MAX_PAGE_SIZE,
            default_sort_order: Dir::Asc,
            min_search_length: DEFAULT_MIN_SEARCH_LEN,
        }
    }
}

impl GridConfig {
    /// Parses and validates a JSON config.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: GridConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Checks that the settings are usable together.
    pub fn validate(&self) -> Result<()> {
        if self.max_page_size == 0 {
            return Err(GridError::InvalidConfig(
                "maxPageSize must be >= 1".to_string(),
            ));
        }
        if self.default_page_size == 0 || self.default_page_size > self.max_page_size {
            return Err(GridError::InvalidConfig(format!(
                "defaultPageSize must be between 1 and {}, got {}",
                self.max_page_size, self.default_page_size
            )));
        }
        if !self.default_sort_order.is_known() {
            return Err(GridError::InvalidConfig(format!(
                "invalid defaultSortOrder: {}",
                self.default_sort_order
            )));
        }
        if self.min_search_length == 0 {
            return Err(GridError::InvalidConfig(
                "minSearchLength must be >= 1".to_string(),
            ));
        }
        Ok(())
    }
}
