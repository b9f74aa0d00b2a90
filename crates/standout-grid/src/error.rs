//! Error types for the grid crate.

use thiserror::Error;

/// Errors returned by the grid crate.
#[derive(Debug, Error)]
pub enum GridError {
    /// The query broke a constraint; nothing was processed.
    #[error("invalid query: {0}")]
    InvalidQuery(#[from] QueryViolation),

    /// The configuration is unusable.
    #[error("invalid config: {0}")]
    InvalidConfig(String),

    /// A query or config could not be decoded.
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// The row source could not supply a snapshot.
    #[error("row source failed: {0}")]
    Source(String),

    /// The response store failed to load or save.
    #[error("response store failed: {0}")]
    Store(String),
}

/// The constraint a query violated.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QueryViolation {
    /// `page` was 0.
    #[error("page must be >= 1")]
    PageTooSmall,

    /// `pageSize` was 0.
    #[error("pageSize must be >= 1")]
    PageSizeTooSmall,

    /// `pageSize` exceeded the configured maximum.
    #[error("pageSize must be <= {max}, got {size}")]
    PageSizeTooLarge { size: usize, max: usize },

    /// `sortOrder` was neither `asc` nor `desc`.
    #[error("invalid sort order: {0}")]
    InvalidSortOrder(String),

    /// A filter named an operator outside the supported set.
    #[error("invalid filter operator: {operator} (filter {index})")]
    InvalidFilterOperator { index: usize, operator: String },
}

/// Result type for grid operations.
pub type Result<T> = std::result::Result<T, GridError>;
