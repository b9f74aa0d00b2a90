//! Grid - query pipeline for in-memory tables.
//!
//! Grid takes a snapshot of rows and a declarative [`Query`] and produces one
//! page of results plus summary statistics. It supports:
//!
//! - Loosely typed cells: strings, numbers, booleans, timestamps, null
//! - Free-text search over all columns or a chosen few
//! - Column filters with fifteen operators, AND-combined
//! - Single-column or prioritized multi-column stable sorting
//! - `count`, `sum`, `avg`, `min` and `max` aggregates
//! - Pagination that clamps out-of-range pages instead of failing
//!
//! # Quick Start
//!
//! ```rust
//! use standout_grid::{Aggregate, AggregateFn, Filter, Operator, Processor, Query, Row};
//!
//! let rows = vec![
//!     Row::new("1").with("name", "Bob").with("age", 30),
//!     Row::new("2").with("name", "Ann").with("age", 25),
//!     Row::new("3").with("name", "Cy").with("age", 52),
//! ];
//!
//! let query = Query {
//!     filters: vec![Filter::new("age", Operator::Gte, 28)],
//!     sort_by: Some("name".to_string()),
//!     aggregates: vec![Aggregate::new("age", AggregateFn::Max)],
//!     ..Query::default()
//! };
//!
//! let response = Processor::default().process(&rows, &query).unwrap();
//! assert_eq!(response.total_rows, 3);
//! assert_eq!(response.filtered_rows, 2);
//! assert_eq!(response.rows[0].id, "1");
//! assert_eq!(response.aggregates["age_max"].as_f64(), 52.0);
//! ```
//!
//! # Pipeline
//!
//! Every query runs the same stages in the same order:
//!
//! ```text
//! validate -> search -> filter -> sort -> aggregate -> paginate
//! ```
//!
//! - Aggregates see the filtered rows, never the whole table or only the page.
//! - `total_rows` counts the input; `filtered_rows` counts what survived
//!   search and filters.
//! - An invalid query fails before any stage runs; odd data never fails.
//!
//! # Comparing Values
//!
//! Filters and sorts share one comparator. Null comes first; values that both
//! read as numbers compare numerically; values that both read as RFC 3339
//! timestamps compare chronologically; anything else compares as text.
//!
//! | Operators | Reads |
//! |-----------|-------|
//! | `eq`, `ne`, `gt`, `gte`, `lt`, `lte` | `value` |
//! | `contains`, `not_contains`, `starts_with`, `ends_with` | `value`, case-insensitive |
//! | `between`, `in`, `not_in` | `values` |
//! | `is_null`, `is_not_null` | nothing |

mod aggregate;
mod compare;
mod config;
mod error;
mod filter;
mod op;
mod ordering;
mod paginate;
mod processor;
mod query;
mod search;
mod traits;
mod value;

// Re-export public API
pub use aggregate::{compute_aggregates, Aggregate, AggregateFn, AggregateValue, Aggregates};
pub use compare::{compare_cells, compare_values};
pub use config::{GridConfig, DEFAULT_MAX_PAGE_SIZE, DEFAULT_PAGE_SIZE};
pub use error::{GridError, QueryViolation, Result};
pub use filter::{apply_filters, Filter};
pub use op::Operator;
pub use ordering::{compare_by_criteria, sort_by_column, sort_by_criteria, Dir, SortCriteria};
pub use paginate::{paginate, Page, PageInfo};
pub use processor::{Processor, Response};
pub use query::Query;
pub use search::{apply_search, search_matches, SearchTerm, DEFAULT_MIN_SEARCH_LEN};
pub use traits::{ResponseStore, RowSource};
pub use value::{Number, Row, Value};
