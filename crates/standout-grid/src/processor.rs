//! Query processor and response envelope.
//!
//! [`Processor::process`] runs one query against one row snapshot as a fixed
//! pipeline:
//!
//! ```text
//! validate -> search -> filter -> sort -> aggregate -> paginate
//! ```
//!
//! Validation failures stop the pipeline before any row is read. Every later
//! stage tolerates odd data (missing columns, unparseable numbers) instead of
//! failing, so a valid query always yields a complete [`Response`].

use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};
use tracing::{debug, debug_span, trace, warn};

use crate::aggregate::{compute_aggregates, Aggregates};
use crate::config::GridConfig;
use crate::error::{GridError, Result};
use crate::filter::apply_filters;
use crate::ordering::{sort_by_column, sort_by_criteria};
use crate::paginate::paginate;
use crate::query::Query;
use crate::search::{apply_search, SearchTerm};
use crate::traits::{ResponseStore, RowSource};
use crate::value::Row;

/// The result of one query.
///
/// Apart from `query_time`, a response is a pure function of the rows and the
/// query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Response {
    /// Rows on the returned page.
    pub rows: Vec<Row>,
    /// Rows in the input, before search and filters.
    pub total_rows: usize,
    /// Rows left after search and filters, before pagination.
    pub filtered_rows: usize,
    /// Effective page after clamping.
    pub page: usize,
    /// Rows per page.
    pub page_size: usize,
    /// Number of pages; 0 when nothing matched.
    pub total_pages: usize,
    /// Whether a later page exists.
    pub has_next: bool,
    /// Whether an earlier page exists.
    pub has_prev: bool,
    /// Aggregate results over the filtered rows.
    #[serde(default, skip_serializing_if = "Aggregates::is_empty")]
    pub aggregates: Aggregates,
    /// End-to-end processing time.
    #[serde(with = "micros")]
    pub query_time: Duration,
    /// Whether this response came from a [`ResponseStore`].
    #[serde(default)]
    pub cache_hit: bool,
    /// The query's request id.
    pub request_id: String,
    /// Non-fatal notes about how the query was interpreted.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<String>,
}

/// Runs queries against row snapshots.
///
/// A processor holds only its configuration, so one instance can be shared by
/// any number of threads.
///
/// # Example
///
/// ```
/// use standout_grid::{Dir, Processor, Query, Row};
///
/// let rows = vec![
///     Row::new("1").with("name", "Bob").with("age", 30),
///     Row::new("2").with("name", "Ann").with("age", 25),
/// ];
/// let query = Query {
///     sort_by: Some("age".to_string()),
///     sort_order: Some(Dir::Asc),
///     ..Query::default()
/// };
///
/// let response = Processor::default().process(&rows, &query).unwrap();
/// assert_eq!(response.rows[0].id, "2");
/// assert_eq!(response.total_pages, 1);
/// ```
#[derive(Debug, Clone, Default)]
pub struct Processor {
    config: GridConfig,
}

impl Processor {
    /// Creates a processor after validating `config`.
    pub fn new(config: GridConfig) -> Result<Self> {
        config.validate()?;
        Ok(Processor { config })
    }

    /// Returns the configuration.
    pub fn config(&self) -> &GridConfig {
        &self.config
    }

    /// Runs `query` against `rows`.
    ///
    /// The only error is [`GridError::InvalidQuery`], returned before any
    /// stage runs.
    pub fn process(&self, rows: &[Row], query: &Query) -> Result<Response> {
        let span = debug_span!("grid.process", request_id = %query.request_id);
        let _enter = span.enter();
        let started = Instant::now();

        if let Err(violation) = query.validate(&self.config) {
            warn!(%violation, "rejected query");
            return Err(GridError::InvalidQuery(violation));
        }

        let mut warnings = Vec::new();
        let mut current: Vec<&Row> = rows.iter().collect();

        if !query.search.trim().is_empty() {
            match SearchTerm::new(&query.search, self.config.min_search_length) {
                Some(term) => {
                    let before = current.len();
                    current = apply_search(&current, &term, &query.search_fields);
                    trace!(term = term.as_str(), before, after = current.len(), "search");
                }
                None => warnings.push(format!(
                    "search term shorter than {} characters ignored",
                    self.config.min_search_length
                )),
            }
        }

        if !query.filters.is_empty() {
            let before = current.len();
            current = apply_filters(&current, &query.filters);
            trace!(filters = query.filters.len(), before, after = current.len(), "filter");
        }

        match query.sort_column() {
            Some(column) => {
                if !query.multi_sort.is_empty() {
                    warnings.push("multiSort ignored because sortBy is set".to_string());
                }
                let dir = query
                    .sort_order
                    .as_ref()
                    .unwrap_or(&self.config.default_sort_order);
                current = sort_by_column(&current, column, dir);
                trace!(column, %dir, "sort");
            }
            None if !query.multi_sort.is_empty() => {
                current = sort_by_criteria(&current, &query.multi_sort);
                trace!(criteria = query.multi_sort.len(), "multi-sort");
            }
            None => {}
        }

        for aggregate in &query.aggregates {
            if !aggregate.function.is_known() {
                warnings.push(format!(
                    "unknown aggregate function '{}' on column '{}' ignored",
                    aggregate.function, aggregate.column
                ));
            }
        }
        let aggregates = compute_aggregates(&current, &query.aggregates);

        let page = paginate(
            &current,
            query.page,
            query.effective_page_size(&self.config),
        );
        let query_time = started.elapsed();

        debug!(
            total = rows.len(),
            filtered = current.len(),
            page = page.info.page,
            returned = page.items.len(),
            micros = micros::saturating(query_time),
            "processed query"
        );

        Ok(Response {
            rows: page.items.iter().map(|row| (*row).clone()).collect(),
            total_rows: rows.len(),
            filtered_rows: current.len(),
            page: page.info.page,
            page_size: page.info.page_size,
            total_pages: page.info.total_pages,
            has_next: page.info.has_next,
            has_prev: page.info.has_prev,
            aggregates,
            query_time,
            cache_hit: false,
            request_id: query.request_id.clone(),
            warnings,
        })
    }

    /// Takes a snapshot from `source` and runs `query` against it.
    ///
    /// The query is validated before the source is asked for rows.
    pub fn process_source<S>(&self, source: &S, query: &Query) -> Result<Response>
    where
        S: RowSource + ?Sized,
    {
        query.validate(&self.config)?;
        let rows = source.snapshot()?;
        self.process(&rows, query)
    }

    /// Serves `query` from `store` when a response with its request id exists,
    /// otherwise processes it and saves the result.
    ///
    /// The query is validated before the store is consulted, so an invalid
    /// query fails even when its request id is stored. Queries without a
    /// request id bypass the store.
    pub fn process_cached<S, C>(&self, source: &S, store: &C, query: &Query) -> Result<Response>
    where
        S: RowSource + ?Sized,
        C: ResponseStore + ?Sized,
    {
        query.validate(&self.config)?;
        if query.request_id.is_empty() {
            return self.process_source(source, query);
        }

        if let Some(mut cached) = store.load(&query.request_id)? {
            debug!(request_id = %query.request_id, "served from store");
            cached.cache_hit = true;
            return Ok(cached);
        }

        let response = self.process_source(source, query)?;
        store.save(&response)?;
        Ok(response)
    }
}

mod micros {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serializer};

    /// Whole microseconds, saturating at `u64::MAX`.
    pub fn saturating(duration: Duration) -> u64 {
        u64::try_from(duration.as_micros()).unwrap_or(u64::MAX)
    }

    pub fn serialize<S: Serializer>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u64(saturating(*duration))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        u64::deserialize(deserializer).map(Duration::from_micros)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregate::{Aggregate, AggregateFn, AggregateValue};
    use crate::error::QueryViolation;
    use crate::filter::Filter;
    use crate::op::Operator;
    use crate::ordering::{Dir, SortCriteria};

    fn people() -> Vec<Row> {
        vec![
            Row::new("1").with("name", "Bob").with("dept", "eng").with("age", 30),
            Row::new("2").with("name", "Ann").with("dept", "ops").with("age", 25),
            Row::new("3").with("name", "Cid").with("dept", "eng").with("age", 41),
            Row::new("4").with("name", "Dee").with("dept", "ops").with("age", "n/a"),
            Row::new("5").with("name", "Eve").with("dept", "eng"),
        ]
    }

    fn ids(response: &Response) -> Vec<&str> {
        response.rows.iter().map(|r| r.id.as_str()).collect()
    }

    #[test]
    fn empty_query_returns_first_page_in_input_order() {
        let rows = people();
        let response = Processor::default().process(&rows, &Query::default()).unwrap();

        assert_eq!(ids(&response), vec!["1", "2", "3", "4", "5"]);
        assert_eq!(response.total_rows, 5);
        assert_eq!(response.filtered_rows, 5);
        assert_eq!(response.total_pages, 1);
        assert!(!response.cache_hit);
        assert!(response.warnings.is_empty());
        assert!(response.aggregates.is_empty());
    }

    #[test]
    fn validation_failure_stops_pipeline() {
        let rows = people();
        let query = Query {
            filters: vec![Filter::new("age", Operator::from("approx"), 30)],
            ..Query::default()
        };

        let err = Processor::default().process(&rows, &query).unwrap_err();
        match err {
            GridError::InvalidQuery(QueryViolation::InvalidFilterOperator { operator, .. }) => {
                assert_eq!(operator, "approx")
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn totals_count_before_and_after_filtering() {
        let rows = people();
        let query = Query {
            search: "eng".to_string(),
            filters: vec![Filter::new("age", Operator::Gt, 35)],
            page_size: Some(1),
            ..Query::default()
        };

        let response = Processor::default().process(&rows, &query).unwrap();
        assert_eq!(response.total_rows, 5);
        assert_eq!(response.filtered_rows, 1);
        assert_eq!(ids(&response), vec!["3"]);
    }

    #[test]
    fn aggregates_cover_filtered_rows_not_page() {
        let rows = people();
        let query = Query {
            filters: vec![Filter::new("dept", Operator::Eq, "eng")],
            aggregates: vec![
                Aggregate::new("age", AggregateFn::Count),
                Aggregate::new("age", AggregateFn::Sum),
            ],
            page_size: Some(1),
            ..Query::default()
        };

        let response = Processor::default().process(&rows, &query).unwrap();
        assert_eq!(response.rows.len(), 1);
        assert_eq!(response.aggregates["age_count"], AggregateValue::Count(3));
        assert_eq!(response.aggregates["age_sum"], AggregateValue::Number(71.0));
    }

    #[test]
    fn sort_order_defaults_from_config() {
        let rows = people();
        let processor = Processor::new(GridConfig {
            default_sort_order: Dir::Desc,
            ..GridConfig::default()
        })
        .unwrap();
        let query = Query {
            sort_by: Some("name".to_string()),
            ..Query::default()
        };

        let response = processor.process(&rows, &query).unwrap();
        assert_eq!(ids(&response), vec!["5", "4", "3", "1", "2"]);
    }

    #[test]
    fn sort_by_wins_over_multi_sort() {
        let rows = people();
        let query = Query {
            sort_by: Some("name".to_string()),
            multi_sort: vec![SortCriteria::new("age", Dir::Desc, 0)],
            ..Query::default()
        };

        let response = Processor::default().process(&rows, &query).unwrap();
        assert_eq!(ids(&response), vec!["2", "1", "3", "4", "5"]);
        assert_eq!(response.warnings.len(), 1);
        assert!(response.warnings[0].contains("multiSort"));
    }

    #[test]
    fn short_search_is_ignored_with_warning() {
        let rows = people();
        let query = Query {
            search: " b ".to_string(),
            ..Query::default()
        };

        let response = Processor::default().process(&rows, &query).unwrap();
        assert_eq!(response.filtered_rows, 5);
        assert_eq!(response.warnings.len(), 1);
    }

    #[test]
    fn blank_search_is_silent() {
        let rows = people();
        let query = Query {
            search: "   ".to_string(),
            ..Query::default()
        };

        let response = Processor::default().process(&rows, &query).unwrap();
        assert!(response.warnings.is_empty());
    }

    #[test]
    fn unknown_aggregate_is_warned_and_skipped() {
        let rows = people();
        let query = Query {
            aggregates: vec![Aggregate::new("age", AggregateFn::from("median"))],
            ..Query::default()
        };

        let response = Processor::default().process(&rows, &query).unwrap();
        assert!(response.aggregates.is_empty());
        assert!(response.warnings[0].contains("median"));
    }

    #[test]
    fn no_matches_gives_zero_pages() {
        let rows = people();
        let query = Query {
            page: 3,
            filters: vec![Filter::new("dept", Operator::Eq, "legal")],
            ..Query::default()
        };

        let response = Processor::default().process(&rows, &query).unwrap();
        assert!(response.rows.is_empty());
        assert_eq!(response.total_pages, 0);
        assert_eq!(response.page, 1);
        assert!(!response.has_next);
        assert!(!response.has_prev);
    }

    #[test]
    fn request_id_is_echoed() {
        let rows = people();
        let query = Query {
            request_id: "req-42".to_string(),
            ..Query::default()
        };

        let response = Processor::default().process(&rows, &query).unwrap();
        assert_eq!(response.request_id, "req-42");
    }

    #[test]
    fn rejects_invalid_config() {
        let err = Processor::new(GridConfig {
            max_page_size: 0,
            ..GridConfig::default()
        })
        .unwrap_err();
        assert!(matches!(err, GridError::InvalidConfig(_)));
    }

    #[test]
    fn query_time_serializes_as_micros() {
        let rows = people();
        let mut response = Processor::default().process(&rows, &Query::default()).unwrap();
        response.query_time = Duration::from_micros(1500);

        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["queryTime"], 1500);
        assert_eq!(json["totalRows"], 5);

        let back: Response = serde_json::from_value(json).unwrap();
        assert_eq!(back, response);
    }

    #[test]
    fn oversized_query_time_saturates() {
        assert_eq!(micros::saturating(Duration::MAX), u64::MAX);
        assert_eq!(micros::saturating(Duration::from_millis(2)), 2000);

        let rows = people();
        let mut response = Processor::default().process(&rows, &Query::default()).unwrap();
        response.query_time = Duration::MAX;
        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["queryTime"], u64::MAX);
    }

    #[test]
    fn unset_page_size_uses_config_default() {
        let rows = people();
        let processor = Processor::new(GridConfig {
            default_page_size: 2,
            max_page_size: 2,
            ..GridConfig::default()
        })
        .unwrap();

        let query = Query::from_json(r#"{"page":2}"#).unwrap();
        let response = processor.process(&rows, &query).unwrap();
        assert_eq!(response.page_size, 2);
        assert_eq!(response.total_pages, 3);
        assert_eq!(ids(&response), vec!["3", "4"]);
    }
}
