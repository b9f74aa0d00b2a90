//! Query description and validation.
//!
//! A [`Query`] is a plain value built per request: set the fields you need and
//! leave the rest at their defaults. It is checked against a [`GridConfig`]
//! before any row is touched.

use serde::{Deserialize, Serialize};

use crate::aggregate::Aggregate;
use crate::config::GridConfig;
use crate::error::{QueryViolation, Result};
use crate::filter::Filter;
use crate::ordering::{Dir, SortCriteria};

/// A request to search, filter, sort, aggregate and paginate a table.
///
/// `sort_by` and `multi_sort` are alternatives; when both are set `sort_by`
/// wins and the response carries a warning.
///
/// # Example
///
/// ```
/// use standout_grid::{Dir, Filter, Operator, Query};
///
/// let query = Query {
///     sort_by: Some("age".to_string()),
///     sort_order: Some(Dir::Desc),
///     filters: vec![Filter::new("age", Operator::Gte, 18)],
///     ..Query::default()
/// };
/// assert_eq!(query.page, 1);
/// assert_eq!(query.page_size, None);
///
/// let parsed = Query::from_json(
///     r#"{"sortBy":"age","sortOrder":"desc","filters":[{"column":"age","operator":"gte","value":18}]}"#,
/// ).unwrap();
/// assert_eq!(parsed, query);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Query {
    /// 1-indexed page to return.
    pub page: usize,
    /// Rows per page; unset falls back to the config's default page size.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page_size: Option<usize>,
    /// Single sort column.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort_by: Option<String>,
    /// Direction for `sort_by`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort_order: Option<Dir>,
    /// Prioritized multi-column sort.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub multi_sort: Vec<SortCriteria>,
    /// Free-text search term.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub search: String,
    /// Columns the search is restricted to; empty searches all columns.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub search_fields: Vec<String>,
    /// Column filters, AND-combined.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub filters: Vec<Filter>,
    /// Summary statistics over the filtered rows.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub aggregates: Vec<Aggregate>,
    /// Caller's request identifier, echoed in the response.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub request_id: String,
}

impl Default for Query {
    fn default() -> Self {
        Query {
            page: 1,
            page_size: None,
            sort_by: None,
            sort_order: None,
            multi_sort: Vec::new(),
            search: String::new(),
            search_fields: Vec::new(),
            filters: Vec::new(),
            aggregates: Vec::new(),
            request_id: String::new(),
        }
    }
}

impl Query {
    /// Creates a query for the first page at the config's default page size.
    pub fn from_config(config: &GridConfig) -> Self {
        Query {
            page_size: Some(config.default_page_size),
            ..Query::default()
        }
    }

    /// Decodes a query from JSON. Decoding does not validate.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Returns the page size to use, resolving an unset size from `config`.
    pub fn effective_page_size(&self, config: &GridConfig) -> usize {
        self.page_size.unwrap_or(config.default_page_size)
    }

    /// Returns the single sort column, treating an empty name as unset.
    pub fn sort_column(&self) -> Option<&str> {
        self.sort_by.as_deref().filter(|column| !column.is_empty())
    }

    /// Checks the query against `config`, reporting the first violation.
    ///
    /// Checks run in order: page, page size, sort order, then each filter's
    /// operator.
    pub fn validate(&self, config: &GridConfig) -> std::result::Result<(), QueryViolation> {
        if self.page < 1 {
            return Err(QueryViolation::PageTooSmall);
        }
        let page_size = self.effective_page_size(config);
        if page_size < 1 {
            return Err(QueryViolation::PageSizeTooSmall);
        }
        if page_size > config.max_page_size {
            return Err(QueryViolation::PageSizeTooLarge {
                size: page_size,
                max: config.max_page_size,
            });
        }
        if let Some(order) = &self.sort_order {
            if !order.is_known() {
                return Err(QueryViolation::InvalidSortOrder(order.to_string()));
            }
        }
        if let Some((index, filter)) = self
            .filters
            .iter()
            .enumerate()
            .find(|(_, filter)| !filter.operator.is_known())
        {
            return Err(QueryViolation::InvalidFilterOperator {
                index,
                operator: filter.operator.to_string(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::op::Operator;

    #[test]
    fn default_query_is_valid() {
        assert_eq!(Query::default().validate(&GridConfig::default()), Ok(()));
    }

    #[test]
    fn from_config_uses_default_page_size() {
        let config = GridConfig {
            default_page_size: 10,
            ..GridConfig::default()
        };
        let query = Query::from_config(&config);
        assert_eq!(query.page, 1);
        assert_eq!(query.page_size, Some(10));
    }

    #[test]
    fn page_bounds() {
        let config = GridConfig::default();

        let query = Query {
            page: 0,
            ..Query::default()
        };
        assert_eq!(query.validate(&config), Err(QueryViolation::PageTooSmall));

        let query = Query {
            page_size: Some(0),
            ..Query::default()
        };
        assert_eq!(
            query.validate(&config),
            Err(QueryViolation::PageSizeTooSmall)
        );

        let query = Query {
            page_size: Some(1001),
            ..Query::default()
        };
        assert_eq!(
            query.validate(&config),
            Err(QueryViolation::PageSizeTooLarge {
                size: 1001,
                max: 1000
            })
        );

        let query = Query {
            page_size: Some(1000),
            ..Query::default()
        };
        assert_eq!(query.validate(&config), Ok(()));
    }

    #[test]
    fn sort_order_must_be_known() {
        let config = GridConfig::default();

        let query = Query {
            sort_order: Some(Dir::from("sideways")),
            ..Query::default()
        };
        assert_eq!(
            query.validate(&config),
            Err(QueryViolation::InvalidSortOrder("sideways".to_string()))
        );

        let query = Query {
            sort_order: Some(Dir::Desc),
            ..Query::default()
        };
        assert_eq!(query.validate(&config), Ok(()));
    }

    #[test]
    fn filter_operators_must_be_known() {
        let query = Query {
            filters: vec![
                Filter::new("a", Operator::Eq, 1),
                Filter::new("b", Operator::from("regex"), "x"),
                Filter::new("c", Operator::from("like"), "y"),
            ],
            ..Query::default()
        };

        let err = query.validate(&GridConfig::default()).unwrap_err();
        assert_eq!(
            err,
            QueryViolation::InvalidFilterOperator {
                index: 1,
                operator: "regex".to_string()
            }
        );
        assert!(err.to_string().contains("regex"));
    }

    #[test]
    fn first_violation_wins() {
        let query = Query {
            page: 0,
            page_size: Some(0),
            sort_order: Some(Dir::from("x")),
            ..Query::default()
        };
        assert_eq!(
            query.validate(&GridConfig::default()),
            Err(QueryViolation::PageTooSmall)
        );
    }

    #[test]
    fn json_defaults_and_empty_strings() {
        let query = Query::from_json(r#"{"sortBy":"","sortOrder":""}"#).unwrap();
        assert_eq!(query.page, 1);
        assert_eq!(query.page_size, None);
        assert_eq!(query.effective_page_size(&GridConfig::default()), 25);
        assert_eq!(query.sort_column(), None);
        assert_eq!(query.sort_order, Some(Dir::Asc));
        assert!(query.filters.is_empty());
    }

    #[test]
    fn json_keeps_unknown_names_for_validation() {
        let query = Query::from_json(
            r#"{"page":2,"pageSize":5,"sortOrder":"up","filters":[{"column":"a","operator":"approx","value":1}]}"#,
        )
        .unwrap();
        assert_eq!(query.page, 2);
        assert_eq!(query.sort_order, Some(Dir::Unknown("up".to_string())));
        assert_eq!(query.filters[0].operator, Operator::Unknown("approx".to_string()));
    }

    #[test]
    fn unset_page_size_follows_config() {
        let config = GridConfig {
            default_page_size: 10,
            max_page_size: 10,
            ..GridConfig::default()
        };

        let query = Query::from_json(r#"{"search":"ab"}"#).unwrap();
        assert_eq!(query.effective_page_size(&config), 10);
        assert_eq!(query.validate(&config), Ok(()));

        let query = Query::from_json(r#"{"pageSize":11}"#).unwrap();
        assert_eq!(
            query.validate(&config),
            Err(QueryViolation::PageSizeTooLarge { size: 11, max: 10 })
        );
    }

    #[test]
    fn json_rejects_negative_page() {
        assert!(Query::from_json(r#"{"page":-1}"#).is_err());
    }
}
