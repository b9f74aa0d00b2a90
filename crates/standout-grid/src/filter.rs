//! Column filters.
//!
//! A [`Filter`] is a column, an [`Operator`] and the value(s) to compare
//! against. A query's filters are AND-combined: a row must satisfy every one.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::compare::compare_values;
use crate::op::Operator;
use crate::value::{Row, Value};

/// A single column predicate.
///
/// `value` is read by the single-value operators, `values` by `between`,
/// `in` and `not_in`.
///
/// # Example
///
/// ```
/// use standout_grid::{Filter, Operator, Row};
///
/// let row = Row::new("1").with("age", 30);
/// assert!(Filter::new("age", Operator::Gte, 28).matches(&row));
/// assert!(!Filter::range("age", 40, 20).matches(&row)); // inverted range
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Filter {
    /// Column to test.
    pub column: String,
    /// How to test it.
    pub operator: Operator,
    /// Comparison value for single-value operators.
    #[serde(default)]
    pub value: Value,
    /// Comparison values for `between`, `in` and `not_in`.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub values: Vec<Value>,
}

impl Filter {
    /// Creates a single-value filter.
    pub fn new(column: impl Into<String>, operator: Operator, value: impl Into<Value>) -> Self {
        Filter {
            column: column.into(),
            operator,
            value: value.into(),
            values: Vec::new(),
        }
    }

    /// Creates a filter that reads a list of values (`in`, `not_in`, `between`).
    pub fn with_values<I, V>(column: impl Into<String>, operator: Operator, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        Filter {
            column: column.into(),
            operator,
            value: Value::Null,
            values: values.into_iter().map(Into::into).collect(),
        }
    }

    /// Creates a `between` filter. The bounds are used as given, never swapped.
    pub fn range(column: impl Into<String>, low: impl Into<Value>, high: impl Into<Value>) -> Self {
        Filter::with_values(column, Operator::Between, [low.into(), high.into()])
    }

    /// Creates a filter that needs no comparison value (`is_null`, `is_not_null`).
    pub fn check(column: impl Into<String>, operator: Operator) -> Self {
        Filter::new(column, operator, Value::Null)
    }

    /// Evaluates this filter against a row.
    ///
    /// A missing column satisfies only `is_null`.
    pub fn matches(&self, row: &Row) -> bool {
        let Some(cell) = row.get(&self.column) else {
            return self.operator == Operator::IsNull;
        };

        match &self.operator {
            op if op.is_ordering_op() => op.eval_ordering(compare_values(cell, &self.value)),
            Operator::Contains => text_match(cell, &self.value, |s, p| s.contains(p)),
            Operator::NotContains => !text_match(cell, &self.value, |s, p| s.contains(p)),
            Operator::StartsWith => text_match(cell, &self.value, |s, p| s.starts_with(p)),
            Operator::EndsWith => text_match(cell, &self.value, |s, p| s.ends_with(p)),
            Operator::Between => match self.values.as_slice() {
                [low, high] => {
                    compare_values(cell, low) != Ordering::Less
                        && compare_values(cell, high) != Ordering::Greater
                }
                _ => false,
            },
            Operator::IsNull => cell.is_null(),
            Operator::IsNotNull => !cell.is_null(),
            Operator::In => self.contains_value(cell),
            Operator::NotIn => !self.contains_value(cell),
            _ => false,
        }
    }

    fn contains_value(&self, cell: &Value) -> bool {
        self.values
            .iter()
            .any(|v| compare_values(cell, v) == Ordering::Equal)
    }
}

// A null cell or a missing pattern never matches
fn text_match(cell: &Value, pattern: &Value, test: fn(&str, &str) -> bool) -> bool {
    if cell.is_null() || pattern.is_null() {
        return false;
    }
    test(
        &cell.to_text().to_lowercase(),
        &pattern.to_text().to_lowercase(),
    )
}

/// Keeps the rows that satisfy every filter, preserving their order.
pub fn apply_filters<'a>(rows: &[&'a Row], filters: &[Filter]) -> Vec<&'a Row> {
    rows.iter()
        .copied()
        .filter(|row| filters.iter().all(|f| f.matches(row)))
        .collect()
}
