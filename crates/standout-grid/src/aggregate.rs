//! Summary statistics over a row set.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::value::{Row, Value};

/// Aggregate function.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum AggregateFn {
    /// Number of rows, whatever the column holds.
    Count,
    /// Sum of the numeric cells.
    Sum,
    /// Mean of the numeric cells; 0 when there are none.
    Avg,
    /// Smallest numeric cell.
    Min,
    /// Largest numeric cell.
    Max,
    /// Unrecognized function name. Contributes no result.
    Unknown(String),
}

impl AggregateFn {
    /// Returns `true` unless this is [`AggregateFn::Unknown`].
    pub fn is_known(&self) -> bool {
        !matches!(self, AggregateFn::Unknown(_))
    }

    /// Returns the wire name of this function.
    pub fn as_str(&self) -> &str {
        match self {
            AggregateFn::Count => "count",
            AggregateFn::Sum => "sum",
            AggregateFn::Avg => "avg",
            AggregateFn::Min => "min",
            AggregateFn::Max => "max",
            AggregateFn::Unknown(name) => name,
        }
    }
}

impl From<&str> for AggregateFn {
    fn from(name: &str) -> Self {
        match name {
            "count" => AggregateFn::Count,
            "sum" => AggregateFn::Sum,
            "avg" => AggregateFn::Avg,
            "min" => AggregateFn::Min,
            "max" => AggregateFn::Max,
            other => AggregateFn::Unknown(other.to_string()),
        }
    }
}

impl From<String> for AggregateFn {
    fn from(name: String) -> Self {
        AggregateFn::from(name.as_str())
    }
}

impl From<AggregateFn> for String {
    fn from(function: AggregateFn) -> Self {
        match function {
            AggregateFn::Unknown(name) => name,
            function => function.as_str().to_string(),
        }
    }
}

impl std::fmt::Display for AggregateFn {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A requested summary statistic.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Aggregate {
    /// Column the function reads.
    pub column: String,
    /// Function to compute.
    pub function: AggregateFn,
    /// Result key override. Empty counts as absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

impl Aggregate {
    /// Creates an unlabeled aggregate.
    pub fn new(column: impl Into<String>, function: AggregateFn) -> Self {
        Aggregate {
            column: column.into(),
            function,
            label: None,
        }
    }

    /// Sets the result key, returning the aggregate for chaining.
    pub fn labeled(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Result key: the label when set, otherwise `{column}_{function}`.
    pub fn key(&self) -> String {
        match self.label.as_deref() {
            Some(label) if !label.is_empty() => label.to_string(),
            _ => format!("{}_{}", self.column, self.function),
        }
    }
}

/// A computed aggregate.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AggregateValue {
    /// Result of `count`.
    Count(usize),
    /// Result of every other function.
    Number(f64),
}

impl AggregateValue {
    /// Returns the value as f64.
    pub fn as_f64(self) -> f64 {
        match self {
            AggregateValue::Count(n) => n as f64,
            AggregateValue::Number(n) => n,
        }
    }
}

/// Aggregate results keyed by [`Aggregate::key`].
pub type Aggregates = BTreeMap<String, AggregateValue>;

/// Computes every aggregate over `rows`.
///
/// Only cells with a numeric reading take part in `sum`, `avg`, `min` and
/// `max`; others are skipped, not counted as zero. `min`/`max` with no numeric
/// cells and unknown functions produce no entry. Aggregates sharing a key
/// overwrite each other in request order.
///
/// # Example
///
/// ```
/// use standout_grid::{compute_aggregates, Aggregate, AggregateFn, AggregateValue, Row};
///
/// let rows = vec![
///     Row::new("1").with("age", 30),
///     Row::new("2").with("age", "unknown"),
///     Row::new("3").with("age", 20),
/// ];
/// let refs: Vec<&Row> = rows.iter().collect();
///
/// let out = compute_aggregates(&refs, &[Aggregate::new("age", AggregateFn::Avg)]);
/// assert_eq!(out["age_avg"], AggregateValue::Number(25.0));
/// ```
pub fn compute_aggregates(rows: &[&Row], aggregates: &[Aggregate]) -> Aggregates {
    let mut results = Aggregates::new();

    for aggregate in aggregates {
        if let Some(value) = compute_one(rows, aggregate) {
            results.insert(aggregate.key(), value);
        }
    }

    results
}

fn compute_one(rows: &[&Row], aggregate: &Aggregate) -> Option<AggregateValue> {
    let column = aggregate.column.as_str();

    match aggregate.function {
        AggregateFn::Count => Some(AggregateValue::Count(rows.len())),
        AggregateFn::Sum => Some(AggregateValue::Number(numeric_cells(rows, column).sum())),
        AggregateFn::Avg => {
            let (sum, count) = numeric_cells(rows, column)
                .fold((0.0, 0usize), |(sum, count), n| (sum + n, count + 1));
            let avg = if count == 0 { 0.0 } else { sum / count as f64 };
            Some(AggregateValue::Number(avg))
        }
        AggregateFn::Min => numeric_cells(rows, column)
            .reduce(f64::min)
            .map(AggregateValue::Number),
        AggregateFn::Max => numeric_cells(rows, column)
            .reduce(f64::max)
            .map(AggregateValue::Number),
        AggregateFn::Unknown(_) => None,
    }
}

fn numeric_cells<'a>(rows: &'a [&'a Row], column: &'a str) -> impl Iterator<Item = f64> + 'a {
    rows.iter()
        .filter_map(move |row| row.get(column).and_then(Value::as_f64))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rows() -> Vec<Row> {
        vec![
            Row::new("1").with("age", 30).with("salary", "1000.5"),
            Row::new("2").with("age", "n/a").with("salary", 2000),
            Row::new("3").with("age", 20),
            Row::new("4").with("age", Value::Null).with("salary", true),
        ]
    }

    fn run(aggregates: &[Aggregate]) -> Aggregates {
        let rows = rows();
        let refs: Vec<&Row> = rows.iter().collect();
        compute_aggregates(&refs, aggregates)
    }

    #[test]
    fn count_ignores_column() {
        let out = run(&[Aggregate::new("missing", AggregateFn::Count)]);
        assert_eq!(out["missing_count"], AggregateValue::Count(4));
    }

    #[test]
    fn sum_and_avg_skip_non_numeric() {
        let out = run(&[
            Aggregate::new("age", AggregateFn::Sum),
            Aggregate::new("age", AggregateFn::Avg),
            Aggregate::new("salary", AggregateFn::Sum),
        ]);
        assert_eq!(out["age_sum"], AggregateValue::Number(50.0));
        assert_eq!(out["age_avg"], AggregateValue::Number(25.0));
        assert_eq!(out["salary_sum"], AggregateValue::Number(3000.5));
    }

    #[test]
    fn empty_inputs() {
        let out = run(&[
            Aggregate::new("nope", AggregateFn::Sum),
            Aggregate::new("nope", AggregateFn::Avg),
            Aggregate::new("nope", AggregateFn::Min),
            Aggregate::new("nope", AggregateFn::Max),
        ]);
        assert_eq!(out["nope_sum"], AggregateValue::Number(0.0));
        assert_eq!(out["nope_avg"], AggregateValue::Number(0.0));
        assert!(!out.contains_key("nope_min"));
        assert!(!out.contains_key("nope_max"));
        assert_eq!(out.len(), 2);
    }

    #[test]
    fn min_and_max() {
        let out = run(&[
            Aggregate::new("age", AggregateFn::Min),
            Aggregate::new("age", AggregateFn::Max),
        ]);
        assert_eq!(out["age_min"], AggregateValue::Number(20.0));
        assert_eq!(out["age_max"], AggregateValue::Number(30.0));
    }

    #[test]
    fn labels_win_and_last_write_wins() {
        let out = run(&[
            Aggregate::new("age", AggregateFn::Min).labeled("stat"),
            Aggregate::new("age", AggregateFn::Max).labeled("stat"),
            Aggregate::new("age", AggregateFn::Sum).labeled(""),
        ]);
        assert_eq!(out["stat"], AggregateValue::Number(30.0));
        assert_eq!(out["age_sum"], AggregateValue::Number(50.0));
        assert_eq!(out.len(), 2);
    }

    #[test]
    fn unknown_function_contributes_nothing() {
        let out = run(&[Aggregate::new("age", AggregateFn::from("median"))]);
        assert!(out.is_empty());
    }

    #[test]
    fn wire_shape() {
        let agg: Aggregate =
            serde_json::from_str(r#"{"column":"age","function":"avg","label":"Mean age"}"#).unwrap();
        assert_eq!(agg.function, AggregateFn::Avg);
        assert_eq!(agg.key(), "Mean age");

        let json = serde_json::to_string(&run(&[Aggregate::new("x", AggregateFn::Count)])).unwrap();
        assert_eq!(json, r#"{"x_count":4}"#);
    }
}
