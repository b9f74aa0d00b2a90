//! Filter operators.
//!
//! The [`Operator`] enum lists every comparison a filter can apply. Operator
//! names that are not recognized survive deserialization as
//! [`Operator::Unknown`] so that query validation can report them by name.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

/// Comparison operator for a filter.
///
/// Operators are grouped by what they look at:
/// - **Ordering**: `Eq`, `Ne`, `Gt`, `Gte`, `Lt`, `Lte`, `Between`
/// - **Text**: `Contains`, `NotContains`, `StartsWith`, `EndsWith` (case-insensitive)
/// - **Null checks**: `IsNull`, `IsNotNull`
/// - **Membership**: `In`, `NotIn`
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Operator {
    /// Equal under the comparator.
    Eq,
    /// Not equal under the comparator.
    Ne,
    /// Text contains the filter value.
    Contains,
    /// Text does not contain the filter value.
    NotContains,
    /// Text starts with the filter value.
    StartsWith,
    /// Text ends with the filter value.
    EndsWith,
    /// Greater than.
    Gt,
    /// Greater than or equal.
    Gte,
    /// Less than.
    Lt,
    /// Less than or equal.
    Lte,
    /// Inside the inclusive range given by two values.
    Between,
    /// Null or missing.
    IsNull,
    /// Present and not null.
    IsNotNull,
    /// Equal to one of the given values.
    In,
    /// Equal to none of the given values.
    NotIn,
    /// Unrecognized operator name. Never matches.
    Unknown(String),
}

impl Operator {
    /// Every recognized operator.
    pub const ALL: [Operator; 15] = [
        Operator::Eq,
        Operator::Ne,
        Operator::Contains,
        Operator::NotContains,
        Operator::StartsWith,
        Operator::EndsWith,
        Operator::Gt,
        Operator::Gte,
        Operator::Lt,
        Operator::Lte,
        Operator::Between,
        Operator::IsNull,
        Operator::IsNotNull,
        Operator::In,
        Operator::NotIn,
    ];

    /// Returns `true` unless this is [`Operator::Unknown`].
    pub fn is_known(&self) -> bool {
        !matches!(self, Operator::Unknown(_))
    }

    /// Returns `true` for operators decided by a single comparator ordering.
    pub fn is_ordering_op(&self) -> bool {
        matches!(
            self,
            Operator::Eq | Operator::Ne | Operator::Gt | Operator::Gte | Operator::Lt | Operator::Lte
        )
    }

    /// Returns `true` for operators that read `values` instead of `value`.
    pub fn uses_values(&self) -> bool {
        matches!(self, Operator::Between | Operator::In | Operator::NotIn)
    }

    /// Evaluates an ordering-based operator given `cell` compared to the filter value.
    ///
    /// Returns `false` for operators that are not ordering-based.
    pub fn eval_ordering(&self, ordering: Ordering) -> bool {
        match self {
            Operator::Eq => ordering == Ordering::Equal,
            Operator::Ne => ordering != Ordering::Equal,
            Operator::Gt => ordering == Ordering::Greater,
            Operator::Gte => ordering != Ordering::Less,
            Operator::Lt => ordering == Ordering::Less,
            Operator::Lte => ordering != Ordering::Greater,
            _ => false,
        }
    }

    /// Returns the wire name of this operator.
    pub fn as_str(&self) -> &str {
        match self {
            Operator::Eq => "eq",
            Operator::Ne => "ne",
            Operator::Contains => "contains",
            Operator::NotContains => "not_contains",
            Operator::StartsWith => "starts_with",
            Operator::EndsWith => "ends_with",
            Operator::Gt => "gt",
            Operator::Gte => "gte",
            Operator::Lt => "lt",
            Operator::Lte => "lte",
            Operator::Between => "between",
            Operator::IsNull => "is_null",
            Operator::IsNotNull => "is_not_null",
            Operator::In => "in",
            Operator::NotIn => "not_in",
            Operator::Unknown(name) => name,
        }
    }
}

impl From<&str> for Operator {
    fn from(name: &str) -> Self {
        Operator::ALL
            .into_iter()
            .find(|op| op.as_str() == name)
            .unwrap_or_else(|| Operator::Unknown(name.to_string()))
    }
}

impl From<String> for Operator {
    fn from(name: String) -> Self {
        match Operator::from(name.as_str()) {
            Operator::Unknown(_) => Operator::Unknown(name),
            op => op,
        }
    }
}

impl From<Operator> for String {
    fn from(op: Operator) -> Self {
        match op {
            Operator::Unknown(name) => name,
            op => op.as_str().to_string(),
        }
    }
}

impl std::fmt::Display for Operator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
