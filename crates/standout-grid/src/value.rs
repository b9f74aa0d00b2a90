//! Cell values and rows.
//!
//! A [`Row`] maps column keys to [`Value`]s. Values are loosely typed: the same
//! column may hold a number in one row and a string in the next, and every stage
//! of the pipeline tolerates that instead of failing.

use std::borrow::Cow;
use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

/// A single cell value.
///
/// On the wire values are untagged JSON scalars. Timestamps serialize as RFC 3339
/// strings and deserialize back as [`Value::String`]; the comparator still orders
/// such strings chronologically.
///
/// # Example
///
/// ```
/// use standout_grid::{Number, Value};
///
/// let v: Value = serde_json::from_str("30").unwrap();
/// assert_eq!(v, Value::Number(Number::I64(30)));
/// assert_eq!(v.as_f64(), Some(30.0));
/// assert_eq!(Value::from("2.5").as_f64(), Some(2.5));
/// ```
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    /// Explicit null.
    #[default]
    Null,
    /// Boolean value.
    Bool(bool),
    /// Numeric value.
    Number(Number),
    /// String value.
    String(String),
    /// Point in time.
    Timestamp(DateTime<Utc>),
}

impl Value {
    /// Returns `true` if this is [`Value::Null`].
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Returns the numeric reading of this value.
    ///
    /// Numbers convert directly and strings are parsed as floats. Booleans,
    /// timestamps and null have no numeric reading.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(n.to_f64()),
            Value::String(s) => s.parse::<f64>().ok(),
            _ => None,
        }
    }

    /// Returns the temporal reading of this value.
    ///
    /// Timestamps convert directly and strings are parsed as RFC 3339.
    pub fn as_datetime(&self) -> Option<DateTime<Utc>> {
        match self {
            Value::Timestamp(t) => Some(*t),
            Value::String(s) => DateTime::parse_from_rfc3339(s)
                .ok()
                .map(|t| t.with_timezone(&Utc)),
            _ => None,
        }
    }

    /// Extracts the string value, if present.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    /// Returns the string representation used by text matching and the
    /// comparator's fallback. Null renders as the empty string.
    pub fn to_text(&self) -> Cow<'_, str> {
        match self {
            Value::String(s) => Cow::Borrowed(s),
            Value::Null => Cow::Borrowed(""),
            other => Cow::Owned(other.to_string()),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => Ok(()),
            Value::Bool(b) => write!(f, "{b}"),
            Value::Number(n) => write!(f, "{n}"),
            Value::String(s) => f.write_str(s),
            Value::Timestamp(t) => f.write_str(&t.to_rfc3339_opts(SecondsFormat::AutoSi, true)),
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<Number> for Value {
    fn from(n: Number) -> Self {
        Value::Number(n)
    }
}

impl From<DateTime<Utc>> for Value {
    fn from(t: DateTime<Utc>) -> Self {
        Value::Timestamp(t)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map_or(Value::Null, Into::into)
    }
}

macro_rules! value_from_number {
    ($($t:ty),*) => {
        $(
            impl From<$t> for Value {
                fn from(n: $t) -> Self {
                    Value::Number(Number::from(n))
                }
            }
        )*
    };
}

value_from_number!(i32, i64, u32, u64, usize, f32, f64);

/// Numeric value.
///
/// Integers keep their own variants so they round-trip through JSON unchanged;
/// all comparisons and arithmetic happen on the `f64` reading.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Number {
    /// Signed 64-bit integer.
    I64(i64),
    /// Unsigned 64-bit integer.
    U64(u64),
    /// 64-bit floating point.
    F64(f64),
}

impl Number {
    /// Converts the number to f64.
    pub fn to_f64(self) -> f64 {
        match self {
            Number::I64(n) => n as f64,
            Number::U64(n) => n as f64,
            Number::F64(n) => n,
        }
    }
}

impl fmt::Display for Number {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Number::I64(n) => write!(f, "{n}"),
            Number::U64(n) => write!(f, "{n}"),
            Number::F64(n) => write!(f, "{n}"),
        }
    }
}

impl From<i32> for Number {
    fn from(n: i32) -> Self {
        Number::I64(n as i64)
    }
}

impl From<i64> for Number {
    fn from(n: i64) -> Self {
        Number::I64(n)
    }
}

impl From<u32> for Number {
    fn from(n: u32) -> Self {
        Number::U64(n as u64)
    }
}

impl From<u64> for Number {
    fn from(n: u64) -> Self {
        Number::U64(n)
    }
}

impl From<usize> for Number {
    fn from(n: usize) -> Self {
        Number::U64(n as u64)
    }
}

impl From<f32> for Number {
    fn from(n: f32) -> Self {
        Number::F64(n as f64)
    }
}

impl From<f64> for Number {
    fn from(n: f64) -> Self {
        Number::F64(n)
    }
}

/// One record of a table.
///
/// A key mapped to [`Value::Null`] is present but null; an absent key is
/// missing. The pipeline never mutates rows, it only reorders references to them
/// and clones the rows of the returned page.
///
/// # Example
///
/// ```
/// use standout_grid::{Row, Value};
///
/// let row = Row::new("1").with("name", "Bob").with("age", 30);
/// assert_eq!(row.get("name"), Some(&Value::from("Bob")));
/// assert!(row.get("email").is_none());
/// ```
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Row {
    /// Row identifier.
    pub id: String,
    /// Column key to cell value.
    #[serde(default)]
    pub data: BTreeMap<String, Value>,
}

impl Row {
    /// Creates an empty row with the given identifier.
    pub fn new(id: impl Into<String>) -> Self {
        Row {
            id: id.into(),
            data: BTreeMap::new(),
        }
    }

    /// Sets a cell, returning the row for chaining.
    pub fn with(mut self, column: impl Into<String>, value: impl Into<Value>) -> Self {
        self.data.insert(column.into(), value.into());
        self
    }

    /// Returns the cell for `column`, or `None` when the column is missing.
    pub fn get(&self, column: &str) -> Option<&Value> {
        self.data.get(column)
    }

    /// Iterates over every cell value of the row.
    pub fn values(&self) -> impl Iterator<Item = &Value> {
        self.data.values()
    }
}
