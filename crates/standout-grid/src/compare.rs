//! Type-aware comparison of cell values.
//!
//! Filtering and sorting share one comparator so that `lt`, `between` and an
//! ascending sort agree on what "smaller" means. The cascade is:
//!
//! 1. null sorts before everything, two nulls are equal
//! 2. if both values have a numeric reading, compare as `f64`
//! 3. if both values have a temporal reading, compare chronologically
//! 4. otherwise compare the text representations byte-wise

use std::cmp::Ordering;

use crate::value::Value;

/// Compares two cell values.
///
/// # Example
///
/// ```
/// use std::cmp::Ordering;
/// use standout_grid::{compare_values, Value};
///
/// // "10" and 9 both read as numbers
/// assert_eq!(compare_values(&Value::from("10"), &Value::from(9)), Ordering::Greater);
/// // no common reading: byte-wise text comparison
/// assert_eq!(compare_values(&Value::from("10"), &Value::from("9a")), Ordering::Less);
/// assert_eq!(compare_values(&Value::Null, &Value::from("")), Ordering::Less);
/// ```
pub fn compare_values(a: &Value, b: &Value) -> Ordering {
    match (a.is_null(), b.is_null()) {
        (true, true) => return Ordering::Equal,
        (true, false) => return Ordering::Less,
        (false, true) => return Ordering::Greater,
        (false, false) => {}
    }

    if let (Some(x), Some(y)) = (a.as_f64(), b.as_f64()) {
        // NaN is neither smaller nor larger than anything
        return x.partial_cmp(&y).unwrap_or(Ordering::Equal);
    }

    if let (Some(x), Some(y)) = (a.as_datetime(), b.as_datetime()) {
        return x.cmp(&y);
    }

    a.to_text().as_bytes().cmp(b.to_text().as_bytes())
}

/// Compares two optional cells, where `None` is a missing column.
///
/// Missing cells take part in ordering exactly like [`Value::Null`].
pub fn compare_cells(a: Option<&Value>, b: Option<&Value>) -> Ordering {
    compare_values(a.unwrap_or(&Value::Null), b.unwrap_or(&Value::Null))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    #[test]
    fn nulls_sort_first() {
        assert_eq!(compare_values(&Value::Null, &Value::Null), Ordering::Equal);
        assert_eq!(compare_values(&Value::Null, &Value::from(0)), Ordering::Less);
        assert_eq!(
            compare_values(&Value::from("a"), &Value::Null),
            Ordering::Greater
        );
    }

    #[test]
    fn numbers_compare_numerically() {
        assert_eq!(compare_values(&Value::from(9), &Value::from(10)), Ordering::Less);
        assert_eq!(
            compare_values(&Value::from(10), &Value::from(10.0)),
            Ordering::Equal
        );
        assert_eq!(
            compare_values(&Value::from("9"), &Value::from("10")),
            Ordering::Less
        );
        assert_eq!(
            compare_values(&Value::from(-1), &Value::from(2u64)),
            Ordering::Less
        );
    }

    #[test]
    fn nan_is_equal_to_numbers() {
        assert_eq!(
            compare_values(&Value::from(f64::NAN), &Value::from(1)),
            Ordering::Equal
        );
        assert_eq!(
            compare_values(&Value::from("NaN"), &Value::from(1)),
            Ordering::Equal
        );
    }

    #[test]
    fn timestamps_compare_chronologically() {
        let early = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let late = Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap();

        assert_eq!(
            compare_values(&Value::from(early), &Value::from(late)),
            Ordering::Less
        );
        // Offsets are honored: 03:00+05:00 is 22:00 the previous day in UTC
        assert_eq!(
            compare_values(
                &Value::from("2024-01-02T03:00:00+05:00"),
                &Value::from("2024-01-01T23:00:00Z")
            ),
            Ordering::Less
        );
        assert_eq!(
            compare_values(&Value::from(late), &Value::from("2024-01-01T00:00:00Z")),
            Ordering::Greater
        );
    }

    #[test]
    fn text_fallback_is_bytewise() {
        assert_eq!(
            compare_values(&Value::from("Ann"), &Value::from("Bob")),
            Ordering::Less
        );
        // Uppercase letters sort before lowercase ones
        assert_eq!(
            compare_values(&Value::from("b"), &Value::from("B")),
            Ordering::Greater
        );
        assert_eq!(
            compare_values(&Value::from(true), &Value::from(false)),
            Ordering::Greater
        );
        // Number vs non-numeric string falls back to text
        assert_eq!(
            compare_values(&Value::from(30), &Value::from("abc")),
            Ordering::Less
        );
    }

    #[test]
    fn missing_cells_behave_like_null() {
        let v = Value::from(1);
        assert_eq!(compare_cells(None, None), Ordering::Equal);
        assert_eq!(compare_cells(None, Some(&v)), Ordering::Less);
        assert_eq!(compare_cells(Some(&Value::Null), None), Ordering::Equal);
    }
}
