//! Row ordering.
//!
//! Provides [`Dir`] for sort direction, [`SortCriteria`] for prioritized
//! multi-column sorts, and the stable sort routines the pipeline uses.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::compare::compare_cells;
use crate::value::Row;

/// Sort direction.
///
/// `""` reads as ascending. Any other unrecognized name is kept as
/// [`Dir::Unknown`]: query validation rejects it as a `sortOrder`, while a
/// multi-sort criterion treats it as ascending.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Dir {
    /// Ascending order (smallest first).
    #[default]
    Asc,
    /// Descending order (largest first).
    Desc,
    /// Unrecognized direction name.
    Unknown(String),
}

impl Dir {
    /// Returns `true` if this is ascending order.
    pub fn is_asc(&self) -> bool {
        matches!(self, Dir::Asc)
    }

    /// Returns `true` if this is descending order.
    pub fn is_desc(&self) -> bool {
        matches!(self, Dir::Desc)
    }

    /// Returns `true` unless this is [`Dir::Unknown`].
    pub fn is_known(&self) -> bool {
        !matches!(self, Dir::Unknown(_))
    }

    /// Applies this direction to an ordering.
    ///
    /// Only `Desc` reverses; everything else leaves the ordering unchanged.
    pub fn apply(&self, ordering: Ordering) -> Ordering {
        match self {
            Dir::Desc => ordering.reverse(),
            _ => ordering,
        }
    }

    /// Returns the wire name of this direction.
    pub fn as_str(&self) -> &str {
        match self {
            Dir::Asc => "asc",
            Dir::Desc => "desc",
            Dir::Unknown(name) => name,
        }
    }
}

impl From<&str> for Dir {
    fn from(name: &str) -> Self {
        match name {
            "" | "asc" => Dir::Asc,
            "desc" => Dir::Desc,
            other => Dir::Unknown(other.to_string()),
        }
    }
}

impl From<String> for Dir {
    fn from(name: String) -> Self {
        Dir::from(name.as_str())
    }
}

impl From<Dir> for String {
    fn from(dir: Dir) -> Self {
        match dir {
            Dir::Unknown(name) => name,
            dir => dir.as_str().to_string(),
        }
    }
}

impl std::fmt::Display for Dir {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One column of a multi-column sort.
///
/// Criteria are evaluated by ascending `priority`; the first one that tells two
/// rows apart decides their order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SortCriteria {
    /// Column to sort by.
    pub column: String,
    /// Sort direction.
    #[serde(default)]
    pub direction: Dir,
    /// Evaluation order; lower runs first.
    #[serde(default)]
    pub priority: i64,
}

impl SortCriteria {
    /// Creates a criterion.
    pub fn new(column: impl Into<String>, direction: Dir, priority: i64) -> Self {
        SortCriteria {
            column: column.into(),
            direction,
            priority,
        }
    }

    /// Compares two rows on this criterion's column and direction.
    pub fn compare(&self, a: &Row, b: &Row) -> Ordering {
        self.direction
            .apply(compare_cells(a.get(&self.column), b.get(&self.column)))
    }
}

/// Sorts rows by a single column.
///
/// The sort is stable: rows with equal cells keep their input order in both
/// directions.
///
/// # Example
///
/// ```
/// use standout_grid::{sort_by_column, Dir, Row};
///
/// let rows = vec![
///     Row::new("1").with("age", 30),
///     Row::new("2").with("age", 25),
/// ];
/// let refs: Vec<&Row> = rows.iter().collect();
///
/// let sorted = sort_by_column(&refs, "age", &Dir::Asc);
/// assert_eq!(sorted[0].id, "2");
/// ```
pub fn sort_by_column<'a>(rows: &[&'a Row], column: &str, dir: &Dir) -> Vec<&'a Row> {
    stable_sort(rows, &|a: &&Row, b: &&Row| {
        dir.apply(compare_cells(a.get(column), b.get(column)))
    })
}

/// Sorts rows by several columns.
///
/// Criteria are first ordered by ascending priority (ties keep the given
/// order), then applied in turn. Rows equal on every criterion keep their
/// input order. The caller's criteria are not reordered.
pub fn sort_by_criteria<'a>(rows: &[&'a Row], criteria: &[SortCriteria]) -> Vec<&'a Row> {
    let mut ordered: Vec<&SortCriteria> = criteria.iter().collect();
    ordered.sort_by_key(|c| c.priority);

    stable_sort(rows, &|a: &&Row, b: &&Row| compare_by_criteria(a, b, &ordered))
}

/// Compares two rows using already-prioritized criteria.
///
/// Uses the first criterion as the primary key, the second to break ties, etc.
/// If all criteria compare equal, returns `Equal`.
pub fn compare_by_criteria(a: &Row, b: &Row, criteria: &[&SortCriteria]) -> Ordering {
    for criterion in criteria {
        let ordering = criterion.compare(a, b);
        if ordering != Ordering::Equal {
            return ordering;
        }
    }
    Ordering::Equal
}

// Mixed-type columns can make the comparator intransitive ("2" < "10" < "1a" < "2"),
// and std's sorts may panic on such input. A plain merge sort stays stable and
// always terminates.
fn stable_sort<T, F>(items: &[T], cmp: &F) -> Vec<T>
where
    T: Copy,
    F: Fn(&T, &T) -> Ordering,
{
    if items.len() <= 1 {
        return items.to_vec();
    }

    let (left, right) = items.split_at(items.len() / 2);
    let left = stable_sort(left, cmp);
    let right = stable_sort(right, cmp);

    let mut merged = Vec::with_capacity(items.len());
    let (mut i, mut j) = (0, 0);
    while i < left.len() && j < right.len() {
        // Take from the right only when strictly smaller
        if cmp(&right[j], &left[i]) == Ordering::Less {
            merged.push(right[j]);
            j += 1;
        } else {
            merged.push(left[i]);
            i += 1;
        }
    }
    merged.extend_from_slice(&left[i..]);
    merged.extend_from_slice(&right[j..]);
    merged
}
