//! Collaborator seams.
//!
//! The pipeline itself only sees a slice of rows. These traits describe the
//! collaborators around it: where the rows come from, and where finished
//! responses may be kept.

use crate::error::Result;
use crate::processor::Response;
use crate::value::Row;

/// Supplies a frozen snapshot of the table.
///
/// Implementations backed by data that changes concurrently must return a
/// consistent copy; the pipeline does no locking of its own.
///
/// # Example
///
/// ```
/// use standout_grid::{Row, RowSource};
///
/// let rows = vec![Row::new("1"), Row::new("2")];
/// assert_eq!(rows.snapshot().unwrap().len(), 2);
/// ```
pub trait RowSource {
    /// Returns the rows to query.
    fn snapshot(&self) -> Result<Vec<Row>>;
}

impl RowSource for [Row] {
    fn snapshot(&self) -> Result<Vec<Row>> {
        Ok(self.to_vec())
    }
}

impl RowSource for Vec<Row> {
    fn snapshot(&self) -> Result<Vec<Row>> {
        self.as_slice().snapshot()
    }
}

/// Keeps finished responses keyed by request id.
///
/// Methods take `&self` so one store can serve concurrent requests; use
/// interior mutability in implementations.
pub trait ResponseStore {
    /// Returns the stored response for `request_id`, if any.
    fn load(&self, request_id: &str) -> Result<Option<Response>>;

    /// Stores `response` under its request id.
    fn save(&self, response: &Response) -> Result<()>;
}
