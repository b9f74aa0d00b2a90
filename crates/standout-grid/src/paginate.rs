//! Page slicing.

use serde::{Deserialize, Serialize};

/// Page metadata.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageInfo {
    /// Effective page number (1-indexed), after clamping.
    pub page: usize,
    /// Items per page.
    pub page_size: usize,
    /// Number of pages; 0 when there are no items.
    pub total_pages: usize,
    /// Whether a later page exists.
    pub has_next: bool,
    /// Whether an earlier page exists.
    pub has_prev: bool,
}

/// One page of items borrowed from the full sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page<'a, T> {
    /// The items on this page.
    pub items: &'a [T],
    /// Page metadata.
    pub info: PageInfo,
}

/// Slices `items` into the requested page.
///
/// Pages past the end clamp to the last page, and page 0 reads as page 1. With
/// no items there are zero pages and the effective page is 1 with an empty
/// slice. A `page_size` of 0 is treated as 1.
///
/// # Example
///
/// ```
/// use standout_grid::paginate;
///
/// let items = [1, 2, 3, 4, 5];
/// let page = paginate(&items, 9, 2);
/// assert_eq!(page.items, &[5]);
/// assert_eq!(page.info.page, 3);
/// assert_eq!(page.info.total_pages, 3);
/// assert!(!page.info.has_next);
/// ```
pub fn paginate<T>(items: &[T], page: usize, page_size: usize) -> Page<'_, T> {
    let page_size = page_size.max(1);
    let total = items.len();
    let total_pages = total.div_ceil(page_size);

    let page = page.clamp(1, total_pages.max(1));
    let start = ((page - 1) * page_size).min(total);
    let end = (start + page_size).min(total);

    Page {
        items: &items[start..end],
        info: PageInfo {
            page,
            page_size,
            total_pages,
            has_next: page < total_pages,
            has_prev: page > 1,
        },
    }
}
