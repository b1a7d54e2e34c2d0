//! Pagination types for list queries.

use std::ops::Index;

use serde::{Deserialize, Serialize};

/// Page size used when the caller asks for every match on one page.
///
/// Kept within `i64` so it can be bound as a SQL `LIMIT`.
pub const UNBOUNDED_PAGE_SIZE: u64 = i64::MAX as u64;

/// Request parameters for paginated queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PageRequest {
    /// Page number (1-based).
    #[serde(default = "default_page")]
    pub page: u64,
    /// Number of items per page.
    #[serde(default = "default_page_size")]
    pub page_size: u64,
}

impl PageRequest {
    /// Create a new page request. Page and page size are clamped to at least 1.
    pub fn new(page: u64, page_size: u64) -> Self {
        Self {
            page: page.max(1),
            page_size: page_size.clamp(1, UNBOUNDED_PAGE_SIZE),
        }
    }

    /// Every match on a single page.
    pub fn all() -> Self {
        Self::default()
    }

    /// Whether this request has no effective page size limit.
    pub fn is_unbounded(&self) -> bool {
        self.page_size >= UNBOUNDED_PAGE_SIZE
    }

    /// Number of matches to skip before this page starts.
    pub fn offset(&self) -> u64 {
        self.page
            .saturating_sub(1)
            .saturating_mul(self.page_size)
            .min(UNBOUNDED_PAGE_SIZE)
    }

    /// Maximum number of items on this page.
    pub fn limit(&self) -> u64 {
        self.page_size
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: default_page(),
            page_size: default_page_size(),
        }
    }
}

/// One materialized page of query results.
///
/// Built once per query and read-only afterwards. A query that matched
/// nothing yields [`PagedList::empty`], whose page number is `0` and whose
/// first/last flags are both `false`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PagedList<T> {
    items: Vec<T>,
    page_number: u64,
    page_size: u64,
    total_count: u64,
    total_pages: u64,
}

impl<T> PagedList<T> {
    /// Create a page from the items of the requested page and the total match count.
    pub fn new(items: Vec<T>, total_count: u64, page_number: u64, page_size: u64) -> Self {
        let total_pages = if page_size == 0 {
            0
        } else {
            total_count.div_ceil(page_size)
        };
        Self {
            items,
            page_number,
            page_size,
            total_count,
            total_pages,
        }
    }

    /// Create a page whose items are the complete match set.
    pub fn from_all(items: Vec<T>, page_number: u64, page_size: u64) -> Self {
        let total = items.len() as u64;
        Self::new(items, total, page_number, page_size)
    }

    /// The sentinel for "nothing matched".
    pub fn empty() -> Self {
        Self::new(Vec::new(), 0, 0, 0)
    }

    /// Build the page for `request` out of a total count, or the empty sentinel.
    pub fn for_request(items: Vec<T>, total_count: u64, request: &PageRequest) -> Self {
        if total_count == 0 {
            return Self::empty();
        }
        Self::new(items, total_count, request.page, request.page_size)
    }

    /// The 1-based number of this page (`0` for the empty sentinel).
    pub fn page_number(&self) -> u64 {
        self.page_number
    }

    /// The page size this page was requested with.
    pub fn page_size(&self) -> u64 {
        self.page_size
    }

    /// Number of items on this page.
    pub fn count(&self) -> usize {
        self.items.len()
    }

    /// Whether this page holds no items.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Number of matches across all pages.
    pub fn total_count(&self) -> u64 {
        self.total_count
    }

    /// Number of pages the matches span.
    pub fn total_pages(&self) -> u64 {
        self.total_pages
    }

    /// Whether this is the first page.
    pub fn is_first_page(&self) -> bool {
        self.page_number == 1
    }

    /// Whether this is the last page.
    pub fn is_last_page(&self) -> bool {
        self.total_pages > 0 && self.page_number == self.total_pages
    }

    /// The items on this page.
    pub fn items(&self) -> &[T] {
        &self.items
    }

    /// Iterate the items on this page.
    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.items.iter()
    }

    /// Consume the page and return its items.
    pub fn into_items(self) -> Vec<T> {
        self.items
    }

    /// Transform every item while keeping the page metadata.
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> PagedList<U> {
        PagedList {
            items: self.items.into_iter().map(f).collect(),
            page_number: self.page_number,
            page_size: self.page_size,
            total_count: self.total_count,
            total_pages: self.total_pages,
        }
    }
}

impl<T> Default for PagedList<T> {
    fn default() -> Self {
        Self::empty()
    }
}

impl<T> Index<usize> for PagedList<T> {
    type Output = T;

    fn index(&self, index: usize) -> &T {
        &self.items[index]
    }
}

impl<T> IntoIterator for PagedList<T> {
    type Item = T;
    type IntoIter = std::vec::IntoIter<T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.into_iter()
    }
}

impl<'a, T> IntoIterator for &'a PagedList<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

fn default_page() -> u64 {
    1
}

fn default_page_size() -> u64 {
    UNBOUNDED_PAGE_SIZE
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page_of(total: u64, page: u64, page_size: u64) -> PagedList<u64> {
        let request = PageRequest::new(page, page_size);
        let items: Vec<u64> = (0..total)
            .skip(request.offset() as usize)
            .take(request.limit() as usize)
            .collect();
        PagedList::for_request(items, total, &request)
    }

    #[test]
    fn test_last_page_of_five_by_two() {
        let page = page_of(5, 3, 2);
        assert_eq!(page.count(), 1);
        assert!(page.is_last_page());
        assert!(!page.is_first_page());
        assert_eq!(page.total_pages(), 3);
    }

    #[test]
    fn test_first_page_of_five_by_two() {
        let page = page_of(5, 1, 2);
        assert_eq!(page.count(), 2);
        assert!(page.is_first_page());
        assert!(!page.is_last_page());
    }

    #[test]
    fn test_single_page_is_first_and_last() {
        let page = page_of(3, 1, 10);
        assert!(page.is_first_page());
        assert!(page.is_last_page());
    }

    #[test]
    fn test_no_matches_yields_empty_sentinel() {
        let page = page_of(0, 1, 10);
        assert_eq!(page.page_number(), 0);
        assert_eq!(page.count(), 0);
        assert!(!page.is_first_page());
        assert!(!page.is_last_page());
    }

    #[test]
    fn test_page_past_the_end_has_no_items() {
        let page = page_of(5, 4, 2);
        assert_eq!(page.count(), 0);
        assert!(!page.is_last_page());
        assert_eq!(page.total_count(), 5);
    }

    #[test]
    fn test_item_count_matches_formula() {
        for total in 0..12u64 {
            for size in 1..5u64 {
                for page in 1..6u64 {
                    let list = page_of(total, page, size);
                    let expected = total.saturating_sub((page - 1) * size).min(size);
                    assert_eq!(list.count() as u64, expected, "total={total} size={size} page={page}");
                    if total > 0 {
                        assert_eq!(list.is_last_page(), page == total.div_ceil(size));
                    }
                }
            }
        }
    }

    #[test]
    fn test_unbounded_request() {
        let request = PageRequest::all();
        assert!(request.is_unbounded());
        assert_eq!(request.offset(), 0);
        let page = page_of(7, 1, UNBOUNDED_PAGE_SIZE);
        assert_eq!(page.count(), 7);
        assert!(page.is_first_page() && page.is_last_page());
    }

    #[test]
    fn test_new_clamps_zero_values() {
        let request = PageRequest::new(0, 0);
        assert_eq!(request.page, 1);
        assert_eq!(request.page_size, 1);
    }

    #[test]
    fn test_map_keeps_metadata() {
        let page = page_of(5, 2, 2).map(|n| n * 10);
        assert_eq!(page.items(), &[20, 30]);
        assert_eq!(page.page_number(), 2);
        assert_eq!(page[1], 30);
    }
}
