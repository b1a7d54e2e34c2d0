//! The store-independent list query: filter, order, page.

use serde::{Deserialize, Serialize};

use super::filter::FilterField;
use super::pagination::PageRequest;
use super::sorting::{SortDirection, SortField};

/// A list query over one entity collection.
///
/// Filters are applied first, then the single sort key, then paging.
///
/// ```rust,ignore
/// let query = Query::new()
///     .filter(FilterField::eq("is_published", true))
///     .order_by("updated_date")
///     .paged(1, 10);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Query {
    /// Conditions that must all hold.
    #[serde(default)]
    pub filters: Vec<FilterField>,
    /// Optional sort key.
    #[serde(default)]
    pub order_by: Option<SortField>,
    /// Requested page.
    #[serde(default)]
    pub page: PageRequest,
}

impl Query {
    /// An unfiltered, unordered query for every match on one page.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a filter condition.
    pub fn filter(mut self, filter: FilterField) -> Self {
        self.filters.push(filter);
        self
    }

    /// Sort descending by `field`.
    pub fn order_by(self, field: impl Into<String>) -> Self {
        self.order_by_direction(field, SortDirection::Desc)
    }

    /// Sort ascending by `field`.
    pub fn order_by_asc(self, field: impl Into<String>) -> Self {
        self.order_by_direction(field, SortDirection::Asc)
    }

    /// Sort by `field` in the given direction.
    pub fn order_by_direction(mut self, field: impl Into<String>, direction: SortDirection) -> Self {
        self.order_by = Some(SortField::new(field, direction));
        self
    }

    /// Request a page.
    pub fn paged(mut self, page: u64, page_size: u64) -> Self {
        self.page = PageRequest::new(page, page_size);
        self
    }

    /// Whether any filter is set.
    pub fn has_filters(&self) -> bool {
        !self.filters.is_empty()
    }
}
