//! Page envelope returned by list endpoints.

use serde::{Deserialize, Serialize};

use crate::PageRequest;

/// One page of rows plus the totals needed for page navigation.
///
/// ## Invariants
/// - `total_pages == ceil(total / limit)`, so an empty collection has zero
///   pages.
/// - `data.len() <= limit`. A page past the end is valid and empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    data: Vec<T>,
    total: u64,
    page: u32,
    total_pages: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    search: Option<String>,
}

impl<T> Page<T> {
    /// Wrap rows fetched for `request` out of a collection of `total` rows.
    #[must_use]
    pub fn new(data: Vec<T>, total: u64, request: PageRequest) -> Self {
        Self {
            data,
            total,
            page: request.page(),
            total_pages: total.div_ceil(u64::from(request.limit())),
            search: None,
        }
    }

    /// Echo the search term that filtered this page.
    #[must_use]
    pub fn with_search(mut self, search: Option<String>) -> Self {
        self.search = search;
        self
    }

    /// Rows on this page.
    #[must_use]
    pub fn data(&self) -> &[T] {
        &self.data
    }

    /// Total number of rows across all pages.
    #[must_use]
    pub const fn total(&self) -> u64 {
        self.total
    }

    /// 1-indexed page number.
    #[must_use]
    pub const fn page(&self) -> u32 {
        self.page
    }

    /// Number of pages for the requested page size.
    #[must_use]
    pub const fn total_pages(&self) -> u64 {
        self.total_pages
    }

    /// Search term echoed back to the caller, if any.
    #[must_use]
    pub fn search(&self) -> Option<&str> {
        self.search.as_deref()
    }

    /// Consume the page and return its rows.
    #[must_use]
    pub fn into_data(self) -> Vec<T> {
        self.data
    }

    /// Transform every row while keeping the page metadata.
    #[must_use]
    pub fn map<U, F>(self, f: F) -> Page<U>
    where
        F: FnMut(T) -> U,
    {
        Page {
            data: self.data.into_iter().map(f).collect(),
            total: self.total,
            page: self.page,
            total_pages: self.total_pages,
            search: self.search,
        }
    }
}
