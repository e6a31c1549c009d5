//! # Pagination
//!
//! Fixed-size, 1-indexed windows over an in-memory list.
//!
//! ```text
//!   len = 23, page_size = 10
//!
//!   page 1 → [0, 10)     page 2 → [10, 20)     page 3 → [20, 23)
//!   page 4 → []          total_pages = ceil(23 / 10) = 3
//! ```
//!
//! A page past the end yields an empty window rather than being clamped;
//! callers that want to stay in range use [`Pagination::clamped`] after the
//! list shrinks.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::DEFAULT_PAGE_SIZE;

/// Current page plus page size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    current_page: usize,
    page_size: usize,
}

impl Default for Pagination {
    fn default() -> Self {
        Self::new(DEFAULT_PAGE_SIZE)
    }
}

impl Pagination {
    /// Starts on page 1. A zero page size falls back to the default.
    pub fn new(page_size: usize) -> Self {
        let page_size = if page_size == 0 {
            DEFAULT_PAGE_SIZE
        } else {
            page_size
        };

        Self {
            current_page: 1,
            page_size,
        }
    }

    /// Builds a pagination already positioned on `page` (0 is read as 1).
    pub fn at(page: usize, page_size: usize) -> Self {
        let mut pagination = Self::new(page_size);
        pagination.paginate(page);
        pagination
    }

    pub fn current_page(&self) -> usize {
        self.current_page
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    /// Moves to page `n`. Pages are 1-indexed; 0 becomes 1.
    pub fn paginate(&mut self, n: usize) {
        self.current_page = n.max(1);
    }

    /// `ceil(len / page_size)`; 0 for an empty list.
    pub fn total_pages(&self, len: usize) -> usize {
        len.div_ceil(self.page_size)
    }

    /// Index range of the current page within a list of `len` elements.
    pub fn bounds(&self, len: usize) -> std::ops::Range<usize> {
        let start = (self.current_page - 1)
            .saturating_mul(self.page_size)
            .min(len);
        let end = start.saturating_add(self.page_size).min(len);
        start..end
    }

    /// Elements on the current page.
    pub fn window<'a, T>(&self, items: &'a [T]) -> &'a [T] {
        &items[self.bounds(items.len())]
    }

    /// Same size, page pulled back to the last page of a `len`-long list.
    pub fn clamped(&self, len: usize) -> Self {
        let last = self.total_pages(len).max(1);
        Self {
            current_page: self.current_page.min(last),
            page_size: self.page_size,
        }
    }

    /// Packages the current window with the counts a UI needs.
    pub fn page_of<T: Clone>(&self, items: &[T]) -> Page<T> {
        Page {
            items: self.window(items).to_vec(),
            current_page: self.current_page,
            page_size: self.page_size,
            total_pages: self.total_pages(items.len()),
            total_items: items.len(),
        }
    }
}

/// One page of results plus navigation counts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    pub items: Vec<T>,
    pub current_page: usize,
    pub page_size: usize,
    pub total_pages: usize,
    pub total_items: usize,
}
