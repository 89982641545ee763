//! Client-side paging of already filtered rows.

use serde::Serialize;

use crate::config::DEFAULT_PAGE_SIZE;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Paginator {
    page_size: usize,
}

impl Default for Paginator {
    fn default() -> Self {
        Self::new(DEFAULT_PAGE_SIZE)
    }
}

impl Paginator {
    /// A zero page size is treated as one row per page.
    pub fn new(page_size: usize) -> Self {
        Self {
            page_size: page_size.max(1),
        }
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    /// Number of pages for `len` rows; an empty table still has one page.
    pub fn total_pages(&self, len: usize) -> usize {
        len.div_ceil(self.page_size).max(1)
    }

    pub fn paginate<T: Clone>(&self, rows: &[T], page: usize) -> Page<T> {
        let total_pages = self.total_pages(rows.len());
        let page = page.clamp(1, total_pages);
        let start = ((page - 1) * self.page_size).min(rows.len());
        let end = (start + self.page_size).min(rows.len());

        Page {
            rows: rows[start..end].to_vec(),
            page,
            page_size: self.page_size,
            total_pages,
            total_rows: rows.len(),
        }
    }
}

pub fn paginate<T: Clone>(rows: &[T], page_size: usize, page: usize) -> Page<T> {
    Paginator::new(page_size).paginate(rows, page)
}

/// One page of rows plus what the pager needs to render itself.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Page<T> {
    pub rows: Vec<T>,
    pub page: usize,
    pub page_size: usize,
    pub total_pages: usize,
    pub total_rows: usize,
}

impl<T> Page<T> {
    pub fn has_previous(&self) -> bool {
        self.page > 1
    }

    pub fn has_next(&self) -> bool {
        self.page < self.total_pages
    }

    pub fn map<U, F: FnMut(T) -> U>(self, f: F) -> Page<U> {
        Page {
            rows: self.rows.into_iter().map(f).collect(),
            page: self.page,
            page_size: self.page_size,
            total_pages: self.total_pages,
            total_rows: self.total_rows,
        }
    }
}

/// Current page of a table view, 1-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageState {
    current: usize,
}

impl Default for PageState {
    fn default() -> Self {
        Self { current: 1 }
    }
}

impl PageState {
    pub fn current(&self) -> usize {
        self.current
    }

    /// Move to `page` if it exists; out-of-range requests leave the state
    /// unchanged.
    pub fn go_to(&mut self, page: usize, total_pages: usize) -> bool {
        if page >= 1 && page <= total_pages {
            self.current = page;
            true
        } else {
            false
        }
    }

    pub fn reset(&mut self) {
        self.current = 1;
    }

    /// Pull the current page back in range after the row count shrank.
    pub fn clamp(&mut self, total_pages: usize) {
        self.current = self.current.clamp(1, total_pages.max(1));
    }
}
