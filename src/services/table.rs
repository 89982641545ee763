//! Search, category filter and ordering for the item and unit tables.

use std::cmp::Ordering;

use serde::Deserialize;

/// Category value that disables the category restriction.
pub const ALL_CATEGORIES: &str = "all";

/// A table row that can be searched by name and, optionally, category.
pub trait Searchable {
    fn name(&self) -> &str;

    fn category(&self) -> Option<&str>;

    /// Columns the free-text search looks at.
    fn search_fields(&self) -> impl Iterator<Item = &str> {
        std::iter::once(self.name()).chain(self.category())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct TableFilter {
    #[serde(default)]
    pub search: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
}

impl TableFilter {
    pub fn new(search: impl Into<String>) -> Self {
        Self {
            search: Some(search.into()),
            category: None,
        }
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    /// The committed search term: trimmed and lowercased, `None` when blank.
    pub fn term(&self) -> Option<String> {
        self.search
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_lowercase)
    }

    /// The category restriction, `None` when empty or `all`.
    pub fn category_restriction(&self) -> Option<&str> {
        self.category
            .as_deref()
            .map(str::trim)
            .filter(|c| !c.is_empty() && !c.eq_ignore_ascii_case(ALL_CATEGORIES))
    }

    pub fn matches<R: Searchable>(&self, row: &R) -> bool {
        if let Some(category) = self.category_restriction() {
            if row.category() != Some(category) {
                return false;
            }
        }

        match self.term() {
            Some(term) => row
                .search_fields()
                .any(|field| field.to_lowercase().contains(&term)),
            None => true,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TableOrder {
    /// Category ascending, then name ascending.
    #[default]
    CategoryThenName,
    /// Keep the order the rows arrived in.
    Preserve,
}

pub fn filter_and_sort<R>(rows: &[R], filter: &TableFilter, order: TableOrder) -> Vec<R>
where
    R: Searchable + Clone,
{
    let mut filtered: Vec<R> = rows.iter().filter(|r| filter.matches(*r)).cloned().collect();

    if order == TableOrder::CategoryThenName {
        filtered.sort_by(|a, b| {
            compare_text(a.category().unwrap_or(""), b.category().unwrap_or(""))
                .then_with(|| compare_text(a.name(), b.name()))
        });
    }

    filtered
}

/// Case-insensitive comparison with a case-sensitive tie break, so the
/// ordering is total.
pub fn compare_text(a: &str, b: &str) -> Ordering {
    a.to_lowercase()
        .cmp(&b.to_lowercase())
        .then_with(|| a.cmp(b))
}
