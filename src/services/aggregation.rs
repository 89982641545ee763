//! Category totals across a selection of years.
//!
//! The backend answers per-year and combined (`years=all`) queries. Selecting
//! every year or a single year maps onto one backend call whose result is
//! passed through unchanged. Any other subset fans out one request per year,
//! then merges the answers by label, sorts by value and keeps the top N.

use std::collections::HashMap;
use std::future::Future;

use serde::Serialize;
use tracing::{debug, warn};

use crate::api::ApiClient;
use crate::config::DEFAULT_TOP_N;
use crate::error::AppResult;
use crate::models::category::{CategoryAggregate, CategoryBreakdown, CategoryMetric};
use crate::years::{Year, YearSet};

/// Source of per-category totals.
pub trait CategorySource: Clone + Send + Sync + 'static {
    fn fetch_year(
        &self,
        metric: CategoryMetric,
        year: Year,
    ) -> impl Future<Output = AppResult<CategoryBreakdown>> + Send;

    fn fetch_combined(
        &self,
        metric: CategoryMetric,
        years: &YearSet,
    ) -> impl Future<Output = AppResult<CategoryBreakdown>> + Send;
}

impl CategorySource for ApiClient {
    async fn fetch_year(&self, metric: CategoryMetric, year: Year) -> AppResult<CategoryBreakdown> {
        self.category_breakdown(metric, year).await
    }

    async fn fetch_combined(
        &self,
        metric: CategoryMetric,
        years: &YearSet,
    ) -> AppResult<CategoryBreakdown> {
        self.category_breakdown_combined(metric, years).await
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AggregateOptions {
    /// Entries kept after merging several years.
    pub top_n: usize,
    /// Merge labels that differ only in case or surrounding whitespace.
    pub normalize_labels: bool,
}

impl Default for AggregateOptions {
    fn default() -> Self {
        Self {
            top_n: DEFAULT_TOP_N,
            normalize_labels: false,
        }
    }
}

impl AggregateOptions {
    pub fn with_top_n(top_n: usize) -> Self {
        Self {
            top_n,
            ..Self::default()
        }
    }

    fn merge_key(&self, label: &str) -> String {
        if self.normalize_labels {
            collapse_whitespace(label).to_lowercase()
        } else {
            label.to_string()
        }
    }

    fn display_label(&self, label: &str) -> String {
        if self.normalize_labels {
            collapse_whitespace(label)
        } else {
            label.to_string()
        }
    }
}

fn collapse_whitespace(label: &str) -> String {
    label.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Category totals for `years`.
///
/// Failures of the combined or single-year call are returned to the caller.
/// In the fan-out case a failing year contributes nothing and the rest of the
/// selection is still merged.
pub async fn aggregate<S: CategorySource>(
    source: &S,
    years: &YearSet,
    metric: CategoryMetric,
    options: &AggregateOptions,
) -> AppResult<CategoryBreakdown> {
    if years.is_full() {
        debug!(metric = metric.as_str(), "Fetching combined category totals");
        return source.fetch_combined(metric, years).await;
    }

    if let Some(year) = years.as_single() {
        debug!(metric = metric.as_str(), year, "Fetching single-year category totals");
        return source.fetch_year(metric, year).await;
    }

    let parts = fetch_per_year(source, years, metric).await;
    Ok(merge_breakdowns(
        parts.into_iter().map(|(_, breakdown)| breakdown),
        options,
    ))
}

/// Fetch every selected year concurrently and wait for all of them.
///
/// Results come back in selection order. A year whose request fails (or
/// whose task dies) yields an empty breakdown.
pub async fn fetch_per_year<S: CategorySource>(
    source: &S,
    years: &YearSet,
    metric: CategoryMetric,
) -> Vec<(Year, CategoryBreakdown)> {
    let handles: Vec<_> = years
        .iter()
        .map(|year| {
            let source = source.clone();
            let handle = tokio::spawn(async move { source.fetch_year(metric, year).await });
            (year, handle)
        })
        .collect();

    let mut parts = Vec::with_capacity(handles.len());
    for (year, handle) in handles {
        let breakdown = match handle.await {
            Ok(Ok(breakdown)) => breakdown,
            Ok(Err(e)) => {
                warn!(year, metric = metric.as_str(), error = %e, "Category fetch failed, treating year as empty");
                CategoryBreakdown::empty()
            }
            Err(e) => {
                warn!(year, metric = metric.as_str(), error = %e, "Category fetch task aborted, treating year as empty");
                CategoryBreakdown::empty()
            }
        };
        parts.push((year, breakdown));
    }

    parts
}

/// Sum values per label across `parts`, then sort descending and keep the
/// top `options.top_n`. Equal values keep the order in which their labels
/// first appeared.
pub fn merge_breakdowns<I>(parts: I, options: &AggregateOptions) -> CategoryBreakdown
where
    I: IntoIterator<Item = CategoryBreakdown>,
{
    let mut merged: Vec<CategoryAggregate> = Vec::new();
    let mut positions: HashMap<String, usize> = HashMap::new();

    for part in parts {
        for (label, value) in part.pairs() {
            let key = options.merge_key(label);
            match positions.get(&key) {
                Some(&i) => merged[i].value += value,
                None => {
                    positions.insert(key, merged.len());
                    merged.push(CategoryAggregate {
                        label: options.display_label(label),
                        value,
                    });
                }
            }
        }
    }

    merged.sort_by(|a, b| b.value.total_cmp(&a.value));
    merged.truncate(options.top_n);

    CategoryBreakdown::from_aggregates(merged)
}

/// Both category charts of the item analysis page.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryCharts {
    pub years: YearSet,
    pub value: CategoryBreakdown,
    pub unit: CategoryBreakdown,
}

pub async fn category_charts<S: CategorySource>(
    source: &S,
    years: &YearSet,
    options: &AggregateOptions,
) -> AppResult<CategoryCharts> {
    let (value, unit) = tokio::join!(
        aggregate(source, years, CategoryMetric::Value, options),
        aggregate(source, years, CategoryMetric::Unit, options),
    );

    Ok(CategoryCharts {
        years: years.clone(),
        value: value?,
        unit: unit?,
    })
}
