use std::sync::Arc;

use tracing::{debug, warn};

use super::guard::{RequestGuard, Slot};
use super::NO_DATA_MESSAGE;
use crate::api::ApiClient;
use crate::error::AppResult;
use crate::models::item::{DetailModal, ItemRow};
use crate::pagination::{Page, PageState, Paginator};
use crate::services::aggregation::{category_charts, AggregateOptions, CategoryCharts, CategorySource};
use crate::services::detail::fetch_item_detail;
use crate::services::table::{filter_and_sort, TableFilter, TableOrder};
use crate::years::{in_domain, Year, YearSelection, YearSet, DEFAULT_YEAR, ITEM_CHART_YEARS};

/// Rows of the item table for one year.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ItemTable {
    pub year: Option<Year>,
    pub items: Vec<ItemRow>,
    /// Set when there is nothing to show, including after a failed load.
    pub message: Option<String>,
}

#[derive(Debug, Clone)]
struct Controls {
    chart_years: YearSelection,
    table_year: Year,
    search: String,
    page: PageState,
}

#[derive(Debug)]
struct Inner {
    paginator: Paginator,
    options: AggregateOptions,
    controls: Slot<Controls>,
    charts: Slot<Option<CategoryCharts>>,
    table: Slot<ItemTable>,
    detail: Slot<Option<DetailModal>>,
    chart_requests: RequestGuard,
    table_requests: RequestGuard,
    detail_requests: RequestGuard,
}

/// Headless model of the item analysis page: category charts over a year
/// selection and a searchable, paged item table for a single year.
///
/// Clones share state, so a refresh can run on another task while the user
/// keeps changing the controls. Only the most recent refresh of each kind
/// lands.
#[derive(Debug, Clone)]
pub struct ItemAnalysisView {
    inner: Arc<Inner>,
}

impl Default for ItemAnalysisView {
    fn default() -> Self {
        Self::new(Paginator::default(), AggregateOptions::default())
    }
}

impl ItemAnalysisView {
    pub fn new(paginator: Paginator, options: AggregateOptions) -> Self {
        let controls = Controls {
            chart_years: YearSelection::new(ITEM_CHART_YEARS),
            table_year: DEFAULT_YEAR,
            search: String::new(),
            page: PageState::default(),
        };

        Self {
            inner: Arc::new(Inner {
                paginator,
                options,
                controls: Slot::new(controls),
                charts: Slot::new(None),
                table: Slot::new(ItemTable::default()),
                detail: Slot::new(None),
                chart_requests: RequestGuard::new("item_charts"),
                table_requests: RequestGuard::new("item_table"),
                detail_requests: RequestGuard::new("item_detail"),
            }),
        }
    }

    pub fn chart_years(&self) -> YearSet {
        self.inner.controls.with(|c| c.chart_years.years().clone())
    }

    pub fn toggle_chart_year(&self, year: Year) -> YearSet {
        self.inner.controls.update(|c| {
            c.chart_years.toggle(year);
            c.chart_years.years().clone()
        })
    }

    pub fn toggle_all_chart_years(&self) -> YearSet {
        self.inner.controls.update(|c| {
            c.chart_years.toggle_all();
            c.chart_years.years().clone()
        })
    }

    pub fn table_year(&self) -> Year {
        self.inner.controls.with(|c| c.table_year)
    }

    /// Switch the table to another year and go back to page 1. Years outside
    /// the domain are ignored.
    pub fn set_table_year(&self, year: Year) -> bool {
        if !in_domain(year) {
            return false;
        }
        self.inner.controls.update(|c| {
            c.table_year = year;
            c.page.reset();
        });
        true
    }

    pub fn search(&self) -> String {
        self.inner.controls.with(|c| c.search.clone())
    }

    /// Commit a search term and go back to page 1.
    pub fn set_search(&self, term: &str) {
        self.inner.controls.update(|c| {
            c.search = term.trim().to_string();
            c.page.reset();
        });
    }

    pub fn current_page(&self) -> usize {
        self.inner.controls.with(|c| c.page.current())
    }

    /// Rows matching the current search, category then name.
    pub fn filtered_rows(&self) -> Vec<ItemRow> {
        let filter = TableFilter::new(self.search());
        self.inner
            .table
            .with(|t| filter_and_sort(&t.items, &filter, TableOrder::CategoryThenName))
    }

    pub fn go_to_page(&self, page: usize) -> bool {
        let total_pages = self.inner.paginator.total_pages(self.filtered_rows().len());
        self.inner
            .controls
            .update(|c| c.page.go_to(page, total_pages))
    }

    pub fn visible_page(&self) -> Page<ItemRow> {
        let rows = self.filtered_rows();
        self.inner.paginator.paginate(&rows, self.current_page())
    }

    pub fn charts(&self) -> Option<CategoryCharts> {
        self.inner.charts.get()
    }

    pub fn table(&self) -> ItemTable {
        self.inner.table.get()
    }

    pub fn detail(&self) -> Option<DetailModal> {
        self.inner.detail.get()
    }

    /// Reload both category charts for the current selection. Returns
    /// `Ok(false)` when a newer refresh superseded this one.
    pub async fn refresh_charts<S: CategorySource>(&self, source: &S) -> AppResult<bool> {
        let ticket = self.inner.chart_requests.begin();
        let years = self.chart_years();

        match category_charts(source, &years, &self.inner.options).await {
            Ok(charts) => Ok(self
                .inner
                .chart_requests
                .apply(ticket, &self.inner.charts, Some(charts))),
            Err(e) if self.inner.chart_requests.is_current(ticket) => {
                warn!(years = %years, error = %e, "Failed to load category charts");
                Err(e)
            }
            Err(_) => Ok(false),
        }
    }

    /// Reload the item table for the current table year. A failed load
    /// leaves an empty table with a message.
    pub async fn refresh_table(&self, client: &ApiClient) -> bool {
        let ticket = self.inner.table_requests.begin();
        let year = self.table_year();

        let table = match client.all_items(year).await {
            Ok(items) => ItemTable {
                year: Some(year),
                message: items.is_empty().then(|| NO_DATA_MESSAGE.to_string()),
                items,
            },
            Err(e) => {
                warn!(year, error = %e, "Failed to load item table");
                ItemTable {
                    year: Some(year),
                    items: Vec::new(),
                    message: Some(NO_DATA_MESSAGE.to_string()),
                }
            }
        };

        let applied = self
            .inner
            .table_requests
            .apply(ticket, &self.inner.table, table);
        if applied {
            let total_pages = self.inner.paginator.total_pages(self.filtered_rows().len());
            self.inner.controls.update(|c| c.page.clamp(total_pages));
        }
        applied
    }

    /// Load the drill-down for `item_name` in the table year, pricing it
    /// from the loaded table. A table still holding another year prices
    /// every row at zero.
    pub async fn open_detail(&self, client: &ApiClient, item_name: &str) -> AppResult<bool> {
        let ticket = self.inner.detail_requests.begin();
        let year = self.table_year();
        let summary = self.inner.table.with(|t| {
            if t.year == Some(year) {
                t.items.clone()
            } else {
                debug!(year, loaded = ?t.year, "Item table is for another year, pricing detail at zero");
                Vec::new()
            }
        });

        match fetch_item_detail(client, year, item_name, &summary).await {
            Ok(modal) => Ok(self
                .inner
                .detail_requests
                .apply(ticket, &self.inner.detail, Some(modal))),
            Err(e) if self.inner.detail_requests.is_current(ticket) => {
                warn!(year, item = %item_name, error = %e, "Failed to load item detail");
                Err(e)
            }
            Err(_) => Ok(false),
        }
    }

    /// Close the modal. A detail request still in flight is discarded.
    pub fn close_detail(&self) {
        debug!("Closing item detail");
        let ticket = self.inner.detail_requests.begin();
        self.inner
            .detail_requests
            .apply(ticket, &self.inner.detail, None);
    }
}
