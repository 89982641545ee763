use axum::extract::{Query, State};
use axum::response::{Json, Response};
use serde::{Deserialize, Serialize};
use tracing::warn;

use super::{apply_toggle, attachment, parse_years};
use crate::error::{AppError, AppResult};
use crate::models::item::{DetailModal, ItemRow, ItemRowView};
use crate::pagination::Page;
use crate::services::aggregation::{category_charts, CategoryCharts};
use crate::services::detail::build_item_detail;
use crate::services::export::items_csv;
use crate::services::table::{compare_text, filter_and_sort, TableFilter, TableOrder};
use crate::state::AppState;
use crate::views::NO_DATA_MESSAGE;
use crate::years::{in_domain, Year, YearSet, DEFAULT_YEAR, ITEM_CHART_YEARS};

#[derive(Debug, Deserialize)]
pub struct ChartParams {
    pub years: Option<String>,
    pub toggle: Option<String>,
}

pub async fn charts(
    State(state): State<AppState>,
    Query(params): Query<ChartParams>,
) -> AppResult<Json<CategoryCharts>> {
    let years = parse_years(params.years.as_deref(), YearSet::full())?;
    let years = apply_toggle(years, params.toggle.as_deref(), ITEM_CHART_YEARS)?;

    let charts = category_charts(&state.api, &years, &state.aggregate_options()).await?;
    Ok(Json(charts))
}

#[derive(Debug, Deserialize)]
pub struct TableParams {
    pub year: Option<Year>,
    pub search: Option<String>,
    pub category: Option<String>,
    pub page: Option<usize>,
}

impl TableParams {
    fn year(&self) -> AppResult<Year> {
        table_year(self.year)
    }

    fn filter(&self) -> TableFilter {
        TableFilter {
            search: self.search.clone(),
            category: self.category.clone(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ItemTableResponse {
    pub year: Year,
    pub page: Page<ItemRowView>,
    /// Every category of the year, for the category filter.
    pub categories: Vec<String>,
    pub message: Option<String>,
}

pub async fn table(
    State(state): State<AppState>,
    Query(params): Query<TableParams>,
) -> AppResult<Json<ItemTableResponse>> {
    let year = params.year()?;

    let items = match state.api.all_items(year).await {
        Ok(items) => items,
        Err(e) => {
            warn!(year, error = %e, "Failed to load item table");
            Vec::new()
        }
    };

    let categories = categories_of(&items);
    let rows = filter_and_sort(&items, &params.filter(), TableOrder::CategoryThenName);
    let message = rows.is_empty().then(|| NO_DATA_MESSAGE.to_string());
    let page = state
        .paginator()
        .paginate(&rows, params.page.unwrap_or(1))
        .map(ItemRowView::from);

    Ok(Json(ItemTableResponse {
        year,
        page,
        categories,
        message,
    }))
}

#[derive(Debug, Deserialize)]
pub struct DetailParams {
    pub year: Option<Year>,
    pub name: String,
}

pub async fn detail(
    State(state): State<AppState>,
    Query(params): Query<DetailParams>,
) -> AppResult<Json<DetailModal>> {
    let year = table_year(params.year)?;
    if params.name.trim().is_empty() {
        return Err(AppError::Validation("Item name is required".into()));
    }

    let (summary, units) = tokio::join!(
        state.api.all_items(year),
        state.api.item_detail(year, &params.name),
    );

    let summary = summary.unwrap_or_else(|e| {
        warn!(year, error = %e, "Item summary unavailable, pricing detail at zero");
        Vec::new()
    });

    Ok(Json(build_item_detail(
        year,
        &params.name,
        &summary,
        units?.units,
    )))
}

pub async fn export_csv(
    State(state): State<AppState>,
    Query(params): Query<TableParams>,
) -> AppResult<Response> {
    let year = params.year()?;
    let items = state.api.all_items(year).await?;
    let rows = filter_and_sort(&items, &params.filter(), TableOrder::CategoryThenName);

    Ok(attachment(
        "text/csv; charset=utf-8",
        &format!("barang_{}.csv", year),
        items_csv(&rows)?,
    ))
}

fn table_year(year: Option<Year>) -> AppResult<Year> {
    let year = year.unwrap_or(DEFAULT_YEAR);
    if in_domain(year) {
        Ok(year)
    } else {
        Err(AppError::Validation(format!(
            "Year {} is outside the available range",
            year
        )))
    }
}

fn categories_of(items: &[ItemRow]) -> Vec<String> {
    let mut categories: Vec<String> = items
        .iter()
        .map(|i| i.category.clone())
        .filter(|c| !c.is_empty())
        .collect();
    categories.sort_by(|a, b| compare_text(a, b));
    categories.dedup();
    categories
}
