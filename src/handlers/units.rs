use axum::extract::{Query, State};
use axum::response::{Json, Response};
use serde::{Deserialize, Serialize};
use tracing::warn;

use super::{attachment, parse_years};
use crate::error::{AppError, AppResult};
use crate::models::unit::{UnitDetail, UnitRow};
use crate::pagination::Page;
use crate::services::dashboard::{
    radar_comparison, unit_overview, RadarComparison, RadarUnits, UnitOverview,
};
use crate::services::detail::fetch_unit_detail;
use crate::services::export::units_csv;
use crate::services::table::{compare_text, filter_and_sort, TableFilter, TableOrder};
use crate::state::AppState;
use crate::views::NO_DATA_MESSAGE;
use crate::years::{in_domain, Year, YearSet};

#[derive(Debug, Deserialize)]
pub struct TableParams {
    /// Omitted: totals over every year.
    pub year: Option<Year>,
    pub search: Option<String>,
    pub page: Option<usize>,
}

#[derive(Debug, Serialize)]
pub struct UnitTableResponse {
    pub year: Option<Year>,
    pub page: Page<UnitRow>,
    pub message: Option<String>,
}

pub async fn table(
    State(state): State<AppState>,
    Query(params): Query<TableParams>,
) -> AppResult<Json<UnitTableResponse>> {
    if let Some(year) = params.year.filter(|y| !in_domain(*y)) {
        return Err(AppError::Validation(format!(
            "Year {} is outside the available range",
            year
        )));
    }

    let units = match load_sorted_units(&state, params.year).await {
        Ok(units) => units,
        Err(e) => {
            warn!(error = %e, "Failed to load unit list");
            Vec::new()
        }
    };

    let filter = TableFilter {
        search: params.search.clone(),
        category: None,
    };
    let rows = filter_and_sort(&units, &filter, TableOrder::Preserve);
    let message = rows.is_empty().then(|| NO_DATA_MESSAGE.to_string());

    Ok(Json(UnitTableResponse {
        year: params.year,
        page: state.paginator().paginate(&rows, params.page.unwrap_or(1)),
        message,
    }))
}

#[derive(Debug, Deserialize)]
pub struct OverviewParams {
    pub years: Option<String>,
}

pub async fn overview(
    State(state): State<AppState>,
    Query(params): Query<OverviewParams>,
) -> AppResult<Json<UnitOverview>> {
    let years = parse_years(params.years.as_deref(), YearSet::full())?;
    Ok(Json(unit_overview(&state.api, &years).await))
}

#[derive(Debug, Deserialize)]
pub struct DetailParams {
    pub unit: String,
    pub years: Option<String>,
}

/// Monthly item breakdown of one unit for the latest selected year.
pub async fn detail(
    State(state): State<AppState>,
    Query(params): Query<DetailParams>,
) -> AppResult<Json<UnitDetail>> {
    if params.unit.trim().is_empty() {
        return Err(AppError::Validation("Unit name is required".into()));
    }
    let years = parse_years(params.years.as_deref(), YearSet::full())?;

    Ok(Json(
        fetch_unit_detail(&state.api, &params.unit, years.latest()).await,
    ))
}

/// Radar comparison of up to two units, each given as `unit=`. Without any,
/// the first two units by name are compared.
pub async fn radar(
    State(state): State<AppState>,
    Query(params): Query<Vec<(String, String)>>,
) -> AppResult<Json<RadarComparison>> {
    let picked: Vec<&str> = params
        .iter()
        .filter(|(key, _)| key == "unit")
        .map(|(_, value)| value.as_str())
        .collect();
    if picked.len() > 2 {
        return Err(AppError::Validation(
            "At most two units can be compared".into(),
        ));
    }

    let units = if picked.is_empty() {
        match load_sorted_units(&state, None).await {
            Ok(units) => RadarUnits::from_units(&units),
            Err(e) => {
                warn!(error = %e, "Failed to load units for the radar");
                RadarUnits::default()
            }
        }
    } else {
        RadarUnits::new(picked.first().copied(), picked.get(1).copied())
    };

    Ok(Json(radar_comparison(&state.api, &units).await))
}

#[derive(Debug, Deserialize)]
pub struct ExportParams {
    pub search: Option<String>,
}

pub async fn export_csv(
    State(state): State<AppState>,
    Query(params): Query<ExportParams>,
) -> AppResult<Response> {
    let units = load_sorted_units(&state, None).await?;
    let filter = TableFilter {
        search: params.search,
        category: None,
    };
    let rows = filter_and_sort(&units, &filter, TableOrder::Preserve);

    Ok(attachment(
        "text/csv; charset=utf-8",
        "unit_pemohon.csv",
        units_csv(&rows)?,
    ))
}

async fn load_sorted_units(state: &AppState, year: Option<Year>) -> AppResult<Vec<UnitRow>> {
    let mut units = state.api.unit_list(year).await?;
    units.sort_by(|a, b| compare_text(&a.unit_name, &b.unit_name));
    Ok(units)
}
