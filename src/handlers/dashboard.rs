use axum::extract::{Query, State};
use axum::response::Json;
use serde::Deserialize;

use super::parse_years;
use crate::error::AppResult;
use crate::services::dashboard::{dashboard_overview, DashboardOverview};
use crate::state::AppState;
use crate::years::YearSet;

#[derive(Debug, Deserialize)]
pub struct DashboardParams {
    pub years: Option<String>,
}

pub async fn overview(
    State(state): State<AppState>,
    Query(params): Query<DashboardParams>,
) -> AppResult<Json<DashboardOverview>> {
    let years = parse_years(params.years.as_deref(), YearSet::full())?;
    Ok(Json(dashboard_overview(&state.api, &years).await?))
}
