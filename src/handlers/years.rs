use axum::extract::Query;
use axum::response::Json;
use serde::{Deserialize, Serialize};

use super::{apply_toggle, parse_years};
use crate::error::AppResult;
use crate::years::{
    FallbackPolicy, Year, YearSet, DASHBOARD_YEARS, ITEM_CHART_YEARS, UNIT_YEARS, YEAR_DOMAIN,
};

/// Page whose year-selection rules apply.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SelectionView {
    #[default]
    Dashboard,
    Items,
    Units,
}

impl SelectionView {
    pub fn policy(&self) -> FallbackPolicy {
        match self {
            Self::Dashboard => DASHBOARD_YEARS,
            Self::Items => ITEM_CHART_YEARS,
            Self::Units => UNIT_YEARS,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct SelectionParams {
    #[serde(default)]
    pub view: SelectionView,
    pub years: Option<String>,
    pub toggle: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct SelectionResponse {
    pub years: YearSet,
    /// Value to send back as `years=` on the next request.
    pub param: String,
    pub all_selected: bool,
    pub domain: [Year; 3],
}

/// The selection that results from applying `toggle` to `years`.
pub async fn next_selection(
    Query(params): Query<SelectionParams>,
) -> AppResult<Json<SelectionResponse>> {
    let years = parse_years(params.years.as_deref(), YearSet::full())?;
    let years = apply_toggle(years, params.toggle.as_deref(), params.view.policy())?;

    Ok(Json(SelectionResponse {
        param: years.to_param(),
        all_selected: years.is_full(),
        years,
        domain: YEAR_DOMAIN,
    }))
}
