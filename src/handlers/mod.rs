pub mod chat;
pub mod dashboard;
pub mod data;
pub mod items;
pub mod units;
pub mod years;

use axum::http::header;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::Router;

use crate::error::{AppError, AppResult};
use crate::state::AppState;
use crate::years::{FallbackPolicy, Toggle, YearSelection, YearSet};

pub fn routes() -> Router<AppState> {
    Router::new()
        // Year selection
        .route("/api/years", get(years::next_selection))
        // Item analysis
        .route("/api/items", get(items::table))
        .route("/api/items/charts", get(items::charts))
        .route("/api/items/detail", get(items::detail))
        .route("/api/items/export.csv", get(items::export_csv))
        // Unit analysis
        .route("/api/units", get(units::table))
        .route("/api/units/overview", get(units::overview))
        .route("/api/units/detail", get(units::detail))
        .route("/api/units/radar", get(units::radar))
        .route("/api/units/export.csv", get(units::export_csv))
        // Dashboard
        .route("/api/dashboard", get(dashboard::overview))
        // Chat
        .route("/api/chat", post(chat::send))
        .route("/api/chat/suggestions", get(chat::suggestions))
        // Data management
        .route("/api/data/template", get(data::template))
        .route("/api/data/export", get(data::export_data))
        .route("/api/data/import", post(data::import))
        // Health check
        .route("/health", get(health))
}

async fn health() -> &'static str {
    "OK"
}

pub async fn not_found() -> AppError {
    AppError::NotFound("Route not found".into())
}

/// Parse an optional `years` query value, falling back to `default` when it
/// is absent or blank.
pub(crate) fn parse_years(param: Option<&str>, default: YearSet) -> AppResult<YearSet> {
    match param.map(str::trim).filter(|p| !p.is_empty()) {
        Some(param) => param.parse(),
        None => Ok(default),
    }
}

/// Apply an optional `toggle` query value to `years` under `policy`.
pub(crate) fn apply_toggle(
    years: YearSet,
    toggle: Option<&str>,
    policy: FallbackPolicy,
) -> AppResult<YearSet> {
    let Some(toggle) = toggle.map(str::trim).filter(|t| !t.is_empty()) else {
        return Ok(years);
    };
    let toggle: Toggle = toggle.parse()?;
    let mut selection = YearSelection::with_years(years, policy);
    selection.apply(toggle);
    Ok(selection.years().clone())
}

pub(crate) fn attachment(content_type: &str, file_name: &str, bytes: Vec<u8>) -> Response {
    (
        [
            (header::CONTENT_TYPE, content_type.to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", file_name),
            ),
        ],
        bytes,
    )
        .into_response()
}
