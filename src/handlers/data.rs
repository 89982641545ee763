use axum::extract::{Multipart, Query, State};
use axum::response::{Json, Response};
use serde::Deserialize;
use tracing::debug;

use super::{attachment, parse_years};
use crate::error::{AppError, AppResult};
use crate::services::export::{self, ImportSummary, TEMPLATE_FILE_NAME, XLSX_CONTENT_TYPE};
use crate::state::AppState;
use crate::years::YearSet;

pub async fn template(State(state): State<AppState>) -> AppResult<Response> {
    let download = export::download_template(&state.api).await?;
    Ok(attachment(XLSX_CONTENT_TYPE, TEMPLATE_FILE_NAME, download.bytes))
}

#[derive(Debug, Deserialize)]
pub struct ExportParams {
    pub years: Option<String>,
}

pub async fn export_data(
    State(state): State<AppState>,
    Query(params): Query<ExportParams>,
) -> AppResult<Response> {
    let years = parse_years(params.years.as_deref(), YearSet::full())?;
    let download = export::export_data(&state.api, &years).await?;
    let content_type = download
        .content_type
        .unwrap_or_else(|| XLSX_CONTENT_TYPE.to_string());

    Ok(attachment(
        &content_type,
        &format!(
            "data_permintaan_{}_{}.xlsx",
            years.to_param().replace(',', "_"),
            chrono::Local::now().format("%Y-%m-%d")
        ),
        download.bytes,
    ))
}

/// Forward the `file` field of a multipart upload to the backend import.
pub async fn import(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> AppResult<Json<ImportSummary>> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(e.to_string()))?
    {
        if field.name() != Some("file") {
            continue;
        }

        let file_name = field.file_name().unwrap_or_default().to_string();
        export::validate_import_name(&file_name)?;

        let bytes = field
            .bytes()
            .await
            .map_err(|e| AppError::Validation(e.to_string()))?
            .to_vec();

        debug!(file_name = %file_name, size_bytes = bytes.len(), "Received import file");
        let summary = export::import_data(&state.api, &file_name, bytes).await?;
        return Ok(Json(summary));
    }

    Err(AppError::Validation("No file uploaded".into()))
}
