//! Data management: template and export passthrough, spreadsheet import and
//! CSV downloads of the analysis tables.

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::api::{ApiClient, Download};
use crate::error::{AppError, AppResult};
use crate::models::item::ItemRow;
use crate::models::unit::UnitRow;
use crate::years::YearSet;

pub const TEMPLATE_FILE_NAME: &str = "template_permintaan.xlsx";
pub const XLSX_CONTENT_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";

/// File extensions the backend import understands.
pub const IMPORT_EXTENSIONS: [&str; 3] = [".xlsx", ".xls", ".csv"];

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportSummary {
    /// Rows added by the import.
    #[serde(default)]
    pub imported: i64,
}

pub async fn download_template(client: &ApiClient) -> AppResult<Download> {
    client.template().await
}

pub async fn export_data(client: &ApiClient, years: &YearSet) -> AppResult<Download> {
    client.export_data(years).await
}

pub fn validate_import_name(file_name: &str) -> AppResult<()> {
    let lower = file_name.trim().to_lowercase();
    if IMPORT_EXTENSIONS.iter().any(|ext| lower.ends_with(ext)) {
        Ok(())
    } else {
        Err(AppError::Validation(
            "Format file tidak didukung. Harap gunakan .xlsx, .xls, atau .csv".into(),
        ))
    }
}

/// Forward an uploaded spreadsheet to the backend import.
pub async fn import_data(
    client: &ApiClient,
    file_name: &str,
    bytes: Vec<u8>,
) -> AppResult<ImportSummary> {
    validate_import_name(file_name)?;
    if bytes.is_empty() {
        return Err(AppError::Validation("Uploaded file is empty".into()));
    }

    info!(file_name = %file_name, size_bytes = bytes.len(), "Importing data file");
    let summary: ImportSummary = client.post_file("/api/import-data", file_name, bytes).await?;
    info!(imported = summary.imported, "Import finished");

    Ok(summary)
}

pub fn items_csv(rows: &[ItemRow]) -> AppResult<Vec<u8>> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record([
        "Kategori",
        "Nama Barang",
        "Harga Satuan",
        "Total Permintaan",
        "Total Nilai",
    ])?;

    for row in rows {
        let total_value = row.unit_price * row.total_requested as f64;
        writer.write_record([
            row.category.clone(),
            row.name.clone(),
            format_amount(row.unit_price),
            row.total_requested.to_string(),
            format_amount(total_value),
        ])?;
    }

    finish(writer)
}

pub fn units_csv(rows: &[UnitRow]) -> AppResult<Vec<u8>> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record([
        "Unit Pemohon",
        "Total Permintaan",
        "Total Pengeluaran",
        "Segmen",
        "Label Permintaan",
    ])?;

    for row in rows {
        writer.write_record([
            row.unit_name.clone(),
            row.total_requested.to_string(),
            format_amount(row.total_spend),
            row.spend_segment.label().to_string(),
            row.demand_label.label().to_string(),
        ])?;
    }

    finish(writer)
}

/// Whole Rupiah, no separators, so spreadsheets read the column as numbers.
fn format_amount(value: f64) -> String {
    format!("{:.0}", value)
}

fn finish(writer: csv::Writer<Vec<u8>>) -> AppResult<Vec<u8>> {
    writer
        .into_inner()
        .map_err(|e| AppError::Io(e.into_error()))
}
