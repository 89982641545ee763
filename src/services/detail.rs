//! Drill-down lookups behind the item and unit modals.

use tracing::{debug, warn};

use crate::api::ApiClient;
use crate::error::AppResult;
use crate::models::dashboard::MONTHS_PER_YEAR;
use crate::models::item::{DetailModal, DetailRow, ItemRow, ItemUnitQuantity};
use crate::models::unit::{UnitDetail, UnitItemMonthly};
use crate::money::format_rupiah_full;
use crate::years::Year;

/// Units that requested `item_name` in `year`, with spend derived from the
/// unit price on the item's summary row (zero when the item is not among
/// `summary_rows`).
pub async fn fetch_item_detail(
    client: &ApiClient,
    year: Year,
    item_name: &str,
    summary_rows: &[ItemRow],
) -> AppResult<DetailModal> {
    debug!(year, item = %item_name, "Loading item detail");

    let response = client.item_detail(year, item_name).await?;
    Ok(build_item_detail(year, item_name, summary_rows, response.units))
}

pub fn build_item_detail(
    year: Year,
    item_name: &str,
    summary_rows: &[ItemRow],
    units: Vec<ItemUnitQuantity>,
) -> DetailModal {
    let unit_price = summary_rows
        .iter()
        .find(|row| row.name == item_name)
        .map(|row| row.unit_price)
        .unwrap_or(0.0);

    let rows: Vec<DetailRow> = units
        .into_iter()
        .map(|unit| {
            let derived_total = unit.quantity as f64 * unit_price;
            DetailRow {
                counterparty: unit.unit_name,
                quantity: unit.quantity,
                derived_total,
                derived_total_display: format_rupiah_full(derived_total),
            }
        })
        .collect();

    let empty_message = rows.is_empty().then(|| {
        format!(
            "Tidak ada unit pemohon yang meminta \"{}\" di tahun {}.",
            item_name, year
        )
    });

    DetailModal {
        subject: item_name.to_string(),
        year,
        unit_price,
        rows,
        empty_message,
    }
}

/// Items a unit requested in `year`, month by month. A failed lookup shows
/// the empty state instead of an error.
pub async fn fetch_unit_detail(client: &ApiClient, unit_name: &str, year: Year) -> UnitDetail {
    debug!(year, unit = %unit_name, "Loading unit detail");

    let items = match client.unit_items_monthly(unit_name, year).await {
        Ok(items) => items,
        Err(e) => {
            warn!(year, unit = %unit_name, error = %e, "Unit detail request failed");
            Vec::new()
        }
    };

    build_unit_detail(unit_name, year, items)
}

pub fn build_unit_detail(unit_name: &str, year: Year, items: Vec<UnitItemMonthly>) -> UnitDetail {
    let items: Vec<UnitItemMonthly> = items
        .into_iter()
        .map(|mut item| {
            item.monthly.resize(MONTHS_PER_YEAR, 0);
            item
        })
        .collect();

    let empty_message = items.is_empty().then(|| {
        format!(
            "Tidak ada data permintaan barang untuk unit ini di tahun {}.",
            year
        )
    });

    UnitDetail {
        unit_name: unit_name.to_string(),
        year,
        items,
        empty_message,
    }
}
