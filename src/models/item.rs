use serde::{Deserialize, Serialize};

use super::null_as_default;
use crate::money::format_rupiah_full;
use crate::services::table::Searchable;
use crate::years::Year;

/// One row of the item table (`/api/all-items/{year}`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemRow {
    #[serde(rename(deserialize = "Kategori"), default, deserialize_with = "null_as_default")]
    pub category: String,
    #[serde(rename(deserialize = "NamaBrg"))]
    pub name: String,
    #[serde(
        rename(deserialize = "HargaSatuan"),
        default,
        deserialize_with = "null_as_default"
    )]
    pub unit_price: f64,
    #[serde(
        rename(deserialize = "TotalPermintaan"),
        default,
        deserialize_with = "null_as_default"
    )]
    pub total_requested: i64,
}

impl ItemRow {
    pub fn unit_price_display(&self) -> String {
        format_rupiah_full(self.unit_price)
    }
}

impl Searchable for ItemRow {
    fn name(&self) -> &str {
        &self.name
    }

    fn category(&self) -> Option<&str> {
        Some(&self.category)
    }
}

/// Item row as shown in the table, with the formatted price.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ItemRowView {
    #[serde(flatten)]
    pub row: ItemRow,
    pub unit_price_display: String,
}

impl From<ItemRow> for ItemRowView {
    fn from(row: ItemRow) -> Self {
        Self {
            unit_price_display: row.unit_price_display(),
            row,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ItemsResponse {
    #[serde(default, deserialize_with = "null_as_default")]
    pub items: Vec<ItemRow>,
}

/// Quantity of one item requested by one unit (`/api/item-detail`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemUnitQuantity {
    #[serde(rename(deserialize = "UnitPemohon"))]
    pub unit_name: String,
    #[serde(rename(deserialize = "Jumlah"), default, deserialize_with = "null_as_default")]
    pub quantity: i64,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ItemDetailResponse {
    #[serde(default, deserialize_with = "null_as_default")]
    pub units: Vec<ItemUnitQuantity>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DetailRow {
    pub counterparty: String,
    pub quantity: i64,
    pub derived_total: f64,
    pub derived_total_display: String,
}

/// Contents of the item drill-down modal.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DetailModal {
    pub subject: String,
    pub year: Year,
    pub unit_price: f64,
    pub rows: Vec<DetailRow>,
    pub empty_message: Option<String>,
}

impl DetailModal {
    pub fn total_quantity(&self) -> i64 {
        self.rows.iter().map(|r| r.quantity).sum()
    }

    pub fn total_spend(&self) -> f64 {
        self.rows.iter().map(|r| r.derived_total).sum()
    }
}
