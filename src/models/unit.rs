use serde::{Deserialize, Serialize};

use super::null_as_default;
use crate::money::format_rupiah_short;
use crate::services::table::Searchable;
use crate::years::Year;

/// Spend classification computed by the backend from a unit's total outlay.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Option<String>")]
pub enum SpendSegment {
    Hemat,
    Sedang,
    Boros,
    #[default]
    #[serde(rename = "Tidak Diketahui")]
    Unknown,
}

impl From<Option<String>> for SpendSegment {
    fn from(value: Option<String>) -> Self {
        match value.as_deref().map(str::trim) {
            Some("Hemat") => Self::Hemat,
            Some("Sedang") => Self::Sedang,
            Some("Boros") => Self::Boros,
            _ => Self::Unknown,
        }
    }
}

impl SpendSegment {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Hemat => "Hemat",
            Self::Sedang => "Sedang",
            Self::Boros => "Boros",
            Self::Unknown => "Tidak Diketahui",
        }
    }
}

/// Demand classification computed by the backend from a unit's request volume.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Option<String>")]
pub enum DemandLabel {
    Tinggi,
    Sedang,
    Rendah,
    #[default]
    #[serde(rename = "Tidak Diketahui")]
    Unknown,
}

impl From<Option<String>> for DemandLabel {
    fn from(value: Option<String>) -> Self {
        match value.as_deref().map(str::trim) {
            Some("Tinggi") => Self::Tinggi,
            Some("Sedang") => Self::Sedang,
            Some("Rendah") => Self::Rendah,
            _ => Self::Unknown,
        }
    }
}

impl DemandLabel {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Tinggi => "Tinggi",
            Self::Sedang => "Sedang",
            Self::Rendah => "Rendah",
            Self::Unknown => "Tidak Diketahui",
        }
    }
}

/// One requesting unit from `/api/unit-pemohon-list`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnitRow {
    #[serde(rename(deserialize = "UnitPemohon"))]
    pub unit_name: String,
    #[serde(
        rename(deserialize = "TotalPermintaan"),
        default,
        deserialize_with = "null_as_default"
    )]
    pub total_requested: i64,
    #[serde(
        rename(deserialize = "TotalPengeluaran"),
        default,
        deserialize_with = "null_as_default"
    )]
    pub total_spend: f64,
    #[serde(rename(deserialize = "Segmen"), default)]
    pub spend_segment: SpendSegment,
    #[serde(rename(deserialize = "LabelSegmen"), default)]
    pub demand_label: DemandLabel,
}

impl Searchable for UnitRow {
    fn name(&self) -> &str {
        &self.unit_name
    }

    fn category(&self) -> Option<&str> {
        None
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UnitListResponse {
    #[serde(default, deserialize_with = "null_as_default")]
    pub units: Vec<UnitRow>,
}

/// Point of the demand-vs-spend scatter chart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScatterPoint {
    #[serde(rename(deserialize = "UnitPemohon"))]
    pub unit_name: String,
    #[serde(
        rename(deserialize = "TotalPermintaan"),
        default,
        deserialize_with = "null_as_default"
    )]
    pub total_requested: i64,
    #[serde(
        rename(deserialize = "TotalPengeluaran"),
        default,
        deserialize_with = "null_as_default"
    )]
    pub total_spend: f64,
    #[serde(rename(deserialize = "Segmen"), default)]
    pub spend_segment: SpendSegment,
    /// Tooltip text, e.g. `Rp 2.5jt`.
    #[serde(skip_deserializing)]
    pub spend_display: String,
}

impl ScatterPoint {
    pub fn with_display(mut self) -> Self {
        self.spend_display = format_rupiah_short(self.total_spend);
        self
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ScatterResponse {
    #[serde(default, deserialize_with = "null_as_default")]
    pub units: Vec<ScatterPoint>,
}

/// Monthly quantities of one item requested by a unit (`/api/unit-item-monthly`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnitItemMonthly {
    #[serde(rename(deserialize = "NamaBarang"))]
    pub item_name: String,
    #[serde(rename(deserialize = "Total"), default, deserialize_with = "null_as_default")]
    pub total: i64,
    #[serde(rename(deserialize = "Bulanan"), default, deserialize_with = "null_as_default")]
    pub monthly: Vec<i64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UnitItemsResponse {
    #[serde(default, deserialize_with = "null_as_default")]
    pub items: Vec<UnitItemMonthly>,
}

/// Contents of the unit drill-down modal.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UnitDetail {
    pub unit_name: String,
    pub year: Year,
    pub items: Vec<UnitItemMonthly>,
    pub empty_message: Option<String>,
}

/// One axis of the unit radar chart, scaled to `0..=10`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RadarScore {
    pub axis: &'static str,
    pub score: f64,
}

/// Procurement profile of one unit (`/api/unit-radar-data`).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RadarProfile {
    pub unit_name: String,
    pub total_spend: f64,
    pub total_requested: i64,
    pub average_item_price: f64,
    /// Quantity requested per transaction.
    pub purchase_efficiency: f64,
    pub category_diversity: i64,
    /// `Tinggi`, `Sedang` or `Rendah`, relative to every other unit.
    pub finance_segment: String,
    pub scores: Vec<RadarScore>,
}

/// Scale `value` from `[min, max]` onto `[0, 10]`, clamping outliers.
fn scale_to_ten(value: f64, min: f64, max: f64) -> f64 {
    if max <= min {
        return 5.0;
    }
    10.0 * (value.clamp(min, max) - min) / (max - min)
}

impl RadarProfile {
    fn with_scores(mut self) -> Self {
        self.scores = vec![
            RadarScore {
                axis: "Total Pengeluaran",
                score: scale_to_ten(self.total_spend, 0.0, 500_000_000.0),
            },
            RadarScore {
                axis: "Total Permintaan",
                score: scale_to_ten(self.total_requested as f64, 0.0, 10_000.0),
            },
            RadarScore {
                axis: "Rata-rata Harga Barang",
                score: scale_to_ten(self.average_item_price, 0.0, 5_000_000.0),
            },
            RadarScore {
                axis: "Efisiensi Pembelian",
                score: (self.purchase_efficiency * 10.0).clamp(0.0, 10.0),
            },
            RadarScore {
                axis: "Keragaman Kategori",
                score: scale_to_ten(self.category_diversity as f64, 1.0, 20.0),
            },
        ];
        self
    }
}

/// Raw radar payload. The backend answers `{}` for a unit it has no rows
/// for, so every field is optional.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RadarResponse {
    #[serde(rename = "TotalPengeluaran", default)]
    pub total_spend: Option<f64>,
    #[serde(rename = "TotalPermintaan", default)]
    pub total_requested: Option<i64>,
    #[serde(rename = "RataRataHargaBarang", default)]
    pub average_item_price: Option<f64>,
    #[serde(rename = "EfisiensiPembelian", default)]
    pub purchase_efficiency: Option<f64>,
    #[serde(rename = "KeragamanKategori", default)]
    pub category_diversity: Option<i64>,
    #[serde(rename = "SegmenKeuangan", default)]
    pub finance_segment: Option<String>,
}

impl RadarResponse {
    /// `None` when the backend had no data for the unit.
    pub fn into_profile(self, unit_name: &str) -> Option<RadarProfile> {
        let total_requested = self.total_requested?;
        let profile = RadarProfile {
            unit_name: unit_name.to_string(),
            total_spend: self.total_spend.unwrap_or_default(),
            total_requested,
            average_item_price: self.average_item_price.unwrap_or_default(),
            purchase_efficiency: self.purchase_efficiency.unwrap_or_default(),
            category_diversity: self.category_diversity.unwrap_or_default(),
            finance_segment: self.finance_segment.unwrap_or_default(),
            scores: Vec::new(),
        };
        Some(profile.with_scores())
    }
}
