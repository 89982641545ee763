use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::null_as_default;
use super::CategoryBreakdown;
use crate::years::Year;

pub const MONTHS_PER_YEAR: usize = 12;

/// One headline card of the dashboard. `value` is either a number or a
/// preformatted string, depending on the metric.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricCard {
    #[serde(default)]
    pub value: serde_json::Value,
    #[serde(
        rename(deserialize = "changeText"),
        default,
        deserialize_with = "null_as_default"
    )]
    pub change_text: String,
    #[serde(rename(deserialize = "isPositive"), default)]
    pub is_positive: Option<bool>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DashboardMetrics {
    #[serde(default)]
    pub current_year: Option<Year>,
    #[serde(default)]
    pub previous_year: Option<Year>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub metrics: BTreeMap<String, MetricCard>,
}

/// Twelve monthly totals, January first.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct MonthlySeries(Vec<f64>);

impl MonthlySeries {
    pub fn zeros() -> Self {
        Self(vec![0.0; MONTHS_PER_YEAR])
    }

    /// Pads short responses with zeros and drops anything past December.
    pub fn from_values(mut values: Vec<f64>) -> Self {
        values.resize(MONTHS_PER_YEAR, 0.0);
        Self(values)
    }

    pub fn values(&self) -> &[f64] {
        &self.0
    }

    pub fn has_data(&self) -> bool {
        self.0.iter().any(|v| *v > 0.0)
    }
}

impl Default for MonthlySeries {
    fn default() -> Self {
        Self::zeros()
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct MonthlyDemandResponse {
    #[serde(rename = "monthlyDemand", default, deserialize_with = "null_as_default")]
    pub monthly_demand: Vec<f64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct MonthlyExpenditureResponse {
    #[serde(
        rename = "monthlyExpenditure",
        default,
        deserialize_with = "null_as_default"
    )]
    pub monthly_expenditure: Vec<f64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CategoryAndTopItemsResponse {
    #[serde(
        rename = "categoryValueLabels",
        default,
        deserialize_with = "null_as_default"
    )]
    pub category_value_labels: Vec<String>,
    #[serde(
        rename = "categoryValueData",
        default,
        deserialize_with = "null_as_default"
    )]
    pub category_value_data: Vec<f64>,
    #[serde(rename = "topItems", default, deserialize_with = "null_as_default")]
    pub top_items: Vec<serde_json::Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CategoryAndTopItems {
    pub category_value: CategoryBreakdown,
    pub top_items: Vec<serde_json::Value>,
}

impl From<CategoryAndTopItemsResponse> for CategoryAndTopItems {
    fn from(response: CategoryAndTopItemsResponse) -> Self {
        Self {
            category_value: CategoryBreakdown {
                labels: response.category_value_labels,
                data: response.category_value_data,
            },
            top_items: response.top_items,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TopRequester {
    #[serde(rename(deserialize = "UnitPemohon"))]
    pub unit_name: String,
    #[serde(rename(deserialize = "Kategori"), default, deserialize_with = "null_as_default")]
    pub category: String,
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
    #[serde(
        rename(deserialize = "KelasPermintaan"),
        default,
        deserialize_with = "null_as_default"
    )]
    pub demand_class: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct TopRequestersResponse {
    #[serde(rename = "topRequesters", default, deserialize_with = "null_as_default")]
    pub top_requesters: Vec<TopRequester>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TopSpendingUnit {
    #[serde(rename(deserialize = "UnitPemohon"))]
    pub unit_name: String,
    #[serde(
        rename(deserialize = "TotalPengeluaran"),
        default,
        deserialize_with = "null_as_default"
    )]
    pub total_spend: f64,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct TopSpendingResponse {
    #[serde(
        rename = "topSpendingUnits",
        default,
        deserialize_with = "null_as_default"
    )]
    pub top_spending_units: Vec<TopSpendingUnit>,
}
