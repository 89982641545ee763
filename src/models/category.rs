use serde::{Deserialize, Serialize};

use super::null_as_default;

/// Which per-category total a chart shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CategoryMetric {
    /// Money spent per category (Rupiah).
    Value,
    /// Units requested per category.
    Unit,
}

impl CategoryMetric {
    pub fn endpoint(&self) -> &'static str {
        match self {
            Self::Value => "/api/category-value",
            Self::Unit => "/api/category-unit",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Value => "value",
            Self::Unit => "unit",
        }
    }
}

/// Chart-ready `{labels, data}` pair as returned by the category endpoints.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CategoryBreakdown {
    #[serde(default, deserialize_with = "null_as_default")]
    pub labels: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub data: Vec<f64>,
}

impl CategoryBreakdown {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// Label/value pairs. A label without a matching value counts as zero.
    pub fn pairs(&self) -> impl Iterator<Item = (&str, f64)> + '_ {
        self.labels
            .iter()
            .enumerate()
            .map(|(i, label)| (label.as_str(), self.data.get(i).copied().unwrap_or(0.0)))
    }

    pub fn from_aggregates(aggregates: Vec<CategoryAggregate>) -> Self {
        let (labels, data) = aggregates
            .into_iter()
            .map(|a| (a.label, a.value))
            .unzip();
        Self { labels, data }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryAggregate {
    pub label: String,
    pub value: f64,
}
