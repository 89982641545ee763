pub mod category;
pub mod chat;
pub mod dashboard;
pub mod item;
pub mod unit;

pub use category::{CategoryAggregate, CategoryBreakdown, CategoryMetric};
pub use chat::{ChatMode, ConversationMessage, Role};
pub use dashboard::{
    CategoryAndTopItems, DashboardMetrics, MetricCard, MonthlySeries, TopRequester,
    TopSpendingUnit,
};
pub use item::{DetailModal, DetailRow, ItemDetailResponse, ItemRow, ItemRowView, ItemUnitQuantity};
pub use unit::{
    DemandLabel, RadarProfile, RadarScore, ScatterPoint, SpendSegment, UnitDetail,
    UnitItemMonthly, UnitRow,
};

use serde::{Deserialize, Deserializer};

/// The backend emits `null` for missing numbers and strings; treat those the
/// same as an absent field.
pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
