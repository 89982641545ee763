//! Overview data for the home dashboard and the unit analysis page.

use serde::Serialize;
use tracing::{debug, warn};

use crate::api::ApiClient;
use crate::error::AppResult;
use crate::models::category::CategoryBreakdown;
use crate::models::dashboard::{
    CategoryAndTopItems, DashboardMetrics, MonthlySeries, TopRequester, TopSpendingUnit,
};
use crate::models::unit::{RadarProfile, ScatterPoint, UnitRow};
use crate::years::{Year, YearSet, YEAR_DOMAIN};

/// Monthly measure plotted on the dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MonthlyMeasure {
    Demand,
    Expenditure,
}

impl MonthlyMeasure {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Demand => "demand",
            Self::Expenditure => "expenditure",
        }
    }

    async fn fetch(&self, client: &ApiClient, years: &YearSet) -> AppResult<Vec<f64>> {
        match self {
            Self::Demand => client.monthly_demand(years).await,
            Self::Expenditure => client.monthly_expenditure(years).await,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct YearSeries {
    pub year: Year,
    pub values: MonthlySeries,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardOverview {
    pub years: YearSet,
    pub metrics: DashboardMetrics,
    pub monthly_demand: MonthlySeries,
    pub category_value: CategoryBreakdown,
    pub top_items: Vec<serde_json::Value>,
    pub top_requesters: Vec<TopRequester>,
    /// One series per selected year.
    pub expenditure_by_year: Vec<YearSeries>,
    /// One series per year of the domain, independent of the selection.
    pub demand_by_year: Vec<YearSeries>,
    pub category_demand: CategoryBreakdown,
}

/// Everything the home dashboard shows for `years`.
///
/// The headline metrics, combined monthly demand, category/top-item data and
/// top requesters must all load; any of them failing fails the dashboard.
/// The per-year series and the demand proportion degrade to zeros or empty
/// data instead.
pub async fn dashboard_overview(client: &ApiClient, years: &YearSet) -> AppResult<DashboardOverview> {
    debug!(years = %years, "Loading dashboard overview");

    let main = async {
        tokio::try_join!(
            client.dashboard_metrics(years),
            client.monthly_demand(years),
            client.category_and_top_items(years),
            client.top_requesters(years),
        )
    };

    let (main, expenditure_by_year, demand_by_year, category_demand) = tokio::join!(
        main,
        monthly_by_year(client, years.as_slice(), MonthlyMeasure::Expenditure),
        monthly_by_year(client, &YEAR_DOMAIN, MonthlyMeasure::Demand),
        category_demand_or_empty(client, years),
    );

    let (metrics, monthly_demand, category_and_top_items, top_requesters) = main?;
    let CategoryAndTopItems {
        category_value,
        top_items,
    } = category_and_top_items.into();

    Ok(DashboardOverview {
        years: years.clone(),
        metrics,
        monthly_demand: MonthlySeries::from_values(monthly_demand),
        category_value,
        top_items,
        top_requesters,
        expenditure_by_year,
        demand_by_year,
        category_demand,
    })
}

/// Fetch one monthly series per year concurrently. A year that fails shows
/// as twelve zeros.
pub async fn monthly_by_year(
    client: &ApiClient,
    years: &[Year],
    measure: MonthlyMeasure,
) -> Vec<YearSeries> {
    let handles: Vec<_> = years
        .iter()
        .map(|&year| {
            let client = client.clone();
            let handle = tokio::spawn(async move {
                measure.fetch(&client, &YearSet::single(year)).await
            });
            (year, handle)
        })
        .collect();

    let mut series = Vec::with_capacity(handles.len());
    for (year, handle) in handles {
        let values = match handle.await {
            Ok(Ok(values)) => MonthlySeries::from_values(values),
            Ok(Err(e)) => {
                warn!(year, measure = measure.as_str(), error = %e, "Monthly series failed, using zeros");
                MonthlySeries::zeros()
            }
            Err(e) => {
                warn!(year, measure = measure.as_str(), error = %e, "Monthly series task aborted, using zeros");
                MonthlySeries::zeros()
            }
        };
        series.push(YearSeries { year, values });
    }

    series
}

async fn category_demand_or_empty(client: &ApiClient, years: &YearSet) -> CategoryBreakdown {
    match client.category_demand_proportion(years).await {
        Ok(breakdown) => breakdown,
        Err(e) => {
            warn!(years = %years, error = %e, "Category demand proportion failed");
            CategoryBreakdown::empty()
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct UnitOverview {
    pub top_requesters: Vec<TopRequester>,
    pub top_spending_units: Vec<TopSpendingUnit>,
    pub scatter: Vec<ScatterPoint>,
}

impl UnitOverview {
    pub fn is_empty(&self) -> bool {
        self.top_requesters.is_empty() && self.top_spending_units.is_empty() && self.scatter.is_empty()
    }
}

/// Charts of the unit analysis page. The three requests succeed or fail
/// together: if any fails, all three charts are empty.
pub async fn unit_overview(client: &ApiClient, years: &YearSet) -> UnitOverview {
    debug!(years = %years, "Loading unit overview");

    let result = tokio::try_join!(
        client.top_requesters(years),
        client.top_spending_units(years),
        client.unit_scatter(years),
    );

    match result {
        Ok((top_requesters, top_spending_units, scatter)) => UnitOverview {
            top_requesters,
            top_spending_units,
            scatter,
        },
        Err(e) => {
            warn!(years = %years, error = %e, "Unit overview failed, showing empty charts");
            UnitOverview::default()
        }
    }
}

/// The two units picked for the radar comparison.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RadarUnits {
    pub first: Option<String>,
    pub second: Option<String>,
}

impl RadarUnits {
    /// Blank names count as no selection.
    pub fn new(first: Option<&str>, second: Option<&str>) -> Self {
        let pick = |name: Option<&str>| {
            name.map(str::trim)
                .filter(|n| !n.is_empty())
                .map(str::to_string)
        };
        Self {
            first: pick(first),
            second: pick(second),
        }
    }

    /// The first two units of `units`, which the page starts with.
    pub fn from_units(units: &[UnitRow]) -> Self {
        let mut names = units.iter().map(|u| u.unit_name.as_str());
        Self::new(names.next(), names.next())
    }

    pub fn is_empty(&self) -> bool {
        self.first.is_none() && self.second.is_none()
    }

    pub fn swap(&mut self) {
        std::mem::swap(&mut self.first, &mut self.second);
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RadarComparison {
    pub units: RadarUnits,
    pub first: Option<RadarProfile>,
    pub second: Option<RadarProfile>,
}

/// Load both radar profiles concurrently. A unit that is not picked, that
/// the backend has no data for, or whose request fails has no profile.
pub async fn radar_comparison(client: &ApiClient, units: &RadarUnits) -> RadarComparison {
    let (first, second) = tokio::join!(
        radar_or_none(client, units.first.as_deref()),
        radar_or_none(client, units.second.as_deref()),
    );

    RadarComparison {
        units: units.clone(),
        first,
        second,
    }
}

async fn radar_or_none(client: &ApiClient, unit_name: Option<&str>) -> Option<RadarProfile> {
    let unit_name = unit_name?;
    match client.unit_radar(unit_name).await {
        Ok(profile) => profile,
        Err(e) => {
            warn!(unit = %unit_name, error = %e, "Radar profile failed");
            None
        }
    }
}
