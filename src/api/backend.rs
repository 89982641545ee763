//! Typed calls for each procurement backend endpoint.

use super::client::{path_segment, ApiClient, Download};
use crate::error::AppResult;
use crate::models::category::{CategoryBreakdown, CategoryMetric};
use crate::models::dashboard::{
    CategoryAndTopItemsResponse, DashboardMetrics, MonthlyDemandResponse,
    MonthlyExpenditureResponse, TopRequester, TopRequestersResponse, TopSpendingResponse,
    TopSpendingUnit,
};
use crate::models::item::{ItemDetailResponse, ItemRow, ItemsResponse};
use crate::models::unit::{
    RadarProfile, RadarResponse, ScatterPoint, ScatterResponse, UnitItemMonthly,
    UnitItemsResponse, UnitListResponse, UnitRow,
};
use crate::years::{Year, YearSet};

impl ApiClient {
    /// `GET /api/category-{value,unit}/{year}`
    pub async fn category_breakdown(
        &self,
        metric: CategoryMetric,
        year: Year,
    ) -> AppResult<CategoryBreakdown> {
        self.get_json(&format!("{}/{}", metric.endpoint(), year))
            .await
    }

    /// `GET /api/category-{value,unit}?years=all|2023,2024`
    pub async fn category_breakdown_combined(
        &self,
        metric: CategoryMetric,
        years: &YearSet,
    ) -> AppResult<CategoryBreakdown> {
        self.get_json_query(metric.endpoint(), &[("years", years.to_param())])
            .await
    }

    pub async fn all_items(&self, year: Year) -> AppResult<Vec<ItemRow>> {
        let response: ItemsResponse = self.get_json(&format!("/api/all-items/{}", year)).await?;
        Ok(response.items)
    }

    pub async fn item_detail(&self, year: Year, item_name: &str) -> AppResult<ItemDetailResponse> {
        self.get_json(&format!(
            "/api/item-detail/{}/{}",
            year,
            path_segment(item_name)
        ))
        .await
    }

    /// Units with their segments. Without a year the backend aggregates
    /// every year.
    pub async fn unit_list(&self, year: Option<Year>) -> AppResult<Vec<UnitRow>> {
        let endpoint = match year {
            Some(year) => format!("/api/unit-pemohon-list/{}", year),
            None => "/api/unit-pemohon-list".to_string(),
        };
        let response: UnitListResponse = self.get_json(&endpoint).await?;
        Ok(response.units)
    }

    pub async fn unit_items_monthly(
        &self,
        unit_name: &str,
        year: Year,
    ) -> AppResult<Vec<UnitItemMonthly>> {
        let response: UnitItemsResponse = self
            .get_json_query(
                "/api/unit-item-monthly",
                &[("unit", unit_name.to_string()), ("year", year.to_string())],
            )
            .await?;
        Ok(response.items)
    }

    pub async fn top_requesters(&self, years: &YearSet) -> AppResult<Vec<TopRequester>> {
        let response: TopRequestersResponse = self
            .get_json_query("/api/top-requesters", &[("years", years.to_param())])
            .await?;
        Ok(response.top_requesters)
    }

    pub async fn top_spending_units(&self, years: &YearSet) -> AppResult<Vec<TopSpendingUnit>> {
        let response: TopSpendingResponse = self
            .get_json_query("/api/top-spending-units", &[("years", years.to_param())])
            .await?;
        Ok(response.top_spending_units)
    }

    pub async fn unit_scatter(&self, years: &YearSet) -> AppResult<Vec<ScatterPoint>> {
        let response: ScatterResponse = self
            .get_json_query("/api/unit-scatter-data", &[("years", years.to_param())])
            .await?;
        Ok(response
            .units
            .into_iter()
            .map(ScatterPoint::with_display)
            .collect())
    }

    /// `GET /api/unit-radar-data?unit=`. `None` when the backend has no rows
    /// for the unit.
    pub async fn unit_radar(&self, unit_name: &str) -> AppResult<Option<RadarProfile>> {
        let response: RadarResponse = self
            .get_json_query("/api/unit-radar-data", &[("unit", unit_name)])
            .await?;
        Ok(response.into_profile(unit_name))
    }

    pub async fn dashboard_metrics(&self, years: &YearSet) -> AppResult<DashboardMetrics> {
        self.get_json_query("/api/dashboard-metrics", &[("years", years.to_param())])
            .await
    }

    pub async fn monthly_demand(&self, years: &YearSet) -> AppResult<Vec<f64>> {
        let response: MonthlyDemandResponse = self
            .get_json_query("/api/monthly-demand", &[("years", years.to_param())])
            .await?;
        Ok(response.monthly_demand)
    }

    pub async fn monthly_expenditure(&self, years: &YearSet) -> AppResult<Vec<f64>> {
        let response: MonthlyExpenditureResponse = self
            .get_json_query("/api/monthly-expenditure", &[("years", years.to_param())])
            .await?;
        Ok(response.monthly_expenditure)
    }

    pub async fn category_and_top_items(
        &self,
        years: &YearSet,
    ) -> AppResult<CategoryAndTopItemsResponse> {
        self.get_json_query(
            "/api/category-and-top-items",
            &[("years", years.to_param())],
        )
        .await
    }

    pub async fn category_demand_proportion(
        &self,
        years: &YearSet,
    ) -> AppResult<CategoryBreakdown> {
        self.get_json_query(
            "/api/category-demand-proportion",
            &[("years", years.to_param())],
        )
        .await
    }

    /// Import template spreadsheet.
    pub async fn template(&self) -> AppResult<Download> {
        self.get_bytes("/api/template", &[] as &[(&str, &str)]).await
    }

    /// Full data export for the given years.
    pub async fn export_data(&self, years: &YearSet) -> AppResult<Download> {
        self.get_bytes("/api/export-data", &[("years", years.to_param())])
            .await
    }
}
