use std::sync::Arc;

use tracing::warn;

use super::guard::{RequestGuard, Slot};
use super::NO_DATA_MESSAGE;
use crate::api::ApiClient;
use crate::models::unit::{UnitDetail, UnitRow};
use crate::pagination::{Page, PageState, Paginator};
use crate::services::dashboard::{
    radar_comparison, unit_overview, RadarComparison, RadarUnits, UnitOverview,
};
use crate::services::detail::fetch_unit_detail;
use crate::services::table::{compare_text, filter_and_sort, TableFilter, TableOrder};
use crate::years::{Year, YearSelection, YearSet, UNIT_YEARS};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct UnitTable {
    /// Sorted by unit name.
    pub units: Vec<UnitRow>,
    pub message: Option<String>,
}

#[derive(Debug, Clone)]
struct Controls {
    years: YearSelection,
    search: String,
    page: PageState,
    radar_units: RadarUnits,
}

#[derive(Debug)]
struct Inner {
    paginator: Paginator,
    controls: Slot<Controls>,
    units: Slot<UnitTable>,
    overview: Slot<UnitOverview>,
    detail: Slot<Option<UnitDetail>>,
    radar: Slot<RadarComparison>,
    unit_requests: RequestGuard,
    overview_requests: RequestGuard,
    detail_requests: RequestGuard,
    radar_requests: RequestGuard,
}

/// Headless model of the unit analysis page.
///
/// The overview charts follow the year selection; the unit table always
/// covers every year and is searched by unit name only.
#[derive(Debug, Clone)]
pub struct UnitAnalysisView {
    inner: Arc<Inner>,
}

impl Default for UnitAnalysisView {
    fn default() -> Self {
        Self::new(Paginator::default())
    }
}

impl UnitAnalysisView {
    pub fn new(paginator: Paginator) -> Self {
        let controls = Controls {
            years: YearSelection::new(UNIT_YEARS),
            search: String::new(),
            page: PageState::default(),
            radar_units: RadarUnits::default(),
        };

        Self {
            inner: Arc::new(Inner {
                paginator,
                controls: Slot::new(controls),
                units: Slot::new(UnitTable::default()),
                overview: Slot::new(UnitOverview::default()),
                detail: Slot::new(None),
                radar: Slot::new(RadarComparison::default()),
                unit_requests: RequestGuard::new("unit_table"),
                overview_requests: RequestGuard::new("unit_overview"),
                detail_requests: RequestGuard::new("unit_detail"),
                radar_requests: RequestGuard::new("unit_radar"),
            }),
        }
    }

    pub fn years(&self) -> YearSet {
        self.inner.controls.with(|c| c.years.years().clone())
    }

    pub fn toggle_year(&self, year: Year) -> YearSet {
        self.inner.controls.update(|c| {
            c.years.toggle(year);
            c.years.years().clone()
        })
    }

    pub fn toggle_all_years(&self) -> YearSet {
        self.inner.controls.update(|c| {
            c.years.toggle_all();
            c.years.years().clone()
        })
    }

    pub fn search(&self) -> String {
        self.inner.controls.with(|c| c.search.clone())
    }

    pub fn set_search(&self, term: &str) {
        self.inner.controls.update(|c| {
            c.search = term.trim().to_string();
            c.page.reset();
        });
    }

    pub fn current_page(&self) -> usize {
        self.inner.controls.with(|c| c.page.current())
    }

    pub fn filtered_rows(&self) -> Vec<UnitRow> {
        let filter = TableFilter::new(self.search());
        self.inner
            .units
            .with(|t| filter_and_sort(&t.units, &filter, TableOrder::Preserve))
    }

    pub fn go_to_page(&self, page: usize) -> bool {
        let total_pages = self.inner.paginator.total_pages(self.filtered_rows().len());
        self.inner
            .controls
            .update(|c| c.page.go_to(page, total_pages))
    }

    pub fn visible_page(&self) -> Page<UnitRow> {
        let rows = self.filtered_rows();
        self.inner.paginator.paginate(&rows, self.current_page())
    }

    pub fn units(&self) -> UnitTable {
        self.inner.units.get()
    }

    pub fn overview(&self) -> UnitOverview {
        self.inner.overview.get()
    }

    pub fn detail(&self) -> Option<UnitDetail> {
        self.inner.detail.get()
    }

    pub fn radar_units(&self) -> RadarUnits {
        self.inner.controls.with(|c| c.radar_units.clone())
    }

    pub fn set_radar_units(&self, first: Option<&str>, second: Option<&str>) -> RadarUnits {
        let units = RadarUnits::new(first, second);
        self.inner
            .controls
            .update(|c| c.radar_units = units.clone());
        units
    }

    pub fn swap_radar_units(&self) -> RadarUnits {
        self.inner.controls.update(|c| {
            c.radar_units.swap();
            c.radar_units.clone()
        })
    }

    pub fn radar(&self) -> RadarComparison {
        self.inner.radar.get()
    }

    pub async fn refresh_units(&self, client: &ApiClient) -> bool {
        let ticket = self.inner.unit_requests.begin();

        let table = match client.unit_list(None).await {
            Ok(mut units) => {
                units.sort_by(|a, b| compare_text(&a.unit_name, &b.unit_name));
                UnitTable {
                    message: units.is_empty().then(|| NO_DATA_MESSAGE.to_string()),
                    units,
                }
            }
            Err(e) => {
                warn!(error = %e, "Failed to load unit list");
                UnitTable {
                    units: Vec::new(),
                    message: Some(NO_DATA_MESSAGE.to_string()),
                }
            }
        };

        let applied = self
            .inner
            .unit_requests
            .apply(ticket, &self.inner.units, table);
        if applied {
            let total_pages = self.inner.paginator.total_pages(self.filtered_rows().len());
            let seed = self.inner.units.with(|t| RadarUnits::from_units(&t.units));
            self.inner.controls.update(|c| {
                c.page.clamp(total_pages);
                if c.radar_units.is_empty() {
                    c.radar_units = seed;
                }
            });
        }
        applied
    }

    /// Reload the radar profiles of the two picked units.
    pub async fn refresh_radar(&self, client: &ApiClient) -> bool {
        let ticket = self.inner.radar_requests.begin();
        let units = self.radar_units();
        let comparison = radar_comparison(client, &units).await;
        self.inner
            .radar_requests
            .apply(ticket, &self.inner.radar, comparison)
    }

    pub async fn refresh_overview(&self, client: &ApiClient) -> bool {
        let ticket = self.inner.overview_requests.begin();
        let years = self.years();
        let overview = unit_overview(client, &years).await;
        self.inner
            .overview_requests
            .apply(ticket, &self.inner.overview, overview)
    }

    /// Load the monthly item breakdown of `unit_name` for the most recent
    /// selected year.
    pub async fn open_detail(&self, client: &ApiClient, unit_name: &str) -> bool {
        let ticket = self.inner.detail_requests.begin();
        let year = self.years().latest();
        let detail = fetch_unit_detail(client, unit_name, year).await;
        self.inner
            .detail_requests
            .apply(ticket, &self.inner.detail, Some(detail))
    }

    pub fn close_detail(&self) {
        let ticket = self.inner.detail_requests.begin();
        self.inner
            .detail_requests
            .apply(ticket, &self.inner.detail, None);
    }
}
