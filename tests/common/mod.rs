//! Shared test utilities for integration tests.
//!
//! `FakeBackend` serves fixture data on the procurement backend's endpoints
//! from an OS-assigned port. `TestClient` builds the real application against
//! it and drives the router with `oneshot` requests.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::body::Body;
use axum::extract::{Multipart, Path, Query, State};
use axum::http::{header, Request, StatusCode};
use axum::response::{IntoResponse, Json, Response};
use axum::routing::{get, post};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::{json, Value};
use stark::api::{ApiClient, ApiConfig};
use stark::config::Config;
use stark::server::{build_app, serve};
use tower::ServiceExt;

pub const YEARS: [i32; 3] = [2023, 2024, 2025];

/// Category values per year: `(label, value)`.
pub fn category_values(year: i32) -> Vec<(&'static str, f64)> {
    match year {
        2023 => vec![("ATK", 100.0), ("Kertas", 40.0)],
        2024 => vec![("ATK", 50.0), ("Elektronik", 30.0)],
        2025 => vec![("Kertas", 70.0), ("ATK", 20.0), ("Elektronik", 5.0)],
        _ => Vec::new(),
    }
}

pub fn category_units(year: i32) -> Vec<(&'static str, f64)> {
    match year {
        2023 => vec![("ATK", 10.0)],
        2024 => vec![("Elektronik", 3.0), ("ATK", 4.0)],
        2025 => vec![("Kertas", 7.0)],
        _ => Vec::new(),
    }
}

fn items(year: i32) -> Vec<Value> {
    match year {
        2025 => vec![
            json!({"Kategori": "Kertas", "NamaBrg": "Kertas A4", "HargaSatuan": 55000, "TotalPermintaan": 12}),
            json!({"Kategori": "ATK", "NamaBrg": "Pulpen", "HargaSatuan": 3500, "TotalPermintaan": 40}),
            json!({"Kategori": "Elektronik", "NamaBrg": "Mouse", "HargaSatuan": 75000, "TotalPermintaan": 3}),
            json!({"Kategori": "ATK", "NamaBrg": "Map/Folder A4", "HargaSatuan": 2500, "TotalPermintaan": 30}),
        ],
        2024 => (1..=23)
            .map(|i| {
                json!({
                    "Kategori": "Lain-lain",
                    "NamaBrg": format!("Barang {:02}", i),
                    "HargaSatuan": 1000 * i,
                    "TotalPermintaan": i,
                })
            })
            .collect(),
        _ => Vec::new(),
    }
}

fn units() -> Vec<Value> {
    vec![
        json!({"UnitPemohon": "Humas", "TotalPermintaan": 12, "TotalPengeluaran": 450000,
               "Segmen": "Hemat", "LabelSegmen": "Rendah"}),
        json!({"UnitPemohon": "Bagian Umum", "TotalPermintaan": 40, "TotalPengeluaran": 2500000,
               "Segmen": "Boros", "LabelSegmen": "Tinggi"}),
        json!({"UnitPemohon": "Keuangan", "TotalPermintaan": 20, "TotalPengeluaran": 900000,
               "Segmen": "Sedang", "LabelSegmen": null}),
    ]
}

/// Behaviour switches for the fake backend.
#[derive(Debug, Clone, Default)]
pub struct BackendOptions {
    /// Any request touching one of these years answers 500.
    pub failing_years: Vec<i32>,
    /// Per-year category requests for these years are delayed.
    pub slow_years: Vec<(i32, Duration)>,
}

#[derive(Clone)]
struct FakeState {
    options: BackendOptions,
    hits: Arc<Mutex<Vec<String>>>,
}

impl FakeState {
    fn record(&self, hit: String) {
        self.hits.lock().unwrap().push(hit);
    }

    fn year_fails(&self, year: i32) -> bool {
        self.options.failing_years.contains(&year)
    }

    fn years_fail(&self, param: Option<&String>) -> bool {
        parse_years(param).iter().any(|y| self.year_fails(*y))
    }
}

fn parse_years(param: Option<&String>) -> Vec<i32> {
    match param.map(String::as_str) {
        None | Some("all") => YEARS.to_vec(),
        Some(list) => list.split(',').filter_map(|y| y.trim().parse().ok()).collect(),
    }
}

fn failure() -> Response {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({"error": "database unavailable"})),
    )
        .into_response()
}

fn breakdown(pairs: Vec<(&'static str, f64)>) -> Value {
    let labels: Vec<_> = pairs.iter().map(|(l, _)| *l).collect();
    let data: Vec<_> = pairs.iter().map(|(_, v)| *v).collect();
    json!({"labels": labels, "data": data})
}

fn combined(years: &[i32], per_year: fn(i32) -> Vec<(&'static str, f64)>) -> Value {
    let mut totals: Vec<(&'static str, f64)> = Vec::new();
    for year in years {
        for (label, value) in per_year(*year) {
            match totals.iter_mut().find(|(l, _)| *l == label) {
                Some(entry) => entry.1 += value,
                None => totals.push((label, value)),
            }
        }
    }
    totals.sort_by(|a, b| b.1.total_cmp(&a.1));
    breakdown(totals)
}

async fn category_by_year(
    state: FakeState,
    year: i32,
    per_year: fn(i32) -> Vec<(&'static str, f64)>,
) -> Response {
    if let Some((_, delay)) = state.options.slow_years.iter().find(|(y, _)| *y == year) {
        tokio::time::sleep(*delay).await;
    }
    if state.year_fails(year) {
        return failure();
    }
    Json(breakdown(per_year(year))).into_response()
}

async fn category_value_year(State(state): State<FakeState>, Path(year): Path<i32>) -> Response {
    state.record(format!("/api/category-value/{}", year));
    category_by_year(state, year, category_values).await
}

async fn category_unit_year(State(state): State<FakeState>, Path(year): Path<i32>) -> Response {
    state.record(format!("/api/category-unit/{}", year));
    category_by_year(state, year, category_units).await
}

async fn category_value_combined(
    State(state): State<FakeState>,
    Query(q): Query<HashMap<String, String>>,
) -> Response {
    state.record("/api/category-value?years".into());
    if state.years_fail(q.get("years")) {
        return failure();
    }
    Json(combined(&parse_years(q.get("years")), category_values)).into_response()
}

async fn category_unit_combined(
    State(state): State<FakeState>,
    Query(q): Query<HashMap<String, String>>,
) -> Response {
    state.record("/api/category-unit?years".into());
    if state.years_fail(q.get("years")) {
        return failure();
    }
    Json(combined(&parse_years(q.get("years")), category_units)).into_response()
}

async fn all_items(State(state): State<FakeState>, Path(year): Path<i32>) -> Response {
    state.record(format!("/api/all-items/{}", year));
    if state.year_fails(year) {
        return failure();
    }
    Json(json!({"items": items(year)})).into_response()
}

async fn item_detail(
    State(state): State<FakeState>,
    Path((year, name)): Path<(i32, String)>,
) -> Response {
    state.record(format!("/api/item-detail/{}/{}", year, name));
    if state.year_fails(year) {
        return failure();
    }
    let units = match name.as_str() {
        "Pulpen" => json!([
            {"UnitPemohon": "Bagian Umum", "Jumlah": 10},
            {"UnitPemohon": "Humas", "Jumlah": 2},
        ]),
        "Map/Folder A4" => json!([{"UnitPemohon": "Keuangan", "Jumlah": 4}]),
        _ => json!([]),
    };
    Json(json!({"units": units})).into_response()
}

async fn unit_list(State(state): State<FakeState>) -> Response {
    state.record("/api/unit-pemohon-list".into());
    if !state.options.failing_years.is_empty() {
        return failure();
    }
    Json(json!({"units": units()})).into_response()
}

async fn unit_list_year(State(state): State<FakeState>, Path(year): Path<i32>) -> Response {
    state.record(format!("/api/unit-pemohon-list/{}", year));
    if state.year_fails(year) {
        return failure();
    }
    Json(json!({"units": units()})).into_response()
}

async fn unit_item_monthly(
    State(state): State<FakeState>,
    Query(q): Query<HashMap<String, String>>,
) -> Response {
    let unit = q.get("unit").cloned().unwrap_or_default();
    let year = q.get("year").cloned().unwrap_or_default();
    state.record(format!("/api/unit-item-monthly?unit={}&year={}", unit, year));
    let items = if unit == "Humas" {
        json!([{"NamaBarang": "Kertas A4", "Total": 3, "Bulanan": [1, 2]}])
    } else {
        json!([])
    };
    Json(json!({"items": items})).into_response()
}

async fn top_requesters(
    State(state): State<FakeState>,
    Query(q): Query<HashMap<String, String>>,
) -> Response {
    state.record(format!("/api/top-requesters?years={}", q.get("years").cloned().unwrap_or_default()));
    if state.years_fail(q.get("years")) {
        return failure();
    }
    Json(json!({"topRequesters": [
        {"UnitPemohon": "Bagian Umum", "Kategori": "ATK", "TotalPermintaan": 40,
         "TotalPengeluaran": 2500000, "KelasPermintaan": "Tinggi"}
    ]}))
    .into_response()
}

async fn top_spending(
    State(state): State<FakeState>,
    Query(q): Query<HashMap<String, String>>,
) -> Response {
    if state.years_fail(q.get("years")) {
        return failure();
    }
    Json(json!({"topSpendingUnits": [
        {"UnitPemohon": "Bagian Umum", "TotalPengeluaran": 2500000}
    ]}))
    .into_response()
}

async fn scatter(
    State(state): State<FakeState>,
    Query(q): Query<HashMap<String, String>>,
) -> Response {
    if state.years_fail(q.get("years")) {
        return failure();
    }
    Json(json!({"units": [
        {"UnitPemohon": "Humas", "TotalPermintaan": 12, "TotalPengeluaran": 450000, "Segmen": "Hemat"}
    ]}))
    .into_response()
}

/// `Gudang` always fails; units without rows answer `{}`.
async fn unit_radar(
    State(state): State<FakeState>,
    Query(q): Query<HashMap<String, String>>,
) -> Response {
    let unit = q.get("unit").cloned().unwrap_or_default();
    state.record(format!("/api/unit-radar-data?unit={}", unit));
    let profile = match unit.as_str() {
        "Gudang" => return failure(),
        "Bagian Umum" => json!({
            "TotalPengeluaran": 2500000.0, "TotalPermintaan": 40,
            "RataRataHargaBarang": 62500.0, "EfisiensiPembelian": 0.8,
            "KeragamanKategori": 3, "SegmenKeuangan": "Tinggi"
        }),
        "Humas" => json!({
            "TotalPengeluaran": 450000.0, "TotalPermintaan": 12,
            "RataRataHargaBarang": 37500.0, "EfisiensiPembelian": 1.5,
            "KeragamanKategori": 2, "SegmenKeuangan": "Rendah"
        }),
        _ => json!({}),
    };
    Json(profile).into_response()
}

async fn dashboard_metrics(
    State(state): State<FakeState>,
    Query(q): Query<HashMap<String, String>>,
) -> Response {
    if state.years_fail(q.get("years")) {
        return failure();
    }
    Json(json!({
        "current_year": 2025,
        "previous_year": 2024,
        "metrics": {
            "totalRequests": {"value": 120, "changeText": "↑ 20.0% vs Tahun Lalu", "isPositive": true}
        }
    }))
    .into_response()
}

/// Monthly series: every month of year `y` holds `y - 2022` per year requested.
fn monthly(years: &[i32], months: usize) -> Vec<f64> {
    let per_month: f64 = years.iter().map(|y| (*y - 2022) as f64).sum();
    vec![per_month; months]
}

async fn monthly_demand(
    State(state): State<FakeState>,
    Query(q): Query<HashMap<String, String>>,
) -> Response {
    state.record(format!("/api/monthly-demand?years={}", q.get("years").cloned().unwrap_or_default()));
    if state.years_fail(q.get("years")) {
        return failure();
    }
    Json(json!({"monthlyDemand": monthly(&parse_years(q.get("years")), 12)})).into_response()
}

async fn monthly_expenditure(
    State(state): State<FakeState>,
    Query(q): Query<HashMap<String, String>>,
) -> Response {
    if state.years_fail(q.get("years")) {
        return failure();
    }
    // Short on purpose: the client pads to twelve months.
    Json(json!({"monthlyExpenditure": monthly(&parse_years(q.get("years")), 6)})).into_response()
}

async fn category_and_top_items(
    State(state): State<FakeState>,
    Query(q): Query<HashMap<String, String>>,
) -> Response {
    if state.years_fail(q.get("years")) {
        return failure();
    }
    Json(json!({
        "categoryValueLabels": ["ATK", "Kertas"],
        "categoryValueData": [170, 110],
        "topItems": [{"NamaBrg": "Pulpen", "TotalPermintaan": 40}]
    }))
    .into_response()
}

async fn category_demand_proportion(
    State(state): State<FakeState>,
    Query(q): Query<HashMap<String, String>>,
) -> Response {
    if state.years_fail(q.get("years")) {
        return failure();
    }
    Json(json!({"labels": ["ATK", "Kertas"], "data": [60, 40]})).into_response()
}

async fn chatbot_query(
    State(state): State<FakeState>,
    Query(q): Query<HashMap<String, String>>,
) -> Response {
    let question = q.get("question").cloned().unwrap_or_default();
    state.record(format!("/api/chatbot-query?question={}", question));
    Json(json!({"answer": format!("Aturan: {}", question)})).into_response()
}

async fn chatbot_gemini(State(state): State<FakeState>, Json(body): Json<Value>) -> Response {
    let count = body["messages"].as_array().map(Vec::len).unwrap_or(0);
    state.record(format!("/api/chatbot-gemini messages={}", count));
    Json(json!({"answer": format!("Gemini menerima {} pesan", count)})).into_response()
}

async fn chatbot_ai(State(state): State<FakeState>, Json(_body): Json<Value>) -> Response {
    state.record("/api/chatbot-ai".into());
    Json(json!({})).into_response()
}

async fn template() -> Response {
    (
        [(header::CONTENT_TYPE, "application/octet-stream")],
        b"TEMPLATE".to_vec(),
    )
        .into_response()
}

async fn export_data(Query(q): Query<HashMap<String, String>>) -> Response {
    let body = format!("EXPORT:{}", q.get("years").cloned().unwrap_or_default());
    (
        [(
            header::CONTENT_TYPE,
            "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
        )],
        body,
    )
        .into_response()
}

async fn import_data(State(state): State<FakeState>, mut multipart: Multipart) -> Response {
    while let Ok(Some(field)) = multipart.next_field().await {
        if field.name() == Some("file") {
            let name = field.file_name().unwrap_or_default().to_string();
            let bytes = field.bytes().await.unwrap_or_default();
            state.record(format!("/api/import-data file={}", name));
            let rows = String::from_utf8_lossy(&bytes).lines().count().saturating_sub(1);
            return Json(json!({"imported": rows})).into_response();
        }
    }
    (StatusCode::BAD_REQUEST, Json(json!({"error": "File tidak ditemukan"}))).into_response()
}

/// Fixture procurement backend listening on 127.0.0.1.
pub struct FakeBackend {
    pub base_url: String,
    hits: Arc<Mutex<Vec<String>>>,
}

impl FakeBackend {
    pub async fn start() -> Self {
        Self::start_with(BackendOptions::default()).await
    }

    pub async fn start_with(options: BackendOptions) -> Self {
        let hits = Arc::new(Mutex::new(Vec::new()));
        let state = FakeState {
            options,
            hits: hits.clone(),
        };

        let router = Router::new()
            .route("/api/category-value", get(category_value_combined))
            .route("/api/category-value/:year", get(category_value_year))
            .route("/api/category-unit", get(category_unit_combined))
            .route("/api/category-unit/:year", get(category_unit_year))
            .route("/api/all-items/:year", get(all_items))
            .route("/api/item-detail/:year/:name", get(item_detail))
            .route("/api/unit-pemohon-list", get(unit_list))
            .route("/api/unit-pemohon-list/:year", get(unit_list_year))
            .route("/api/unit-item-monthly", get(unit_item_monthly))
            .route("/api/top-requesters", get(top_requesters))
            .route("/api/top-spending-units", get(top_spending))
            .route("/api/unit-scatter-data", get(scatter))
            .route("/api/unit-radar-data", get(unit_radar))
            .route("/api/dashboard-metrics", get(dashboard_metrics))
            .route("/api/monthly-demand", get(monthly_demand))
            .route("/api/monthly-expenditure", get(monthly_expenditure))
            .route("/api/category-and-top-items", get(category_and_top_items))
            .route(
                "/api/category-demand-proportion",
                get(category_demand_proportion),
            )
            .route("/api/chatbot-query", get(chatbot_query))
            .route("/api/chatbot-gemini", post(chatbot_gemini))
            .route("/api/chatbot-ai", post(chatbot_ai))
            .route("/api/template", get(template))
            .route("/api/export-data", get(export_data))
            .route("/api/import-data", post(import_data))
            .with_state(state);

        let (port, _handle) = serve(router, "127.0.0.1", 0)
            .await
            .expect("Failed to start fake backend");

        Self {
            base_url: format!("http://127.0.0.1:{}", port),
            hits,
        }
    }

    pub fn api_client(&self) -> ApiClient {
        ApiClient::new(ApiConfig {
            base_url: self.base_url.clone(),
            timeout: Duration::from_secs(5),
            max_retries: 0,
        })
        .expect("Failed to build API client")
    }

    /// Requests received so far, in arrival order.
    pub fn hits(&self) -> Vec<String> {
        self.hits.lock().unwrap().clone()
    }

    pub fn hits_matching(&self, prefix: &str) -> Vec<String> {
        self.hits()
            .into_iter()
            .filter(|h| h.starts_with(prefix))
            .collect()
    }
}

/// The application wired to a fake backend.
pub struct TestClient {
    pub backend: FakeBackend,
    router: Router,
}

impl TestClient {
    pub async fn new() -> Self {
        Self::with_backend(FakeBackend::start().await)
    }

    pub async fn with_options(options: BackendOptions) -> Self {
        Self::with_backend(FakeBackend::start_with(options).await)
    }

    pub fn with_backend(backend: FakeBackend) -> Self {
        let config = Config {
            host: "127.0.0.1".into(),
            port: 0,
            api_url: backend.base_url.clone(),
            request_timeout: Duration::from_secs(5),
            ..Config::default()
        };
        let (_state, router) = build_app(config).expect("Failed to build app");

        Self { backend, router }
    }

    async fn send(&self, request: Request<Body>) -> (StatusCode, Vec<(String, String)>, Vec<u8>) {
        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let headers = response
            .headers()
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_str().unwrap_or_default().to_string()))
            .collect();
        let body = response.into_body().collect().await.unwrap().to_bytes();
        (status, headers, body.to_vec())
    }

    /// Make a GET request and return status and body.
    pub async fn get(&self, uri: &str) -> (StatusCode, String) {
        let (status, _, body) = self
            .send(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await;
        (status, String::from_utf8_lossy(&body).to_string())
    }

    /// GET returning status, headers and raw body.
    pub async fn get_raw(&self, uri: &str) -> (StatusCode, Vec<(String, String)>, Vec<u8>) {
        self.send(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
    }

    /// Get JSON from an endpoint and parse it.
    pub async fn get_json(&self, uri: &str) -> (StatusCode, Value) {
        let (status, body) = self.get(uri).await;
        let parsed = serde_json::from_str(&body).unwrap_or(Value::Null);
        (status, parsed)
    }

    pub async fn post_json(&self, uri: &str, body: &Value) -> (StatusCode, Value) {
        let (status, _, body) = self
            .send(
                Request::builder()
                    .method("POST")
                    .uri(uri)
                    .header("Content-Type", "application/json")
                    .body(Body::from(body.to_string()))
                    .unwrap(),
            )
            .await;
        (status, serde_json::from_slice(&body).unwrap_or(Value::Null))
    }

    /// POST a single file as the `file` field of a multipart form.
    pub async fn post_file(&self, uri: &str, file_name: &str, content: &str) -> (StatusCode, Value) {
        let boundary = "stark-test-boundary";
        let body = format!(
            "--{b}\r\nContent-Disposition: form-data; name=\"file\"; filename=\"{f}\"\r\n\
             Content-Type: application/octet-stream\r\n\r\n{c}\r\n--{b}--\r\n",
            b = boundary,
            f = file_name,
            c = content
        );
        let (status, _, body) = self
            .send(
                Request::builder()
                    .method("POST")
                    .uri(uri)
                    .header(
                        "Content-Type",
                        format!("multipart/form-data; boundary={}", boundary),
                    )
                    .body(Body::from(body))
                    .unwrap(),
            )
            .await;
        (status, serde_json::from_slice(&body).unwrap_or(Value::Null))
    }
}

pub fn header_value<'a>(headers: &'a [(String, String)], name: &str) -> Option<&'a str> {
    headers
        .iter()
        .find(|(k, _)| k.eq_ignore_ascii_case(name))
        .map(|(_, v)| v.as_str())
}
