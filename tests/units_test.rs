//! Unit analysis endpoints.

mod common;

use axum::http::StatusCode;
use common::{header_value, BackendOptions, TestClient};
use serde_json::Value;

fn unit_names(body: &Value) -> Vec<String> {
    body["page"]["rows"]
        .as_array()
        .unwrap()
        .iter()
        .map(|r| r["unit_name"].as_str().unwrap().to_string())
        .collect()
}

#[tokio::test]
async fn test_unit_table_sorted_by_name() {
    let client = TestClient::new().await;

    let (status, body) = client.get_json("/api/units").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(unit_names(&body), vec!["Bagian Umum", "Humas", "Keuangan"]);
    assert_eq!(body["page"]["rows"][0]["spend_segment"], "Boros");
    assert_eq!(body["page"]["rows"][2]["demand_label"], "Tidak Diketahui");
    assert_eq!(client.backend.hits(), vec!["/api/unit-pemohon-list"]);
}

#[tokio::test]
async fn test_unit_table_for_one_year() {
    let client = TestClient::new().await;

    let (status, body) = client.get_json("/api/units?year=2024").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["year"], 2024);
    assert_eq!(client.backend.hits(), vec!["/api/unit-pemohon-list/2024"]);
}

#[tokio::test]
async fn test_unit_search_matches_name_only() {
    let client = TestClient::new().await;

    let (_, body) = client.get_json("/api/units?search=UMUM").await;
    assert_eq!(unit_names(&body), vec!["Bagian Umum"]);

    let (_, body) = client.get_json("/api/units?search=boros").await;
    assert!(unit_names(&body).is_empty());
    assert_eq!(body["message"], "Tidak ada data");
}

#[tokio::test]
async fn test_failed_unit_list_shows_empty_table() {
    let client = TestClient::with_options(BackendOptions {
        failing_years: vec![2023],
        ..Default::default()
    })
    .await;

    let (status, body) = client.get_json("/api/units").await;
    assert_eq!(status, StatusCode::OK);
    assert!(unit_names(&body).is_empty());
    assert_eq!(body["message"], "Tidak ada data");
}

#[tokio::test]
async fn test_unit_overview() {
    let client = TestClient::new().await;

    let (status, body) = client.get_json("/api/units/overview?years=2024,2025").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["top_requesters"][0]["unit_name"], "Bagian Umum");
    assert_eq!(body["top_spending_units"][0]["total_spend"], 2500000.0);
    assert_eq!(body["scatter"][0]["spend_segment"], "Hemat");
    assert_eq!(body["scatter"][0]["spend_display"], "Rp 450.000");
    assert_eq!(
        client.backend.hits_matching("/api/top-requesters"),
        vec!["/api/top-requesters?years=2024,2025"]
    );
}

#[tokio::test]
async fn test_unit_overview_failure_empties_every_chart() {
    let client = TestClient::with_options(BackendOptions {
        failing_years: vec![2023],
        ..Default::default()
    })
    .await;

    let (status, body) = client.get_json("/api/units/overview?years=all").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["top_requesters"], serde_json::json!([]));
    assert_eq!(body["top_spending_units"], serde_json::json!([]));
    assert_eq!(body["scatter"], serde_json::json!([]));
}

#[tokio::test]
async fn test_unit_detail_uses_latest_selected_year() {
    let client = TestClient::new().await;

    let (status, body) = client
        .get_json("/api/units/detail?unit=Humas&years=2023,2024")
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["year"], 2024);
    assert_eq!(body["items"][0]["item_name"], "Kertas A4");
    assert_eq!(body["items"][0]["monthly"].as_array().unwrap().len(), 12);
    assert_eq!(
        client.backend.hits(),
        vec!["/api/unit-item-monthly?unit=Humas&year=2024"]
    );
}

#[tokio::test]
async fn test_unit_detail_without_items() {
    let client = TestClient::new().await;

    let (status, body) = client.get_json("/api/units/detail?unit=Keuangan").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["year"], 2025);
    assert_eq!(
        body["empty_message"],
        "Tidak ada data permintaan barang untuk unit ini di tahun 2025."
    );
}

#[tokio::test]
async fn test_unit_detail_requires_a_unit() {
    let client = TestClient::new().await;
    let (status, _) = client.get_json("/api/units/detail?unit=%20").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_unit_csv_export() {
    let client = TestClient::new().await;

    let (status, headers, body) = client.get_raw("/api/units/export.csv?search=hu").await;
    assert_eq!(status, StatusCode::OK);
    assert!(header_value(&headers, "content-disposition")
        .unwrap()
        .contains("unit_pemohon.csv"));

    let text = String::from_utf8(body).unwrap();
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(
        lines,
        vec![
            "Unit Pemohon,Total Permintaan,Total Pengeluaran,Segmen,Label Permintaan",
            "Humas,12,450000,Hemat,Rendah",
        ]
    );
}

#[tokio::test]
async fn test_radar_compares_two_units() {
    let client = TestClient::new().await;

    let (status, body) = client
        .get_json("/api/units/radar?unit=Humas&unit=Keuangan")
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["units"]["first"], "Humas");
    assert_eq!(body["units"]["second"], "Keuangan");
    assert_eq!(body["first"]["total_requested"], 12);
    assert_eq!(body["first"]["scores"][3]["axis"], "Efisiensi Pembelian");
    assert_eq!(body["first"]["scores"][3]["score"], 10.0);
    // The backend has no rows for Keuangan.
    assert!(body["second"].is_null());

    let mut hits = client.backend.hits_matching("/api/unit-radar-data");
    hits.sort();
    assert_eq!(
        hits,
        vec![
            "/api/unit-radar-data?unit=Humas",
            "/api/unit-radar-data?unit=Keuangan"
        ]
    );
}

#[tokio::test]
async fn test_radar_defaults_to_first_two_units() {
    let client = TestClient::new().await;

    let (status, body) = client.get_json("/api/units/radar").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["units"]["first"], "Bagian Umum");
    assert_eq!(body["units"]["second"], "Humas");
    assert_eq!(body["first"]["finance_segment"], "Tinggi");
    assert_eq!(body["second"]["unit_name"], "Humas");
}

#[tokio::test]
async fn test_radar_failed_unit_has_no_profile() {
    let client = TestClient::new().await;

    let (status, body) = client
        .get_json("/api/units/radar?unit=Gudang&unit=Humas")
        .await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["first"].is_null());
    assert_eq!(body["second"]["unit_name"], "Humas");
}

#[tokio::test]
async fn test_radar_rejects_more_than_two_units() {
    let client = TestClient::new().await;
    let (status, _) = client
        .get_json("/api/units/radar?unit=Humas&unit=Keuangan&unit=Bagian%20Umum")
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(client.backend.hits().is_empty());
}
