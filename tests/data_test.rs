//! Template download, full export and spreadsheet import.

mod common;

use axum::http::StatusCode;
use common::{header_value, TestClient};

#[tokio::test]
async fn test_template_download() {
    let client = TestClient::new().await;

    let (status, headers, body) = client.get_raw("/api/data/template").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        header_value(&headers, "content-type"),
        Some("application/vnd.openxmlformats-officedocument.spreadsheetml.sheet")
    );
    assert_eq!(
        header_value(&headers, "content-disposition"),
        Some("attachment; filename=\"template_permintaan.xlsx\"")
    );
    assert_eq!(body, b"TEMPLATE");
}

#[tokio::test]
async fn test_export_forwards_selected_years() {
    let client = TestClient::new().await;

    let (status, headers, body) = client.get_raw("/api/data/export?years=2023,2024").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, b"EXPORT:2023,2024");
    assert!(header_value(&headers, "content-disposition")
        .unwrap()
        .contains("data_permintaan_2023_2024_"));
}

#[tokio::test]
async fn test_export_defaults_to_all_years() {
    let client = TestClient::new().await;

    let (status, _, body) = client.get_raw("/api/data/export").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, b"EXPORT:all");
}

#[tokio::test]
async fn test_export_rejects_unknown_year() {
    let client = TestClient::new().await;
    let (status, _) = client.get_json("/api/data/export?years=2030").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_csv_import_is_forwarded() {
    let client = TestClient::new().await;

    let content = "Tanggal,Unit,Barang,Jumlah\n2025-01-02,Humas,Pulpen,4\n2025-01-03,Keuangan,Kertas A4,2";
    let (status, body) = client
        .post_file("/api/data/import", "permintaan.CSV", content)
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["imported"], 2);
    assert_eq!(
        client.backend.hits(),
        vec!["/api/import-data file=permintaan.CSV"]
    );
}

#[tokio::test]
async fn test_unsupported_import_is_rejected_locally() {
    let client = TestClient::new().await;

    let (status, body) = client
        .post_file("/api/data/import", "laporan.pdf", "%PDF-1.4")
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains(".xlsx, .xls, atau .csv"));
    assert!(client.backend.hits().is_empty());
}
