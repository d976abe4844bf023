use super::*;
use crate::data::{DataProcessor, RawRecord};
use axum::body::{to_bytes, Body};
use axum::http::Request;
use serde_json::Value;
use tower::ServiceExt;

fn record(year: &str, abbr: &str, question: &str, value: &str, demographic: &str) -> RawRecord {
    RawRecord {
        yearend: Some(year.into()),
        locationabbr: Some(abbr.into()),
        locationdesc: Some(format!("{abbr} name")),
        datasource: Some("BRFSS".into()),
        question: Some(question.into()),
        datavaluetype: Some("Crude Prevalence".into()),
        datavalue: Some(value.into()),
        stratification1: Some(demographic.into()),
        stratificationcategoryid1: Some("SEX".into()),
    }
}

fn app() -> Router {
    let table = DataProcessor::shape(&[
        record("2019", "AL", "Current smoking", "10", "Male"),
        record("2019", "AL", "Current smoking", "12", "Female"),
        record("2019", "AK", "Current smoking", "", "Male"),
        record("2020", "AL", "Obesity", "33.3", "Overall"),
    ])
    .unwrap();
    router(Arc::new(AppState::new(table)))
}

async fn request(uri: &str) -> (StatusCode, String) {
    let response = app()
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, String::from_utf8(body.to_vec()).unwrap())
}

async fn get_json(uri: &str) -> Value {
    let (status, body) = request(uri).await;
    assert_eq!(status, StatusCode::OK, "{body}");
    serde_json::from_str(&body).unwrap()
}

#[tokio::test]
async fn test_index_renders_dashboard() {
    let (status, body) = request("/").await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("U.S. Chronic Disease Indicators (CDI) Dashboard"));
    assert!(body.contains("<option value=\"Current smoking\">Current smoking</option>"));
}

#[tokio::test]
async fn test_options() {
    let options = get_json("/api/options").await;
    assert_eq!(options["years"][0]["value"], "No Selection");
    assert_eq!(options["years"][1]["value"], "2019");
    assert_eq!(options["years"][2]["value"], "2020");
    assert_eq!(options["indicators"][1]["label"], "Current smoking");
    assert_eq!(options["indicators"][2]["label"], "Obesity");
    assert_eq!(options["default_value"], "No Selection");
}

#[tokio::test]
async fn test_figures_without_params_are_placeholders() {
    let figures = get_json("/api/figures").await;
    assert_eq!(figures["us_map"]["data"].as_array().unwrap().len(), 0);
    assert_eq!(figures["indicator_chart"]["data"].as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn test_figures_with_no_selection_year() {
    let figures = get_json("/api/figures?year=No%20Selection&indicator=Obesity").await;
    assert!(figures["us_map"]["data"].as_array().unwrap().is_empty());
    assert!(figures["indicator_chart"]["data"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_figures_for_selection() {
    let figures = get_json("/api/figures?year=2019&indicator=Current+smoking").await;

    let map = &figures["us_map"]["data"][0];
    assert_eq!(map["type"], "choropleth");
    // AK has an empty value and is dropped.
    assert_eq!(map["locations"].as_array().unwrap().len(), 2);

    let bar = &figures["indicator_chart"];
    assert_eq!(bar["data"][0]["type"], "bar");
    assert_eq!(bar["layout"]["title"]["text"], "Current smoking by Demographic");
}

#[tokio::test]
async fn test_figures_unknown_indicator_is_bad_request() {
    let (status, body) = request("/api/figures?year=2019&indicator=Nope").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body.contains("Nope"));
}

#[tokio::test]
async fn test_table_csv_export() {
    let response = app()
        .oneshot(
            Request::builder()
                .uri("/api/table.csv")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers()[header::CONTENT_TYPE],
        "text/csv; charset=utf-8"
    );

    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let csv = String::from_utf8(body.to_vec()).unwrap();
    assert!(csv.starts_with("yearend,locationabbr,"));
    assert_eq!(csv.lines().count(), 5);
}

#[tokio::test]
async fn test_health() {
    let health = get_json("/health").await;
    assert_eq!(health["status"], "ok");
    assert_eq!(health["rows"], 4);
    assert_eq!(health["indicators"], 2);
}
