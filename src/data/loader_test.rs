use super::*;
use axum::extract::Query;
use axum::http::{HeaderMap, StatusCode};
use axum::routing::get;
use axum::{Json, Router};
use serde_json::{json, Value};
use std::collections::HashMap;
use std::io::Write;
use std::net::SocketAddr;
use std::time::Duration;
use url::Url;

async fn serve(app: Router) -> SocketAddr {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    addr
}

fn remote(addr: SocketAddr) -> RemoteSource {
    RemoteSource {
        resource_url: Url::parse(&format!("http://{addr}/resource/g4ie-h725.json")).unwrap(),
        app_token: "token-123".to_string(),
        row_limit: 1_500_000,
        timeout: Duration::from_secs(5),
    }
}

async fn resource(
    headers: HeaderMap,
    Query(params): Query<HashMap<String, String>>,
) -> Result<Json<Value>, StatusCode> {
    let token = headers.get(APP_TOKEN_HEADER).and_then(|v| v.to_str().ok());
    if token != Some("token-123") {
        return Err(StatusCode::FORBIDDEN);
    }
    if params.get("$limit").map(String::as_str) != Some("1500000") {
        return Err(StatusCode::BAD_REQUEST);
    }
    Ok(Json(json!([
        {
            "yearend": "2019",
            "locationabbr": "AL",
            "locationdesc": "Alabama",
            "datasource": "BRFSS",
            "question": "Smoking",
            "datavaluetype": "Crude Prevalence",
            "datavalue": "10",
            "stratification1": "Male",
            "stratificationcategoryid1": "SEX",
            "topic": "Tobacco"
        }
    ])))
}

#[tokio::test]
async fn test_fetch_sends_limit_and_token() {
    let addr = serve(Router::new().route("/resource/g4ie-h725.json", get(resource))).await;

    let records = DataLoader::fetch(&remote(addr)).await.unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].locationabbr.as_deref(), Some("AL"));
    assert_eq!(records[0].question.as_deref(), Some("Smoking"));
}

#[tokio::test]
async fn test_fetch_fails_on_error_status() {
    let addr = serve(Router::new().route("/resource/g4ie-h725.json", get(resource))).await;

    let mut source = remote(addr);
    source.app_token = "wrong".to_string();

    let err = DataLoader::fetch(&source).await.unwrap_err();
    match err {
        LoaderError::Request(e) => assert_eq!(e.status().map(|s| s.as_u16()), Some(403)),
        other => panic!("expected request error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_fetch_fails_on_malformed_payload() {
    let app = Router::new().route(
        "/resource/g4ie-h725.json",
        get(|| async { Json(json!({"error": true})) }),
    );
    let addr = serve(app).await;

    assert!(DataLoader::fetch(&remote(addr)).await.is_err());
}

#[tokio::test]
async fn test_load_dispatches_on_source() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(file, r#"[{{"yearend": "2020", "question": "Obesity"}}]"#).unwrap();

    let source = DataSource::File(file.path().to_path_buf());
    let records = DataLoader::load(&source).await.unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].yearend.as_deref(), Some("2020"));
}

#[test]
fn test_load_file_missing_path() {
    let err = DataLoader::load_file(Path::new("/nonexistent/records.json")).unwrap_err();
    assert!(matches!(err, LoaderError::Io { .. }));
}

#[test]
fn test_load_file_rejects_invalid_json() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(file, "not json").unwrap();

    let err = DataLoader::load_file(file.path()).unwrap_err();
    assert!(matches!(err, LoaderError::Json(_)));
}

#[test]
fn test_demo_records_file_loads_and_shapes() {
    let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("demos/sample_records.json");
    let records = DataLoader::load_file(&path).unwrap();
    assert_eq!(records.len(), 7);

    let table = crate::data::DataProcessor::shape(&records).unwrap();
    assert_eq!(table.height(), 7);
    assert_eq!(
        table.indicators(),
        [
            "Current cigarette smoking among adults".to_string(),
            "Obesity among adults".to_string(),
        ]
    );
    assert_eq!(table.years(), ["2019", "2020"]);

    // Texas reports "~" for 2020, so only California remains.
    let observations = table.select("2020", "Obesity among adults").unwrap();
    assert_eq!(observations.len(), 1);
    assert_eq!(observations[0].location_abbr, "CA");
    assert_eq!(observations[0].value, 27.1);
}
