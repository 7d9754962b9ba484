//! In-process tests for the HTTP API.
//!
//! Each test builds the router over a catalog loaded from a temporary data directory
//! and drives it with `tower::ServiceExt::oneshot`; no socket is bound.

use std::path::{Path, PathBuf};

use axum::body::{Body, Bytes};
use axum::http::{Request, StatusCode};
use http_body_util::BodyExt;
use serde_json::{json, Value};
use stockhawk::models::AlpacaSyncConfig;
use stockhawk::server::{build_router, AppState};
use stockhawk::services::AssetCatalog;
use tempfile::TempDir;
use tower::ServiceExt; // oneshot

const DAY_SECS: i64 = 86_400;
const T0: i64 = 1_704_067_200; // 2024-01-01

// ---------------------------------------------------------------------------
// Fixtures
// ---------------------------------------------------------------------------

struct Fixture {
    _data: TempDir,
    public: TempDir,
    state: AppState,
}

impl Fixture {
    fn router(&self) -> axum::Router {
        build_router(self.state.clone(), self.public.path())
    }
}

fn chart_json(symbol: &str, name: &str, closes: &[f64]) -> Value {
    let timestamps: Vec<i64> = (0..closes.len() as i64).map(|i| T0 + i * DAY_SECS).collect();
    json!({
        "chart": {
            "result": [{
                "meta": { "symbol": symbol, "longName": name, "exchangeName": "NMS", "currency": "USD" },
                "timestamp": timestamps,
                "indicators": {
                    "quote": [{ "close": closes }],
                    "adjclose": [{ "adjclose": closes }]
                }
            }],
            "error": null
        }
    })
}

fn write(dir: &Path, file: &str, value: &Value) {
    std::fs::write(dir.join(file), serde_json::to_string(value).unwrap()).unwrap();
}

fn fixture_with(sync_config: impl FnOnce(PathBuf) -> Option<AlpacaSyncConfig>) -> Fixture {
    let data = TempDir::new().unwrap();
    let long: Vec<f64> = (0..300).map(|i| 100.0 + i as f64).collect();
    write(data.path(), "AAPL.json", &chart_json("AAPL", "Apple Inc.", &long));
    write(data.path(), "MSFT.json", &chart_json("MSFT", "Microsoft Corporation", &[300.0, 310.0, 290.0]));
    write(data.path(), "TSLA.json", &chart_json("TSLA", "Tesla, Inc.", &[200.0, 180.0, 150.0, 160.0]));
    std::fs::write(data.path().join("broken.json"), "not json").unwrap();

    let public = TempDir::new().unwrap();
    std::fs::write(public.path().join("index.html"), "<h1>Stock Hawk</h1>").unwrap();

    let catalog = AssetCatalog::load(data.path()).unwrap();
    let state = AppState::new(catalog, sync_config(data.path().to_path_buf()));

    Fixture { _data: data, public, state }
}

fn fixture() -> Fixture {
    fixture_with(|_| None)
}

async fn call(router: axum::Router, req: Request<Body>) -> (StatusCode, Bytes) {
    let resp = router.oneshot(req).await.expect("oneshot failed");
    let status = resp.status();
    let body = resp.into_body().collect().await.expect("body collect failed").to_bytes();
    (status, body)
}

async fn get(router: axum::Router, uri: &str) -> (StatusCode, Value) {
    let req = Request::builder().method("GET").uri(uri).body(Body::empty()).unwrap();
    let (status, body) = call(router, req).await;
    (status, serde_json::from_slice(&body).expect("body is not valid JSON"))
}

async fn post(router: axum::Router, uri: &str) -> (StatusCode, Value) {
    let req = Request::builder().method("POST").uri(uri).body(Body::empty()).unwrap();
    let (status, body) = call(router, req).await;
    (status, serde_json::from_slice(&body).expect("body is not valid JSON"))
}

// ---------------------------------------------------------------------------
// Health, list, detail
// ---------------------------------------------------------------------------

#[tokio::test]
async fn health_reports_datasets_and_symbols() {
    let fx = fixture();
    let (status, json) = get(fx.router(), "/api/health").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["datasets"], 3);
    assert_eq!(json["symbols"], json!(["AAPL", "MSFT", "TSLA"]));
    // AAPL has 300 daily points starting 2024-01-01
    assert_eq!(json["lastUpdated"], "2024-10-26T00:00:00.000Z");
}

#[tokio::test]
async fn assets_are_flat_summaries_sorted_by_symbol() {
    let fx = fixture();
    let (status, json) = get(fx.router(), "/api/assets").await;

    assert_eq!(status, StatusCode::OK);
    let list = json.as_array().unwrap();
    assert_eq!(list.len(), 3);
    assert_eq!(list[0]["symbol"], "AAPL");
    assert_eq!(list[1]["symbol"], "MSFT");
    assert_eq!(list[1]["name"], "Microsoft Corporation");
    assert_eq!(list[1]["latestClose"], 290.0);
    assert_eq!(list[1]["sampleCount"], 3);
    assert!(list[1].get("series").is_none());
}

#[tokio::test]
async fn detail_lookup_is_case_insensitive_with_default_limit() {
    let fx = fixture();
    let (status, json) = get(fx.router(), "/api/assets/aapl").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["symbol"], "AAPL");
    assert_eq!(json["exchange"], "NMS");
    assert_eq!(json["metrics"]["sampleCount"], 300);
    let series = json["series"].as_array().unwrap();
    assert_eq!(series.len(), 240);
    assert_eq!(series[239]["close"], 399.0);
    assert!(series[0]["ts"].is_i64());
    assert!(series[0]["adjClose"].is_f64());
}

#[tokio::test]
async fn limit_parameter_rules() {
    let fx = fixture();

    let (_, json) = get(fx.router(), "/api/assets/AAPL?limit=5").await;
    assert_eq!(json["series"].as_array().unwrap().len(), 5);

    let (_, json) = get(fx.router(), "/api/assets/AAPL?limit=0").await;
    assert_eq!(json["series"].as_array().unwrap().len(), 300);

    let (_, json) = get(fx.router(), "/api/assets/AAPL?limit=-1").await;
    assert_eq!(json["series"].as_array().unwrap().len(), 300);

    let (_, json) = get(fx.router(), "/api/assets/AAPL?limit=abc").await;
    assert_eq!(json["series"].as_array().unwrap().len(), 240);

    let (_, json) = get(fx.router(), "/api/assets/AAPL?limit=").await;
    assert_eq!(json["series"].as_array().unwrap().len(), 240);

    let (_, json) = get(fx.router(), "/api/assets/AAPL?limit=3.7").await;
    assert_eq!(json["series"].as_array().unwrap().len(), 3);

    let (_, json) = get(fx.router(), "/api/assets/AAPL?limit=10abc").await;
    assert_eq!(json["series"].as_array().unwrap().len(), 10);
}

#[tokio::test]
async fn series_endpoint_returns_points() {
    let fx = fixture();
    let (status, json) = get(fx.router(), "/api/assets/tsla/series?limit=2").await;

    assert_eq!(status, StatusCode::OK);
    let points = json.as_array().unwrap();
    assert_eq!(points.len(), 2);
    assert_eq!(points[0]["close"], 150.0);
    assert_eq!(points[1]["close"], 160.0);
    assert_eq!(points[1]["date"], "2024-01-04");
}

#[tokio::test]
async fn unknown_symbol_is_404() {
    let fx = fixture();

    let (status, json) = get(fx.router(), "/api/assets/NOPE").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["message"], "Symbol not found");

    let (status, json) = get(fx.router(), "/api/assets/NOPE/series").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["message"], "Symbol not found");
}

// ---------------------------------------------------------------------------
// Insights and leaders
// ---------------------------------------------------------------------------

#[tokio::test]
async fn insights_contain_all_leaderboards() {
    let fx = fixture();
    let (status, json) = get(fx.router(), "/api/insights").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["datasets"], 3);
    for key in ["momentum", "growth", "stability", "intraday"] {
        let board = json["leaders"][key].as_array().unwrap();
        assert!(board.len() <= 3, "{key} has too many entries");
    }
    // TSLA fell 25% from its peak, the deepest drawdown
    assert_eq!(json["leaders"]["stability"][0]["symbol"], "TSLA");
    assert_eq!(json["leaders"]["stability"][0]["name"], "Tesla, Inc.");
}

#[tokio::test]
async fn leaders_endpoint_ranks_and_validates() {
    let fx = fixture();

    let (status, json) = get(fx.router(), "/api/leaders?metric=latestClose&direction=asc&limit=2").await;
    assert_eq!(status, StatusCode::OK);
    let symbols: Vec<&str> = json.as_array().unwrap().iter().map(|e| e["symbol"].as_str().unwrap()).collect();
    assert_eq!(symbols, vec!["TSLA", "MSFT"]);

    let (status, json) = get(fx.router(), "/api/leaders").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json.as_array().unwrap().len(), 3);

    let (status, _) = get(fx.router(), "/api/leaders?metric=sharpe").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = get(fx.router(), "/api/leaders?direction=sideways").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

// ---------------------------------------------------------------------------
// Sync trigger
// ---------------------------------------------------------------------------

#[tokio::test]
async fn sync_without_credentials_is_503() {
    let fx = fixture();
    let (status, json) = post(fx.router(), "/api/alpaca/sync").await;

    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert!(json["message"].as_str().unwrap().contains("not configured"));
}

#[tokio::test]
async fn concurrent_sync_is_409() {
    let fx = fixture_with(|dir| Some(AlpacaSyncConfig::new("key".into(), "secret".into(), dir)));
    let _running = fx.state.sync_lock.try_lock().unwrap();

    let (status, json) = post(fx.router(), "/api/alpaca/sync").await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(json["message"], "A sync is already running");
}

// ---------------------------------------------------------------------------
// Static files and fallback
// ---------------------------------------------------------------------------

#[tokio::test]
async fn dashboard_is_served_from_public_dir() {
    let fx = fixture();
    let req = Request::builder().method("GET").uri("/").body(Body::empty()).unwrap();
    let (status, body) = call(fx.router(), req).await;

    assert_eq!(status, StatusCode::OK);
    assert!(String::from_utf8_lossy(&body).contains("Stock Hawk"));
}

#[tokio::test]
async fn unknown_route_is_404() {
    let fx = fixture();

    let (status, json) = get(fx.router(), "/api/unknown").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["message"], "Route not found");

    let (status, json) = post(fx.router(), "/does/not/exist").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["message"], "Route not found");
}

#[tokio::test]
async fn wrong_method_on_known_path_is_404() {
    let fx = fixture();

    let (status, json) = post(fx.router(), "/api/assets").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["message"], "Route not found");

    let (status, json) = get(fx.router(), "/api/alpaca/sync").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["message"], "Route not found");

    let req = Request::builder().method("DELETE").uri("/api/health").body(Body::empty()).unwrap();
    let (status, body) = call(fx.router(), req).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let json: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(json["message"], "Route not found");
}
