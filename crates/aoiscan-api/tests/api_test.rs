//! Router tests driven through `tower::ServiceExt::oneshot`

use std::sync::Arc;
use std::time::Duration;

use aoiscan_analysis::RunOptions;
use aoiscan_api::{create_router, AppState};
use aoiscan_core::config::LayeredConfig;
use aoiscan_core::models::{AttributeMap, Geometry, Viewport};
use aoiscan_service::{MemoryFeature, MemoryFeatureService, MemoryLayer};
use axum::body::{to_bytes, Body};
use axum::http::{header, Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use tower::ServiceExt;

fn well(id: i64, x: f64, y: f64) -> MemoryFeature {
    let mut attrs = AttributeMap::new();
    attrs.insert("WELL_ID".to_string(), json!(id));
    attrs.insert("NAME".to_string(), json!(format!("Well \"{}\"", id)));
    MemoryFeature::new(Some(Geometry::point(x, y)), attrs)
}

fn test_state() -> Arc<AppState> {
    let service = MemoryFeatureService::new();
    service.register("mem://wells", MemoryLayer::new("Wells", vec![well(1, -95.0, 35.0), well(2, 10.0, 10.0)]));
    service.register("mem://empty", MemoryLayer::new("Empty", vec![]));
    service.register(
        "mem://slow",
        MemoryLayer::new("Slow", vec![well(3, -95.0, 35.0)]).with_latency(Duration::from_millis(300)),
    );

    let options = RunOptions {
        default_layers: vec!["mem://wells".to_string()],
        ..Default::default()
    };
    Arc::new(AppState::new(Arc::new(service), options, Viewport::default()))
}

fn app(state: Arc<AppState>) -> Router {
    create_router(state)
}

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

async fn body_text(response: axum::response::Response) -> String {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn post_json(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn envelope_body(layers: &[&str]) -> Value {
    json!({
        "region": {"kind": "envelope", "envelope": {"xmin": -100.0, "ymin": 30.0, "xmax": -90.0, "ymax": 40.0}},
        "layers": layers,
    })
}

#[tokio::test]
async fn test_health() {
    let response = app(test_state()).oneshot(get("/health")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["status"], "ok");
    assert_eq!(body["service"], "aoiscan-api");
}

#[tokio::test]
async fn test_config_resolves_query() {
    let uri = "/api/v1/config?title=Permian%20Wells&layers=https%3A%2F%2Fh%2Farcgis%2Frest%2Fservices%2FW%2FFeatureServer%2F0,not-a-layer&extent=-103,32,7";
    let response = app(test_state()).oneshot(get(uri)).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["reportTitle"], "Permian Wells");
    assert_eq!(body["basemap"], "satellite");
    assert_eq!(body["extent"], json!([-103.0, 32.0, 7.0]));
    assert_eq!(body["embedded"], true);
    assert_eq!(body["layerStatus"][0]["valid"], true);
    assert_eq!(body["layerStatus"][1]["url"], "not-a-layer");
    assert_eq!(body["layerStatus"][1]["valid"], false);
}

#[tokio::test]
async fn test_config_defaults() {
    let response = app(test_state()).oneshot(get("/api/v1/config")).await.unwrap();
    let body = body_json(response).await;

    assert_eq!(body["reportTitle"], "Area Analysis Tool");
    assert_eq!(body["extent"], json!([-98.0, 39.5, 4.0]));
    assert_eq!(body["layers"], json!([]));
    assert_eq!(body["embedded"], false);
}

#[tokio::test]
async fn test_analyze_then_results() {
    let state = test_state();

    let response = app(state.clone())
        .oneshot(post_json("/api/v1/analyze", envelope_body(&["mem://wells", "mem://missing", "mem://empty"])))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["totalLayers"], 3);
    assert_eq!(body["totalFeatures"], 1);
    assert_eq!(body["results"][0]["layerTitle"], "Wells");
    assert_eq!(body["results"][0]["featureCount"], 1);
    assert_eq!(body["results"][1]["layerTitle"], "Empty");
    assert_eq!(body["failedLayers"][0]["layerUrl"], "mem://missing");
    assert_eq!(body["failedLayers"][0]["stage"], "load");

    let response = app(state).oneshot(get("/api/v1/results")).await.unwrap();
    let results = body_json(response).await;
    assert_eq!(results.as_array().unwrap().len(), 2);
    assert_eq!(results[0]["features"][0]["WELL_ID"], 1);
}

#[tokio::test]
async fn test_analyze_uses_default_layers() {
    let response = app(test_state())
        .oneshot(post_json("/api/v1/analyze", json!({"useCurrentView": true, "extent": [-95.0, 35.0, 6.0]})))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["results"][0]["layerUrl"], "mem://wells");
    assert_eq!(body["totalFeatures"], 1);
}

#[tokio::test]
async fn test_analyze_without_view_or_layers_is_rejected() {
    let state = test_state();
    let response = app(state.clone()).oneshot(post_json("/api/v1/analyze", json!({}))).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = body_json(response).await;
    assert_eq!(body["error"], "No map view available and no layers configured for analysis");
    assert!(!state.is_running());
}

#[tokio::test]
async fn test_analyze_rejects_invalid_region() {
    let body = json!({
        "region": {"kind": "envelope", "envelope": {"xmin": 10.0, "ymin": 0.0, "xmax": 0.0, "ymax": 1.0}},
        "layers": ["mem://wells"],
    });
    let response = app(test_state()).oneshot(post_json("/api/v1/analyze", body)).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_second_run_conflicts() {
    let state = test_state();

    let first = tokio::spawn(app(state.clone()).oneshot(post_json("/api/v1/analyze", envelope_body(&["mem://slow"]))));
    tokio::time::sleep(Duration::from_millis(50)).await;
    assert!(state.is_running());

    let second = app(state.clone())
        .oneshot(post_json("/api/v1/analyze", envelope_body(&["mem://wells"])))
        .await
        .unwrap();
    assert_eq!(second.status(), StatusCode::CONFLICT);

    let first = first.await.unwrap().unwrap();
    assert_eq!(first.status(), StatusCode::OK);
    assert!(!state.is_running());
    assert_eq!(state.results()[0].layer_title(), "Slow");
}

#[tokio::test]
async fn test_export_without_results_is_not_found() {
    let response = app(test_state()).oneshot(get("/api/v1/export/csv")).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(body_json(response).await["error"], "No Data");
}

#[tokio::test]
async fn test_export_formats() {
    let state = test_state();
    app(state.clone())
        .oneshot(post_json("/api/v1/analyze", envelope_body(&["mem://wells"])))
        .await
        .unwrap();

    let response = app(state.clone()).oneshot(get("/api/v1/export/csv?title=Permian%20Wells")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()[header::CONTENT_TYPE], "text/csv");
    assert_eq!(
        response.headers()[header::CONTENT_DISPOSITION],
        "attachment; filename=\"Permian_Wells_analysis.csv\""
    );
    let csv = body_text(response).await;
    assert!(csv.starts_with("Layer,Feature Count,Layer URL\n"));
    assert!(csv.contains("\"Well \"\"1\"\"\""));

    let response = app(state.clone()).oneshot(get("/api/v1/export/json")).await.unwrap();
    assert_eq!(response.headers()[header::CONTENT_TYPE], "application/json");
    let report = body_json(response).await;
    assert_eq!(report["reportTitle"], "Area Analysis Tool");
    assert_eq!(report["summary"]["totalFeatures"], 1);

    let response = app(state).oneshot(get("/api/v1/export/pdf")).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_export_title_cannot_shape_the_filename() {
    let state = test_state();
    app(state.clone())
        .oneshot(post_json("/api/v1/analyze", envelope_body(&["mem://wells"])))
        .await
        .unwrap();

    let response = app(state).oneshot(get("/api/v1/export/text?title=..%2FWells%0A%22x%22")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers()[header::CONTENT_DISPOSITION],
        "attachment; filename=\"___Wells_x__analysis.txt\""
    );
    assert!(body_text(response).await.starts_with("../Wells\n\"x\""));
}

#[tokio::test]
async fn test_local_files_are_not_layers() {
    let dir = tempfile::TempDir::new().unwrap();
    let path = dir.path().join("server_secrets.json");
    std::fs::write(
        &path,
        r#"{"type": "FeatureCollection", "features": [
            {"type": "Feature", "geometry": null, "properties": {"db_password": "hunter2"}}
        ]}"#,
    )
    .unwrap();
    let plain = path.to_string_lossy().to_string();
    let file_url = format!("file://{}", plain);

    let state = Arc::new(AppState::from_config(&LayeredConfig::with_defaults()).unwrap());
    let response = app(state.clone())
        .oneshot(post_json("/api/v1/analyze", json!({"layers": [plain.clone(), file_url]})))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["totalLayers"], 2);
    assert_eq!(body["totalFeatures"], 0);
    assert_eq!(body["results"], json!([]));
    assert_eq!(body["failedLayers"][0]["layerUrl"], plain);
    assert_eq!(body["failedLayers"][0]["stage"], "load");
    assert_eq!(body["failedLayers"][1]["stage"], "load");

    let response = app(state).oneshot(get("/api/v1/results")).await.unwrap();
    let results = body_text(response).await;
    assert_eq!(results, "[]");
}

#[tokio::test]
async fn test_embed_snippet() {
    let response = app(test_state())
        .oneshot(get("/api/v1/embed?url=https%3A%2F%2Fmaps.example.com%2Ftool%3Ftitle%3DA%26extent%3D1%2C2%2C3&height=400px"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let html = body_text(response).await;
    assert!(html.starts_with("<iframe"));
    assert!(html.contains("src=\"https://maps.example.com/tool?title=A&amp;extent=1,2,3\""));
    assert!(html.contains("width=\"100%\""));
    assert!(html.contains("height=\"400px\""));

    let response = app(test_state()).oneshot(get("/api/v1/embed")).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}
