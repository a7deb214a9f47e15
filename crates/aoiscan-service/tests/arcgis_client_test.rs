//! ArcGIS client tests against a local mock REST endpoint

use aoiscan_core::error::AoiscanError;
use aoiscan_core::models::{Envelope, LayerQuery, SearchArea};
use aoiscan_core::ports::FeatureService;
use aoiscan_service::{ArcGisConfig, ArcGisFeatureService};
use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Form, Json, Router};
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

#[derive(Default)]
struct MockState {
    queries: Mutex<Vec<HashMap<String, String>>>,
    flaky_calls: AtomicUsize,
}

fn wells_page(ids: &[i64], exceeded: bool) -> Value {
    let features: Vec<Value> = ids
        .iter()
        .map(|id| json!({"attributes": {"WELL_ID": id, "STATUS": "ACTIVE"}}))
        .collect();
    json!({"features": features, "exceededTransferLimit": exceeded})
}

async fn wells_info() -> Json<Value> {
    Json(json!({"name": "Oil Wells", "geometryType": "esriGeometryPoint", "maxRecordCount": 2}))
}

async fn wells_query(
    State(state): State<Arc<MockState>>,
    Form(params): Form<HashMap<String, String>>,
) -> Json<Value> {
    let offset = params.get("resultOffset").cloned();
    state.queries.lock().unwrap().push(params);
    match offset.as_deref() {
        None => Json(wells_page(&[1, 2], true)),
        Some("2") => Json(wells_page(&[3], false)),
        Some(_) => Json(wells_page(&[], false)),
    }
}

async fn broken_info() -> Json<Value> {
    Json(json!({"error": {"code": 499, "message": "Token Required", "details": []}}))
}

async fn flaky_info() -> Json<Value> {
    Json(json!({"name": "Flaky"}))
}

async fn flaky_query(State(state): State<Arc<MockState>>) -> (StatusCode, Json<Value>) {
    if state.flaky_calls.fetch_add(1, Ordering::SeqCst) == 0 {
        (StatusCode::SERVICE_UNAVAILABLE, Json(json!({})))
    } else {
        (StatusCode::OK, Json(wells_page(&[7], false)))
    }
}

async fn spawn_mock() -> (String, Arc<MockState>) {
    let state = Arc::new(MockState::default());
    let app = Router::new()
        .route("/rest/services/Wells/FeatureServer/0", get(wells_info))
        .route("/rest/services/Wells/FeatureServer/0/query", post(wells_query))
        .route("/rest/services/Broken/FeatureServer/0", get(broken_info))
        .route("/rest/services/Flaky/FeatureServer/0", get(flaky_info))
        .route("/rest/services/Flaky/FeatureServer/0/query", post(flaky_query))
        .with_state(state.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    (format!("http://{}/rest/services", addr), state)
}

fn client(max_features: usize) -> ArcGisFeatureService {
    ArcGisFeatureService::new(ArcGisConfig {
        request_timeout: Duration::from_secs(5),
        max_retries: 2,
        max_features,
        initial_backoff: Duration::from_millis(10),
    })
    .unwrap()
}

#[tokio::test]
async fn test_load_layer_reads_title() {
    let (base, _) = spawn_mock().await;
    let layer = client(100).load_layer(&format!("{}/Wells/FeatureServer/0", base)).await.unwrap();

    assert_eq!(layer.title.as_deref(), Some("Oil Wells"));
    assert_eq!(layer.geometry_type.as_deref(), Some("esriGeometryPoint"));
    assert_eq!(layer.max_record_count, Some(2));
}

#[tokio::test]
async fn test_query_follows_pages() {
    let (base, state) = spawn_mock().await;
    let service = client(100);
    let layer = service.load_layer(&format!("{}/Wells/FeatureServer/0", base)).await.unwrap();

    let area = SearchArea::Envelope(Envelope::new(-100.0, 30.0, -90.0, 40.0));
    let set = service.query_intersecting(&layer, &LayerQuery::intersecting(Some(area))).await.unwrap();

    let ids: Vec<i64> = set.features.iter().map(|f| f["WELL_ID"].as_i64().unwrap()).collect();
    assert_eq!(ids, vec![1, 2, 3]);
    assert_eq!(set.title.as_deref(), Some("Oil Wells"));

    let queries = state.queries.lock().unwrap();
    assert_eq!(queries.len(), 2);
    assert_eq!(queries[0]["spatialRel"], "esriSpatialRelIntersects");
    assert_eq!(queries[0]["geometryType"], "esriGeometryEnvelope");
    assert_eq!(queries[0]["returnGeometry"], "false");
    assert_eq!(queries[1]["resultOffset"], "2");
    assert_eq!(queries[1]["resultRecordCount"], "2");
}

#[tokio::test]
async fn test_query_stops_at_max_features() {
    let (base, state) = spawn_mock().await;
    let service = client(2);
    let layer = service.load_layer(&format!("{}/Wells/FeatureServer/0", base)).await.unwrap();

    let set = service.query_intersecting(&layer, &LayerQuery::default()).await.unwrap();
    assert_eq!(set.features.len(), 2);
    assert_eq!(state.queries.lock().unwrap().len(), 1);
    assert!(!state.queries.lock().unwrap()[0].contains_key("geometry"));
}

#[tokio::test]
async fn test_error_body_is_load_failure() {
    let (base, _) = spawn_mock().await;
    let err = client(100).load_layer(&format!("{}/Broken/FeatureServer/0", base)).await.unwrap_err();

    match err {
        AoiscanError::LayerLoad { reason, .. } => assert!(reason.contains("Token Required")),
        other => panic!("Expected LayerLoad, got {:?}", other),
    }
}

#[tokio::test]
async fn test_not_found_is_not_retried() {
    let (base, _) = spawn_mock().await;
    let err = client(100).load_layer(&format!("{}/Missing/FeatureServer/0", base)).await.unwrap_err();

    match err {
        AoiscanError::LayerLoad { reason, .. } => assert!(reason.contains("404")),
        other => panic!("Expected LayerLoad, got {:?}", other),
    }
}

#[tokio::test]
async fn test_server_error_is_retried() {
    let (base, state) = spawn_mock().await;
    let service = client(100);
    let layer = service.load_layer(&format!("{}/Flaky/FeatureServer/0", base)).await.unwrap();

    let set = service.query_intersecting(&layer, &LayerQuery::default()).await.unwrap();
    assert_eq!(set.features.len(), 1);
    assert_eq!(state.flaky_calls.load(Ordering::SeqCst), 2);
}
