// Integration tests: HTTP presentation endpoints

mod common;

use axum_test::TestServer;
use common::SteadySource;
use hostwatch::engine::{Engine, EngineSettings, EngineState};
use hostwatch::models::EngineView;
use hostwatch::routes;
use serde_json::json;
use std::sync::Arc;
use std::sync::atomic::AtomicUsize;
use tokio::sync::broadcast;

fn test_app() -> (axum::Router, Engine) {
    let engine = Engine::new(EngineState::new(EngineSettings::default()).unwrap());
    let (tx, _) = broadcast::channel::<EngineView>(8);
    let app = routes::app(engine.clone(), tx, Arc::new(AtomicUsize::new(0)));
    (app, engine)
}

fn test_server() -> (TestServer, Engine) {
    let (app, engine) = test_app();
    (TestServer::new(app).unwrap(), engine)
}

#[tokio::test]
async fn test_root_endpoint() {
    let (server, _) = test_server();
    let response = server.get("/").await;
    response.assert_status_ok();
    response.assert_text("hostwatch: host metrics sampler");
}

#[tokio::test]
async fn test_version_endpoint() {
    let (server, _) = test_server();
    let response = server.get("/version").await;
    response.assert_status_ok();
    let json: serde_json::Value = response.json();
    assert_eq!(
        json.get("name").and_then(|v| v.as_str()),
        Some("hostwatch")
    );
    assert!(json.get("version").and_then(|v| v.as_str()).is_some());
}

#[tokio::test]
async fn test_state_reflects_ticks() {
    let (server, engine) = test_server();
    let source = SteadySource::new();
    engine.tick_blocking(&source).unwrap();
    engine.tick_blocking(&source).unwrap();

    let response = server.get("/api/state").await;
    response.assert_status_ok();
    let view: EngineView = response.json();
    assert_eq!(view.history.len(), 2);
    assert!(view.current.is_some());
    assert!(view.summary.is_some());
}

#[tokio::test]
async fn test_pause_and_resume() {
    let (server, engine) = test_server();
    let view: EngineView = server.post("/api/pause").await.json();
    assert!(view.paused);
    assert!(engine.is_paused().unwrap());

    let view: EngineView = server.post("/api/resume").await.json();
    assert!(!view.paused);
}

#[tokio::test]
async fn test_interval_accepts_numbers_and_strings() {
    let (server, _) = test_server();
    let response = server.put("/api/interval").json(&json!({ "seconds": 3 })).await;
    response.assert_status_ok();
    let view: EngineView = response.json();
    assert_eq!(view.interval_ms, 3_000);

    let view: EngineView = server
        .put("/api/interval")
        .json(&json!({ "seconds": "1.5" }))
        .await
        .json();
    assert_eq!(view.interval_ms, 1_500);
}

#[tokio::test]
async fn test_interval_below_bound_is_rejected() {
    let (server, engine) = test_server();
    let response = server
        .put("/api/interval")
        .json(&json!({ "seconds": 0.5 }))
        .expect_failure()
        .await;
    response.assert_status_bad_request();
    let body: serde_json::Value = response.json();
    assert_eq!(body["kind"], "invalidConfiguration");
    assert_eq!(engine.view().unwrap().interval_ms, 2_000);
}

#[tokio::test]
async fn test_threshold_update_and_rejection() {
    let (server, engine) = test_server();
    let view: EngineView = server
        .put("/api/thresholds/cpu")
        .json(&json!({ "value": 90 }))
        .await
        .json();
    assert_eq!(view.thresholds.get(hostwatch::models::Metric::Cpu), 90.0);

    let response = server
        .put("/api/thresholds/cpu")
        .json(&json!({ "value": "abc" }))
        .expect_failure()
        .await;
    response.assert_status_bad_request();
    let view = engine.view().unwrap();
    assert_eq!(view.thresholds.get(hostwatch::models::Metric::Cpu), 90.0);
    assert!(view.last_config_error.is_some());

    server
        .put("/api/thresholds/gpu")
        .json(&json!({ "value": 50 }))
        .expect_failure()
        .await
        .assert_status_bad_request();
}

#[tokio::test]
async fn test_history_capacity_and_network_series() {
    let (server, _) = test_server();
    let view: EngineView = server
        .put("/api/history-capacity")
        .json(&json!({ "capacity": 60 }))
        .await
        .json();
    assert_eq!(view.history_capacity, 60);

    server
        .put("/api/history-capacity")
        .json(&json!({ "capacity": -1 }))
        .expect_failure()
        .await
        .assert_status_bad_request();

    let view: EngineView = server
        .put("/api/network-series")
        .json(&json!({ "sent": false, "recv": true }))
        .await
        .json();
    assert!(!view.show_network_sent);
    assert!(view.show_network_recv);
}

#[tokio::test]
async fn test_rejected_names_and_capacities_surface_in_state() {
    let (server, _) = test_server();
    server
        .put("/api/thresholds/gpu")
        .json(&json!({ "value": 5 }))
        .expect_failure()
        .await
        .assert_status_bad_request();
    let state: serde_json::Value = server.get("/api/state").await.json();
    assert!(state["lastConfigError"].is_string());

    server
        .put("/api/thresholds/cpu")
        .json(&json!({ "value": 85 }))
        .await
        .assert_status_ok();
    let state: serde_json::Value = server.get("/api/state").await.json();
    assert!(state["lastConfigError"].is_null());

    server
        .put("/api/history-capacity")
        .json(&json!({ "capacity": -3 }))
        .expect_failure()
        .await
        .assert_status_bad_request();
    let state: serde_json::Value = server.get("/api/state").await.json();
    assert!(state["lastConfigError"].is_string());
    assert_eq!(state["historyCapacity"], 15);
}

#[tokio::test]
async fn test_alert_log_endpoints() {
    let (server, engine) = test_server();
    engine
        .set_threshold(hostwatch::models::Metric::Cpu, 1.0)
        .unwrap();
    let source = SteadySource::new();
    engine.tick_blocking(&source).unwrap();
    engine.tick_blocking(&source).unwrap();

    let alerts: serde_json::Value = server.get("/api/alerts").await.json();
    assert_eq!(alerts.as_array().unwrap().len(), 2);

    let view: EngineView = server.delete("/api/alerts/active").await.json();
    assert!(view.active_alerts.is_empty());
    assert_eq!(view.alert_total, 2);
}
