//! Integration tests for the Observer API endpoints.
//!
//! Tests use Axum's `Router` directly via `tower::ServiceExt` without
//! starting a TCP server.

#![allow(clippy::unwrap_used)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use futures::StreamExt;
use hunters_core::{SimulationConfig, StartingIds, World, create_starting_world};
use hunters_observer::router::build_router;
use hunters_observer::state::AppState;
use serde_json::{Value, json};
use tower::ServiceExt;

fn make_test_state() -> (Arc<AppState>, StartingIds) {
    let mut config = SimulationConfig::default();
    config.world.seed = Some(7);
    let (seed, ids) = create_starting_world(config.map());
    let world = Arc::new(World::new(seed, config));
    (Arc::new(AppState::new(world)), ids)
}

async fn body_to_json(body: Body) -> Value {
    let bytes = axum::body::to_bytes(body, usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

fn post_json(uri: &str, body: &Value) -> Request<Body> {
    Request::post(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn send(state: &Arc<AppState>, request: Request<Body>) -> (StatusCode, Value) {
    let response = build_router(Arc::clone(state)).oneshot(request).await.unwrap();
    let status = response.status();
    (status, body_to_json(response.into_body()).await)
}

fn scout_body(ids: &StartingIds, x: i32, y: i32) -> Value {
    json!({ "type": "SCOUT", "hunterId": ids.edric, "targetCell": { "x": x, "y": y } })
}

fn capture_body(ids: &StartingIds) -> Value {
    json!({ "type": "CAPTURE", "hunterId": ids.mara, "monsterId": ids.wraith })
}

#[tokio::test]
async fn test_get_state() {
    let (state, _) = make_test_state();
    let (status, json) = send(&state, Request::get("/state").body(Body::empty()).unwrap()).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["time"]["version"], 0);
    assert_eq!(json["time"]["totalMinutes"], 0);
    assert_eq!(json["time"]["day"], 1);
    assert_eq!(json["map"]["width"], 6);
    assert_eq!(json["hunters"].as_array().unwrap().len(), 2);
    assert_eq!(json["monsters"][0]["type"], "WRAITH");
    assert_eq!(json["presences"].as_array().unwrap().len(), 0);
    assert_eq!(json["capturedMonsters"].as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn test_start_scout_mission() {
    let (state, ids) = make_test_state();
    let (status, json) = send(&state, post_json("/commands/missions", &scout_body(&ids, 2, 1))).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["type"], "SCOUT");
    assert_eq!(json["status"], "IN_PROGRESS");
    assert_eq!(json["startedAtMinute"], 0);
    assert_eq!(json["targetCell"], json!({ "x": 2, "y": 1 }));

    let snapshot = state.world.snapshot().await;
    assert_eq!(snapshot.version(), 1);
    assert_eq!(snapshot.presences.len(), 1);
}

#[tokio::test]
async fn test_capture_without_scout_is_conflict() {
    let (state, ids) = make_test_state();
    let (status, json) = send(&state, post_json("/commands/missions", &capture_body(&ids))).await;

    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(json["status"], 409);
    assert!(json["error"].as_str().unwrap().contains("not revealed"));

    let snapshot = state.world.snapshot().await;
    assert!(snapshot.missions.is_empty());
    assert_eq!(snapshot.version(), 0);
}

#[tokio::test]
async fn test_capture_after_scout_is_accepted() {
    let (state, ids) = make_test_state();
    send(&state, post_json("/commands/missions", &scout_body(&ids, 1, 1))).await;
    let (status, json) = send(&state, post_json("/commands/missions", &capture_body(&ids))).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["type"], "CAPTURE");
    assert_eq!(json["monsterId"], json!(ids.wraith));
}

#[tokio::test]
async fn test_busy_hunter_is_conflict() {
    let (state, ids) = make_test_state();
    send(&state, post_json("/commands/missions", &scout_body(&ids, 1, 1))).await;
    let (status, _) = send(&state, post_json("/commands/missions", &scout_body(&ids, 3, 3))).await;
    assert_eq!(status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_validation_errors_are_400() {
    let (state, ids) = make_test_state();
    let bodies = [
        json!({ "type": "SCOUT", "hunterId": uuid::Uuid::nil(), "targetCell": { "x": 1, "y": 1 } }),
        json!({ "type": "SCOUT", "hunterId": ids.edric }),
        scout_body(&ids, 9, 9),
        json!({ "type": "OBSERVE", "hunterId": ids.mara }),
        json!({ "type": "CAPTURE", "hunterId": ids.mara, "monsterId": uuid::Uuid::nil() }),
    ];

    for body in &bodies {
        let (status, json) = send(&state, post_json("/commands/missions", body)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{body}");
        assert_eq!(json["status"], 400);
    }
    assert!(state.world.snapshot().await.missions.is_empty());
}

#[tokio::test]
async fn test_malformed_bodies_are_400() {
    let (state, _) = make_test_state();

    let garbage = Request::post("/commands/missions")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{not json"))
        .unwrap();
    let (status, json) = send(&state, garbage).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["status"], 400);

    let (status, _) = send(&state, post_json("/commands/missions", &json!({ "type": "DANCE" }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_tick_advances_clock() {
    let (state, ids) = make_test_state();
    let (status, json) = send(&state, post_json("/commands/ticks", &json!({ "minutes": 10 }))).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["totalMinutes"], 10);
    assert_eq!(json["version"], 1);
    assert_eq!(json["hour"], 0);
    assert_eq!(json["minute"], 10);

    let presence = state.world.inspect(|s| s.presence(ids.wraith).map(|p| p.presence)).await;
    assert!((presence.unwrap() - 0.70).abs() < 1e-9);
}

#[tokio::test]
async fn test_tick_out_of_range_is_400() {
    let (state, _) = make_test_state();
    for minutes in [0_u64, 1441] {
        let (status, _) = send(&state, post_json("/commands/ticks", &json!({ "minutes": minutes }))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }
    assert_eq!(state.world.snapshot().await.version(), 0);
}

#[tokio::test]
async fn test_scout_resolves_after_sixty_minutes() {
    let (state, ids) = make_test_state();
    send(&state, post_json("/commands/missions", &scout_body(&ids, 1, 1))).await;

    send(&state, post_json("/commands/ticks", &json!({ "minutes": 59 }))).await;
    let (_, json) = send(&state, Request::get("/state").body(Body::empty()).unwrap()).await;
    assert_eq!(json["missions"][0]["status"], "IN_PROGRESS");

    send(&state, post_json("/commands/ticks", &json!({ "minutes": 1 }))).await;
    let (_, json) = send(&state, Request::get("/state").body(Body::empty()).unwrap()).await;
    assert_eq!(json["missions"][0]["status"], "COMPLETED");
    assert_eq!(json["missions"][0]["finishedAtMinute"], 60);
    let edric = json["hunters"]
        .as_array()
        .unwrap()
        .iter()
        .find(|h| h["id"] == json!(ids.edric))
        .unwrap();
    assert_eq!(edric["status"], "IDLE");
}

#[tokio::test]
async fn test_stream_sends_current_state_then_updates() {
    let (state, _) = make_test_state();
    let response = build_router(Arc::clone(&state))
        .oneshot(Request::get("/state/stream").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let content_type = response
        .headers()
        .get(header::CONTENT_TYPE)
        .unwrap()
        .to_str()
        .unwrap()
        .to_owned();
    assert!(content_type.contains("text/event-stream"));

    let mut frames = response.into_body().into_data_stream();
    let first = frames.next().await.unwrap().unwrap();
    let first = String::from_utf8(first.to_vec()).unwrap();
    assert!(first.contains("event: state"));
    assert!(first.contains("\"version\":0"));

    state.world.tick(5).await.unwrap();
    let second = frames.next().await.unwrap().unwrap();
    let second = String::from_utf8(second.to_vec()).unwrap();
    assert!(second.contains("event: state"));
    assert!(second.contains("\"version\":1"));
    assert!(second.contains("\"totalMinutes\":5"));
}
