//! HTTP API integration tests.
//!
//! Each test drives the router directly with tower's `oneshot`; the clock
//! is a `ManualClock` so expiry scenarios are deterministic.

use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use chrono::{NaiveTime, Weekday};
use chrono_tz::Tz;
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tower::ServiceExt;

use focusd::clock::ManualClock;
use focusd::http::{app_state, build_router};
use focusd::schedules::{ScheduleDef, ScheduleStore};
use focusd::state::StateRegister;

const NOW: i64 = 1000;

struct TestDaemon {
    router: Router,
    clock: Arc<ManualClock>,
}

/// Daemon with two configured schedules and the clock frozen at `NOW`.
///
/// Unix second 1000 falls on a Thursday (UTC), and "Work" has a window
/// covering it until second 3600.
fn test_daemon() -> TestDaemon {
    let work = ScheduleDef::new(
        "Work",
        Tz::UTC,
        vec![(
            vec![Weekday::Thu],
            NaiveTime::from_hms_opt(0, 0, 0).unwrap(),
            NaiveTime::from_hms_opt(1, 0, 0).unwrap(),
        )],
    );
    let deep = ScheduleDef::new("Deep Focus", Tz::UTC, vec![]);

    let clock = Arc::new(ManualClock::new(NOW));
    let state = app_state(
        Arc::new(StateRegister::new()),
        Arc::new(ScheduleStore::from_defs(vec![work, deep])),
        clock.clone(),
    );
    TestDaemon {
        router: build_router(state),
        clock,
    }
}

/// Daemon with no configurations at all.
fn bare_daemon() -> TestDaemon {
    let clock = Arc::new(ManualClock::new(NOW));
    let state = app_state(
        Arc::new(StateRegister::new()),
        Arc::new(ScheduleStore::empty()),
        clock.clone(),
    );
    TestDaemon {
        router: build_router(state),
        clock,
    }
}

async fn get(router: &Router, path: &str) -> (StatusCode, Value) {
    let request = Request::builder()
        .uri(path)
        .body(Body::empty())
        .unwrap();
    send(router, request).await
}

async fn post(router: &Router, path: &str, body: Value) -> (StatusCode, Value) {
    let request = Request::builder()
        .method(Method::POST)
        .uri(path)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    send(router, request).await
}

async fn send(router: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = router.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let value = serde_json::from_slice(&bytes).unwrap();
    (status, value)
}

#[tokio::test]
async fn health_reports_ok() {
    let daemon = bare_daemon();
    let (status, body) = get(&daemon.router, "/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert!(body["version"].is_string());
}

#[tokio::test]
async fn fresh_daemon_reports_unset_slots_as_nulls() {
    let daemon = bare_daemon();
    let (status, body) = get(&daemon.router, "/status").await;
    assert_eq!(status, StatusCode::OK);
    for slot in ["pause", "override", "schedule"] {
        assert!(body[slot]["name"].is_null(), "{slot} name should be null");
        assert!(body[slot]["until"].is_null(), "{slot} until should be null");
    }
}

#[tokio::test]
async fn configurations_lists_names_in_order() {
    let daemon = test_daemon();
    let (status, body) = get(&daemon.router, "/configurations").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!(["Work", "Deep Focus"]));

    let bare = bare_daemon();
    let (_, body) = get(&bare.router, "/configurations").await;
    assert_eq!(body, json!([]));
}

#[tokio::test]
async fn pause_is_visible_until_it_expires() {
    let daemon = bare_daemon();

    let (status, ack) = post(&daemon.router, "/pause", json!({ "until": NOW + 60 })).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(ack["status"], "ok");

    // Read-after-write: the new pause shows up immediately.
    let (_, body) = get(&daemon.router, "/status").await;
    assert_eq!(body["pause"]["until"], NOW + 60);
    assert!(body["pause"]["name"].is_null());

    // One second past the deadline the slot reads as unset.
    daemon.clock.set(NOW + 61);
    let (_, body) = get(&daemon.router, "/status").await;
    assert!(body["pause"]["until"].is_null());
}

#[tokio::test]
async fn override_round_trip_and_idempotence() {
    let daemon = test_daemon();
    let request = json!({ "name": "Deep Focus", "until": NOW + 1800 });

    let (_, ack) = post(&daemon.router, "/override", request.clone()).await;
    assert_eq!(ack["status"], "ok");

    let (_, body) = get(&daemon.router, "/status").await;
    assert_eq!(body["override"]["name"], "Deep Focus");
    assert_eq!(body["override"]["until"], NOW + 1800);

    // Last write wins: the identical request changes nothing observable.
    let (_, ack) = post(&daemon.router, "/override", request).await;
    assert_eq!(ack["status"], "ok");
    let (_, again) = get(&daemon.router, "/status").await;
    assert_eq!(again, body);
}

#[tokio::test]
async fn pause_leaves_other_slots_alone() {
    let daemon = test_daemon();

    post(
        &daemon.router,
        "/override",
        json!({ "name": "Deep Focus", "until": NOW + 1800 }),
    )
    .await;
    post(&daemon.router, "/pause", json!({ "until": NOW + 300 })).await;

    let (_, body) = get(&daemon.router, "/status").await;
    assert_eq!(body["pause"]["until"], NOW + 300);
    assert_eq!(body["override"]["name"], "Deep Focus");
    // The recurring "Work" window around NOW is still reported.
    assert_eq!(body["schedule"]["name"], "Work");
    assert_eq!(body["schedule"]["until"], 3600);
}

#[tokio::test]
async fn malformed_pause_gets_error_payload_not_http_error() {
    let daemon = bare_daemon();

    let (status, ack) = post(&daemon.router, "/pause", json!({})).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(ack["status"], "error");
    let message = ack["message"].as_str().unwrap();
    assert!(!message.is_empty());

    // The daemon stays responsive after bad input.
    let (status, body) = get(&daemon.router, "/status").await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["pause"]["until"].is_null());
}

#[tokio::test]
async fn malformed_override_gets_error_payload() {
    let daemon = test_daemon();
    let (status, ack) = post(&daemon.router, "/override", json!({ "name": "Work" })).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(ack["status"], "error");
    assert!(ack["message"].as_str().is_some());
}

#[tokio::test]
async fn unknown_override_name_is_stored_verbatim() {
    let daemon = test_daemon();
    let (_, ack) = post(
        &daemon.router,
        "/override",
        json!({ "name": "Not Configured", "until": NOW + 900 }),
    )
    .await;
    assert_eq!(ack["status"], "ok");

    let (_, body) = get(&daemon.router, "/status").await;
    assert_eq!(body["override"]["name"], "Not Configured");
}

#[tokio::test]
async fn past_until_reads_as_idle_immediately() {
    let daemon = bare_daemon();
    let (_, ack) = post(&daemon.router, "/pause", json!({ "until": NOW - 10 })).await;
    assert_eq!(ack["status"], "ok");

    let (_, body) = get(&daemon.router, "/status").await;
    assert!(body["pause"]["until"].is_null());
}
