//! Integration tests for the REST API feature.

#![cfg(feature = "api")]

mod common;

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use serde_json::{Value, json};
use tower::util::ServiceExt;

use solar_sched::api::{AppState, router};
use solar_sched::engine::{EngineOptions, NO_FEASIBLE_WINDOW, ScoringMode};

fn build_api_state(options: EngineOptions) -> Arc<AppState> {
    Arc::new(AppState { options })
}

/// Production samples of a fixture series as request JSON.
fn production_json(peaks: &[(usize, f64)]) -> Value {
    serde_json::to_value(common::hourly_series(peaks).samples()).expect("serializable")
}

async fn post_schedule(state: Arc<AppState>, body: Value) -> (StatusCode, Value) {
    let req = Request::builder()
        .method("POST")
        .uri("/schedule")
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .expect("request builds");
    let resp = router(state).oneshot(req).await.expect("router responds");
    let status = resp.status();
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
        .await
        .expect("body reads");
    (status, serde_json::from_slice(&bytes).unwrap_or(Value::Null))
}

#[tokio::test]
async fn two_appliances_follow_their_peaks() {
    let (status, json) = post_schedule(
        build_api_state(EngineOptions::default()),
        json!({
            "production": production_json(&[(10, 1000.0), (16, 1000.0)]),
            "appliances": [{ "id": "washing_machine" }, { "id": "tumble_dryer" }],
        }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["schedule"]["washing_machine"], "2024-06-21 10:00");
    assert_eq!(json["schedule"]["tumble_dryer"], "2024-06-21 16:00");
    assert_eq!(json["summary"]["daily_output_wh"], 2000.0);
    assert_eq!(json["summary"]["peak_time"], "2024-06-21 10:00");
}

#[tokio::test]
async fn caller_order_drives_sequencing() {
    // The dryer goes first and takes the afternoon, so the washer may only
    // start once it has finished, when it is already dark.
    let (status, json) = post_schedule(
        build_api_state(EngineOptions::default()),
        json!({
            "production": production_json(&[(10, 1000.0), (16, 1000.0)]),
            "appliances": [{ "id": "tumble_dryer" }, { "id": "washing_machine" }],
        }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["schedule"]["tumble_dryer"], "2024-06-21 16:00");
    assert_eq!(json["schedule"]["washing_machine"], NO_FEASIBLE_WINDOW);
}

#[tokio::test]
async fn server_default_options_apply_without_override() {
    let state = build_api_state(EngineOptions {
        mode: ScoringMode::Net,
        ..EngineOptions::default()
    });
    let (status, json) = post_schedule(
        state,
        json!({
            "production": production_json(&[(12, 1000.0)]),
            "appliances": [{ "id": "washing_machine" }],
        }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    // net mode ties 11:00 and 12:00 and keeps the earlier start
    assert_eq!(json["schedule"]["washing_machine"], "2024-06-21 11:00");
}

#[tokio::test]
async fn inline_profiles_are_accepted() {
    let (status, json) = post_schedule(
        build_api_state(EngineOptions::default()),
        json!({
            "production": production_json(&[(14, 900.0)]),
            "appliances": [{
                "id": "dishwasher",
                "profile": { "total_wh": 900.0, "duration_minutes": 60 },
            }],
        }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["schedule"]["dishwasher"], "2024-06-21 14:00");
}

#[tokio::test]
async fn plain_field_names_are_accepted() {
    let production: Vec<Value> = (0..24)
        .map(|h| {
            json!({
                "timestamp": format!("2024-06-21T{h:02}:00:00Z"),
                "power": if h == 14 { 1000.0 } else { 0.0 },
            })
        })
        .collect();
    let samples: Vec<Value> = (1..=6)
        .map(|i| json!({ "sequence_index": i, "consumption": 150.0 }))
        .collect();

    let (status, json) = post_schedule(
        build_api_state(EngineOptions::default()),
        json!({
            "production": production,
            "appliances": [{ "id": "dishwasher", "profile": { "samples": samples } }],
        }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["schedule"]["dishwasher"], "2024-06-21 14:00");
    assert_eq!(json["summary"]["daily_output_wh"], 1000.0);
}

#[tokio::test]
async fn dark_day_is_not_an_error() {
    let (status, json) = post_schedule(
        build_api_state(EngineOptions::default()),
        json!({
            "production": production_json(&[]),
            "appliances": [{ "id": "washing_machine" }, { "id": "tumble_dryer" }],
        }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["schedule"]["washing_machine"], NO_FEASIBLE_WINDOW);
    assert_eq!(json["schedule"]["tumble_dryer"], NO_FEASIBLE_WINDOW);
    assert_eq!(json["summary"]["peak_power_w"], 0.0);
}

#[tokio::test]
async fn invalid_requests_return_422() {
    let state = build_api_state(EngineOptions::default());

    let (status, _) = post_schedule(
        Arc::clone(&state),
        json!({
            "production": production_json(&[(12, 1000.0)]),
            "appliances": [{
                "id": "broken",
                "profile": { "total_wh": 100.0, "duration_minutes": 0 },
            }],
        }),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    let (status, json) = post_schedule(
        Arc::clone(&state),
        json!({
            "production": production_json(&[(12, 1000.0)]),
            "appliances": [{ "id": "washing_machine" }],
            "options": { "output": "ranked", "top_n": 0 },
        }),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(json["error"].as_str().is_some_and(|e| e.contains("top_n")));

    let (status, _) = post_schedule(
        Arc::clone(&state),
        json!({
            "production": production_json(&[(12, 1000.0)]),
            "appliances": [{ "id": "washing_machine" }, { "id": "washing_machine" }],
        }),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    let (status, json) = post_schedule(
        state,
        json!({
            "production": production_json(&[(12, 1000.0)]),
            "appliances": [],
        }),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(json["error"].as_str().is_some_and(|e| e.contains("appliances")));
}
