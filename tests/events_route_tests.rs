// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Push endpoint tests.

use axum::{
    body::Body,
    http::{Request, StatusCode},
};
use badge_worker::db::QueryKind;
use badge_worker::services::BadgeLedger;
use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use serde_json::{json, Value};
use tower::ServiceExt;

mod common;
use common::{day, journal};

const TOKEN: &str = "test_push_token"; // Matches Config::default()

fn push_body(event: Value) -> String {
    json!({
        "message": {
            "data": BASE64.encode(event.to_string()),
            "messageId": "1234",
            "attributes": {}
        },
        "subscription": "projects/test-project/subscriptions/badge-worker"
    })
    .to_string()
}

fn push_request(token: Option<&str>, body: String) -> Request<Body> {
    let uri = match token {
        Some(t) => format!("/events/push?token={}", t),
        None => "/events/push".to_string(),
    };
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body))
        .unwrap()
}

fn journal_event(user_id: &str) -> Value {
    json!({
        "event_type": "journal.entry.created",
        "user_id": user_id,
        "correlation_id": "corr-1",
        "timestamp": "2026-03-01T09:00:00Z"
    })
}

#[tokio::test]
async fn test_health_check() {
    let (app, _, _) = common::create_test_app();

    let response = app
        .oneshot(
            Request::builder()
                .uri("/health")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_push_without_token_forbidden() {
    let (app, _, store) = common::create_test_app();
    store.insert_journal_entry(journal("u1", day(0)));

    let response = app
        .oneshot(push_request(None, push_body(journal_event("u1"))))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    assert_eq!(store.grant_calls(), 0);

    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(json["error"], "forbidden");
}

#[tokio::test]
async fn test_push_with_wrong_token_forbidden() {
    let (app, _, _) = common::create_test_app();

    let response = app
        .oneshot(push_request(Some("wrong"), push_body(journal_event("u1"))))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_push_grants_badge_and_returns_no_content() {
    let (app, _, store) = common::create_test_app();
    store.insert_journal_entry(journal("u1", day(0)));

    let response = app
        .oneshot(push_request(Some(TOKEN), push_body(journal_event("u1"))))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NO_CONTENT);
    let grants = store.get_grants("u1").await.unwrap();
    assert!(grants.contains("First Page"));
}

#[tokio::test]
async fn test_redelivered_push_does_not_duplicate() {
    let (app, _, store) = common::create_test_app();
    store.insert_journal_entry(journal("u1", day(0)));

    for _ in 0..3 {
        let response = app
            .clone()
            .oneshot(push_request(Some(TOKEN), push_body(journal_event("u1"))))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NO_CONTENT);
    }

    assert_eq!(store.grant_count("u1"), 1);
}

#[tokio::test]
async fn test_unknown_event_type_rejected() {
    let (app, _, store) = common::create_test_app();

    let body = push_body(json!({ "event_type": "sleep.logged", "user_id": "u1" }));
    let response = app
        .oneshot(push_request(Some(TOKEN), body))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(store.grant_calls(), 0);
}

#[tokio::test]
async fn test_timestamp_without_offset_still_evaluated() {
    let (app, _, store) = common::create_test_app();
    store.insert_journal_entry(journal("u1", day(0)));

    let event = json!({
        "event_type": "journal.entry.created",
        "user_id": "u1",
        "timestamp": "2026-03-01T09:00:00"
    });
    let response = app
        .oneshot(push_request(Some(TOKEN), push_body(event)))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NO_CONTENT);
    assert_eq!(store.grant_count("u1"), 1);
}

#[tokio::test]
async fn test_malformed_envelope_rejected() {
    let (app, _, _) = common::create_test_app();

    let response = app
        .oneshot(push_request(Some(TOKEN), "{not json".to_string()))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_invalid_base64_rejected() {
    let (app, _, _) = common::create_test_app();

    let body = json!({ "message": { "data": "%%%", "messageId": "1" } }).to_string();
    let response = app
        .oneshot(push_request(Some(TOKEN), body))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_storage_failure_returns_retryable_error() {
    let (app, _, store) = common::create_test_app();
    store.insert_journal_entry(journal("u1", day(0)));
    store.fail_on(QueryKind::FirstEntry);

    let response = app
        .oneshot(push_request(Some(TOKEN), push_body(journal_event("u1"))))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
}

#[tokio::test]
async fn test_offline_database_returns_retryable_error() {
    let app = common::create_offline_test_app();

    let response = app
        .oneshot(push_request(Some(TOKEN), push_body(journal_event("u1"))))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
}

#[tokio::test]
async fn test_reevaluate_runs_every_domain() {
    let (app, _, store) = common::create_test_app();
    store.insert_journal_entry(journal("u1", day(0)));
    store.insert_gratitude_entry(common::gratitude("u1", day(0)));

    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri(format!("/events/reevaluate?token={}", TOKEN))
                .header("content-type", "application/json")
                .body(Body::from(json!({ "user_id": "u1" }).to_string()))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(json["user_id"], "u1");
    assert_eq!(json["granted"], json!(["First Page", "Grateful Heart"]));
}

#[tokio::test]
async fn test_reevaluate_requires_user_id() {
    let (app, _, _) = common::create_test_app();

    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri(format!("/events/reevaluate?token={}", TOKEN))
                .header("content-type", "application/json")
                .body(Body::from(json!({ "user_id": " " }).to_string()))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_reevaluate_rejects_overlong_user_id() {
    let (app, _, store) = common::create_test_app();

    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri(format!("/events/reevaluate?token={}", TOKEN))
                .header("content-type", "application/json")
                .body(Body::from(
                    json!({ "user_id": "x".repeat(129) }).to_string(),
                ))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(store.grant_calls(), 0);
}
