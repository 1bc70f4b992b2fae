//! Study settings API tests.

mod common;

use axum::http::StatusCode;
use chrono::{Duration, Utc};
use serde_json::json;
use uuid::Uuid;

use common::fixtures::{self, approx};
use common::TestContext;

/// Test getting settings returns defaults.
#[tokio::test]
async fn test_get_default_settings() {
    let ctx = TestContext::new();
    let server = ctx.server();

    let response = server
        .get("/api/settings/study")
        .add_header(
            TestContext::user_header(),
            TestContext::user_header_value(Uuid::new_v4()),
        )
        .await;

    response.assert_status_ok();
    let body: serde_json::Value = response.json();
    assert_eq!(body["cram_mode"], false);
    assert_eq!(body["daily_reset_hour"], 0);
    assert!(body.get("exam_date").is_none());
}

/// Test partial updates keep untouched fields.
#[tokio::test]
async fn test_update_settings() {
    let ctx = TestContext::new();
    let server = ctx.server();
    let user = Uuid::new_v4();

    let response = server
        .put("/api/settings/study")
        .add_header(TestContext::user_header(), TestContext::user_header_value(user))
        .json(&json!({ "cram_mode": true, "exam_date": "2030-06-01" }))
        .await;
    response.assert_status_ok();
    let body: serde_json::Value = response.json();
    assert_eq!(body["cram_mode"], true);
    assert_eq!(body["exam_date"], "2030-06-01");

    let response = server
        .put("/api/settings/study")
        .add_header(TestContext::user_header(), TestContext::user_header_value(user))
        .json(&json!({ "daily_reset_hour": 4 }))
        .await;
    let body: serde_json::Value = response.json();
    assert_eq!(body["cram_mode"], true);
    assert_eq!(body["exam_date"], "2030-06-01");
    assert_eq!(body["daily_reset_hour"], 4);

    let response = server
        .put("/api/settings/study")
        .add_header(TestContext::user_header(), TestContext::user_header_value(user))
        .json(&json!({ "clear_exam_date": true }))
        .await;
    let body: serde_json::Value = response.json();
    assert!(body.get("exam_date").is_none());

    // Persisted
    let response = server
        .get("/api/settings/study")
        .add_header(TestContext::user_header(), TestContext::user_header_value(user))
        .await;
    let body: serde_json::Value = response.json();
    assert_eq!(body["cram_mode"], true);
    assert_eq!(body["daily_reset_hour"], 4);
}

/// Test an out-of-range reset hour is rejected and nothing is saved.
#[tokio::test]
async fn test_invalid_reset_hour() {
    let ctx = TestContext::new();
    let server = ctx.server();
    let user = Uuid::new_v4();

    let response = server
        .put("/api/settings/study")
        .add_header(TestContext::user_header(), TestContext::user_header_value(user))
        .json(&json!({ "cram_mode": true, "daily_reset_hour": 24 }))
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);

    let response = server
        .get("/api/settings/study")
        .add_header(TestContext::user_header(), TestContext::user_header_value(user))
        .await;
    let body: serde_json::Value = response.json();
    assert_eq!(body["cram_mode"], false);
}

/// Test stored cram settings drive review scheduling.
#[tokio::test]
async fn test_settings_drive_cram_reviews() {
    let ctx = TestContext::new();
    let server = ctx.server();
    let ids = ctx.seed_questions("law", 1).await;
    let user = Uuid::new_v4();
    let exam_date = Utc::now().date_naive() + Duration::days(14);

    server
        .put("/api/settings/study")
        .add_header(TestContext::user_header(), TestContext::user_header_value(user))
        .json(&json!({ "cram_mode": true, "exam_date": exam_date }))
        .await
        .assert_status_ok();

    // 14 days out doubles the base cram schedule: 4h becomes 8h
    let response = server
        .post("/api/practice/review")
        .add_header(TestContext::user_header(), TestContext::user_header_value(user))
        .json(&fixtures::review(ids[0], true))
        .await;
    response.assert_status_ok();
    let body: serde_json::Value = response.json();
    assert!(approx(&body["record"]["interval_days"], 8.0 / 24.0));

    // Request flag overrides the stored mode
    let response = server
        .post("/api/practice/review")
        .add_header(TestContext::user_header(), TestContext::user_header_value(user))
        .json(&json!({ "question_id": ids[0], "is_correct": true, "cram_mode": false }))
        .await;
    let body: serde_json::Value = response.json();
    assert!(approx(&body["record"]["interval_days"], 6.0));
}
