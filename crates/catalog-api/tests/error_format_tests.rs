//! Error response format tests.
//!
//! Every non-2xx response from the API carries exactly
//! `{"code": "...", "message": "..."}` and never echoes internal detail.

mod common;

use std::time::Duration;

use axum::http::StatusCode;
use serde_json::json;

use catalog_api::http::{create_router_with_body_limit, error_codes, AppState};
use catalog_api::middleware::{with_standard_layers, RequestMetrics};
use common::{create_test_app, lookup, post_json, post_raw, seeded_storage};

fn assert_error_shape(body: &serde_json::Value, expected_code: &str) {
    let object = body.as_object().expect("error body should be a JSON object");
    assert_eq!(object.len(), 2, "unexpected fields in {body}");
    assert_eq!(body["code"], expected_code);
    assert!(
        !body["message"].as_str().unwrap_or_default().is_empty(),
        "message should not be empty"
    );
}

#[tokio::test]
async fn test_validation_errors_have_code_and_message() {
    let storage = seeded_storage().await;
    let too_many: Vec<i64> = (1..=51).collect();

    for ids in [vec![], too_many, vec![1, 0], vec![-1]] {
        let (status, body) = lookup(create_test_app(&storage), &ids).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "ids: {ids:?}");
        assert_error_shape(&body, error_codes::VALIDATION_ERROR);
    }
}

#[tokio::test]
async fn test_invalid_id_message_names_position() {
    let storage = seeded_storage().await;

    let (_, body) = lookup(create_test_app(&storage), &[4, 8, -15]).await;

    let message = body["message"].as_str().unwrap();
    assert!(message.contains("index 2"), "message: {message}");
    assert!(message.contains("-15"), "message: {message}");
}

#[tokio::test]
async fn test_limit_message_reports_received_count() {
    let storage = seeded_storage().await;
    let ids: Vec<i64> = (1..=80).collect();

    let (_, body) = lookup(create_test_app(&storage), &ids).await;

    let message = body["message"].as_str().unwrap();
    assert!(message.contains("80"), "message: {message}");
    assert!(message.contains("50"), "message: {message}");
}

#[tokio::test]
async fn test_malformed_json_uses_validation_code() {
    let storage = seeded_storage().await;

    for body in ["{", "[1, 2]", r#"{"ids": null}"#, r#"{"ids": ["1"]}"#] {
        let (status, response) =
            post_raw(create_test_app(&storage), "/v0/subjects", body.to_string()).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "body: {body}");
        assert_error_shape(&response, error_codes::VALIDATION_ERROR);
    }
}

#[tokio::test]
async fn test_payload_too_large_uses_its_own_code() {
    let storage = seeded_storage().await;
    let app = create_router_with_body_limit(AppState::new(storage), 32);

    let ids = vec![1; 40];
    let (status, body) = post_json(app, "/v0/subjects", json!({ "ids": ids })).await;

    assert_eq!(status, StatusCode::PAYLOAD_TOO_LARGE);
    assert_error_shape(&body, error_codes::PAYLOAD_TOO_LARGE);
}

#[tokio::test]
async fn test_successful_response_has_no_error_fields() {
    let storage = seeded_storage().await;

    let (status, body) = lookup(create_test_app(&storage), &[1]).await;

    assert_eq!(status, StatusCode::OK);
    assert!(body.get("code").is_none());
    assert!(body.get("message").is_none());
}

#[tokio::test]
async fn test_middleware_stack_keeps_error_format() {
    let storage = seeded_storage().await;
    let app = with_standard_layers(
        create_test_app(&storage),
        std::sync::Arc::new(RequestMetrics::new()),
        Duration::from_secs(5),
    );

    let (status, body) = lookup(app, &[]).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_error_shape(&body, error_codes::VALIDATION_ERROR);
}
