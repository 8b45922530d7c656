//! HTTP API tests for the subject batch endpoint.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use axum::{
    body::Body,
    http::{Request, StatusCode},
};
use tower::ServiceExt; // for oneshot

use catalog_storage::{
    DataStore, MemoryDataStore, StorageError, StorageResult, StoredEpisode, StoredMetaTag,
    StoredSubject,
};

use super::access::AccessContext;
use super::routes::{create_router, create_router_with_body_limit};
use super::state::AppState;

/// Seeds the catalog used across these tests:
/// 1 is resolved with a meta tag and 12 episodes, 2 redirects to 5,
/// 3 does not exist and 6 is NSFW.
async fn seeded_storage() -> Arc<MemoryDataStore> {
    let storage = MemoryDataStore::new_shared();

    let mut one = StoredSubject::new(1, 2, "subject-1");
    one.tags = vec![("tag-1".to_string(), 3)];
    storage.put_subject(one).await.unwrap();

    let mut two = StoredSubject::new(2, 2, "");
    two.redirect = 5;
    storage.put_subject(two).await.unwrap();

    let mut six = StoredSubject::new(6, 4, "adult");
    six.nsfw = true;
    storage.put_subject(six).await.unwrap();

    storage
        .put_meta_tags(1, vec![StoredMetaTag::new("meta", 1)])
        .await
        .unwrap();

    for id in 1..=12 {
        storage
            .put_episode(StoredEpisode {
                id,
                subject_id: 1,
                episode_type: 0,
                name: format!("ep{id}"),
            })
            .await
            .unwrap();
    }

    storage
}

async fn test_app() -> axum::Router {
    create_router(AppState::new(seeded_storage().await))
}

fn subjects_request(body: impl Into<Body>) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/v0/subjects")
        .header("content-type", "application/json")
        .body(body.into())
        .unwrap()
}

async fn read_json(response: axum::response::Response) -> serde_json::Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .unwrap();
    serde_json::from_slice(&body).unwrap()
}

/// Storage whose every read fails with the configured error.
struct FailingStore {
    error: fn() -> StorageError,
}

#[async_trait]
impl DataStore for FailingStore {
    async fn get_subjects(&self, _: &[u32], _: Option<bool>) -> StorageResult<Vec<StoredSubject>> {
        Err((self.error)())
    }

    async fn put_subject(&self, _: StoredSubject) -> StorageResult<()> {
        Err((self.error)())
    }

    async fn get_meta_tags(&self, _: &[u32]) -> StorageResult<HashMap<u32, Vec<StoredMetaTag>>> {
        Err((self.error)())
    }

    async fn put_meta_tags(&self, _: u32, _: Vec<StoredMetaTag>) -> StorageResult<()> {
        Err((self.error)())
    }

    async fn count_episodes(&self, _: u32, _: Option<u8>) -> StorageResult<u64> {
        Err((self.error)())
    }

    async fn put_episode(&self, _: StoredEpisode) -> StorageResult<()> {
        Err((self.error)())
    }

    async fn health_check(&self) -> StorageResult<()> {
        Err((self.error)())
    }
}

fn failing_app(error: fn() -> StorageError) -> axum::Router {
    create_router(AppState::new(Arc::new(FailingStore { error })))
}

// ============================================================
// Health and Readiness
// ============================================================

#[tokio::test]
async fn test_health_returns_ok() {
    let app = test_app().await;

    let response = app
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(read_json(response).await["status"], "ok");
}

#[tokio::test]
async fn test_ready_reports_storage_status() {
    let response = test_app()
        .await
        .oneshot(Request::builder().uri("/ready").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(read_json(response).await["checks"]["storage"], "ok");

    let response = failing_app(|| StorageError::HealthCheckFailed {
        message: "down".to_string(),
    })
    .oneshot(Request::builder().uri("/ready").body(Body::empty()).unwrap())
    .await
    .unwrap();
    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    let json = read_json(response).await;
    assert_eq!(json["status"], "not_ready");
    assert!(!json.to_string().contains("down"));
}

// ============================================================
// Batch Lookup
// ============================================================

#[tokio::test]
async fn test_mixed_batch_lookup() {
    let app = test_app().await;

    let response = app
        .oneshot(subjects_request(r#"{"ids": [1, 2, 3, 1]}"#))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = read_json(response).await;

    let data = json["data"].as_array().unwrap();
    assert_eq!(data.len(), 2);
    for entry in data {
        assert_eq!(entry["id"], 1);
        assert_eq!(entry["total_episodes"], 12);
        assert_eq!(entry["meta_tags"], serde_json::json!(["meta"]));
        assert_eq!(entry["tags"], serde_json::json!([{ "name": "tag-1", "count": 3 }]));
    }
    assert_eq!(json["missing"], serde_json::json!([3]));
    assert_eq!(json["redirects"], serde_json::json!({ "2": 5 }));
}

#[tokio::test]
async fn test_redirects_null_when_none() {
    let response = test_app()
        .await
        .oneshot(subjects_request(r#"{"ids": [1]}"#))
        .await
        .unwrap();

    let json = read_json(response).await;
    assert!(json["redirects"].is_null());
    assert_eq!(json["missing"], serde_json::json!([]));
}

#[tokio::test]
async fn test_repeated_request_is_byte_identical() {
    let app = test_app().await;
    let body = r#"{"ids": [9, 2, 1, 8, 2, 1, 3]}"#;

    let first = app.clone().oneshot(subjects_request(body)).await.unwrap();
    let second = app.oneshot(subjects_request(body)).await.unwrap();

    let first = axum::body::to_bytes(first.into_body(), 64 * 1024).await.unwrap();
    let second = axum::body::to_bytes(second.into_body(), 64 * 1024).await.unwrap();
    assert_eq!(first, second);
}

#[tokio::test]
async fn test_nsfw_subject_hidden_from_anonymous_callers() {
    let app = test_app().await;

    let anonymous = app
        .clone()
        .oneshot(subjects_request(r#"{"ids": [6]}"#))
        .await
        .unwrap();
    let json = read_json(anonymous).await;
    assert_eq!(json["data"], serde_json::json!([]));
    assert_eq!(json["missing"], serde_json::json!([6]));

    let mut trusted = subjects_request(r#"{"ids": [6]}"#);
    trusted.extensions_mut().insert(AccessContext::with_nsfw());
    let json = read_json(app.oneshot(trusted).await.unwrap()).await;
    assert_eq!(json["data"][0]["id"], 6);
    assert_eq!(json["data"][0]["nsfw"], true);
}

// ============================================================
// Validation
// ============================================================

#[tokio::test]
async fn test_validation_failures_return_400() {
    let too_many: Vec<i64> = (1..=51).collect();
    let too_many = serde_json::json!({ "ids": too_many }).to_string();

    let cases = [
        (r#"{"ids": []}"#.to_string(), "ids is required"),
        (too_many, "exceeds maximum allowed 50"),
        (r#"{"ids": [1, 0]}"#.to_string(), "positive integer"),
        (r#"{"ids": [-3]}"#.to_string(), "positive integer"),
        (r#"{"ids": [4294967296]}"#.to_string(), "out of range"),
    ];

    let app = test_app().await;
    for (body, expected) in cases {
        let response = app.clone().oneshot(subjects_request(body.clone())).await.unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "body: {body}");
        let json = read_json(response).await;
        assert_eq!(json["code"], "validation_error");
        assert!(
            json["message"].as_str().unwrap().contains(expected),
            "expected '{expected}' in {json}"
        );
    }
}

#[tokio::test]
async fn test_malformed_body_returns_400() {
    let app = test_app().await;

    for body in [r#"{"ids": "1,2"}"#, r#"{"ids": [1.5]}"#, r#"{}"#, "not json"] {
        let response = app.clone().oneshot(subjects_request(body)).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "body: {body}");
        assert_eq!(read_json(response).await["code"], "validation_error");
    }
}

#[tokio::test]
async fn test_oversized_body_returns_413() {
    let app = create_router_with_body_limit(AppState::new(seeded_storage().await), 64);
    let body = format!(r#"{{"ids": [{}]}}"#, vec!["1"; 40].join(", "));

    let response = app.oneshot(subjects_request(body)).await.unwrap();

    assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
    assert_eq!(read_json(response).await["code"], "payload_too_large");
}

// ============================================================
// Collaborator Failures
// ============================================================

#[tokio::test]
async fn test_storage_failures_map_to_server_errors() {
    let cases: [(fn() -> StorageError, StatusCode, &str); 3] = [
        (
            || StorageError::QueryError {
                message: "relation \"subjects\" does not exist".to_string(),
            },
            StatusCode::INTERNAL_SERVER_ERROR,
            "internal_error",
        ),
        (
            || StorageError::QueryTimeout {
                operation: "get_subjects".to_string(),
                timeout_ms: 100,
            },
            StatusCode::GATEWAY_TIMEOUT,
            "timeout",
        ),
        (
            || StorageError::ConnectionError {
                message: "connection refused".to_string(),
            },
            StatusCode::SERVICE_UNAVAILABLE,
            "service_unavailable",
        ),
    ];

    for (error, status, code) in cases {
        let response = failing_app(error)
            .oneshot(subjects_request(r#"{"ids": [1, 2]}"#))
            .await
            .unwrap();

        assert_eq!(response.status(), status);
        let json = read_json(response).await;
        assert_eq!(json["code"], code);
        // No partial body and no leaked storage detail
        assert!(json.get("data").is_none());
        assert!(!json["message"].as_str().unwrap().contains("subjects\""));
    }
}

#[tokio::test]
async fn test_validation_runs_before_storage() {
    let response = failing_app(|| StorageError::InternalError {
        message: "should not be reached".to_string(),
    })
    .oneshot(subjects_request(r#"{"ids": []}"#))
    .await
    .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}
