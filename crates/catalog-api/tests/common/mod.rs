//! Shared helpers for catalog API integration tests.

// Each test binary uses a different subset of these helpers.
#![allow(dead_code)]

use std::sync::Arc;

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use tower::ServiceExt;

use catalog_api::http::{create_router, AppState};
use catalog_storage::{Fixture, MemoryDataStore};

/// Catalog used by most tests.
///
/// - 1: anime with 12 main episodes, 1 special, two user tags and a meta tag
/// - 2: merged into 5
/// - 5: plain book
/// - 6: NSFW
/// - 7: merged into 8, which is itself merged into 9
/// - 8: merged into 9
pub const CATALOG_FIXTURE: &str = r#"{
  "subjects": [
    {"id": 1, "type": 2, "name": "Cowboy Bebop", "name_cn": "星际牛仔",
     "summary": "Bounty hunters in space.", "date": "1998-04-03", "platform": 1,
     "eps": 26, "tags": [["sunrise", 120], ["space", 80]]},
    {"id": 2, "type": 2, "name": "", "redirect": 5},
    {"id": 5, "type": 1, "name": "Book", "volumes": 3},
    {"id": 6, "type": 4, "name": "Adult", "nsfw": true},
    {"id": 7, "type": 2, "name": "", "redirect": 8},
    {"id": 8, "type": 2, "name": "", "redirect": 9}
  ],
  "meta_tags": {"1": [{"name": "TV", "count": 1}]},
  "episodes": [
    {"id": 101, "subject_id": 1, "type": 0},
    {"id": 102, "subject_id": 1, "type": 0},
    {"id": 103, "subject_id": 1, "type": 0},
    {"id": 104, "subject_id": 1, "type": 0},
    {"id": 105, "subject_id": 1, "type": 0},
    {"id": 106, "subject_id": 1, "type": 0},
    {"id": 107, "subject_id": 1, "type": 0},
    {"id": 108, "subject_id": 1, "type": 0},
    {"id": 109, "subject_id": 1, "type": 0},
    {"id": 110, "subject_id": 1, "type": 0},
    {"id": 111, "subject_id": 1, "type": 0},
    {"id": 112, "subject_id": 1, "type": 0},
    {"id": 113, "subject_id": 1, "type": 1}
  ]
}"#;

/// Creates a store seeded with [`CATALOG_FIXTURE`].
pub async fn seeded_storage() -> Arc<MemoryDataStore> {
    let storage = MemoryDataStore::new_shared();
    Fixture::from_json(CATALOG_FIXTURE)
        .unwrap()
        .apply(&*storage)
        .await
        .unwrap();
    storage
}

/// Creates a router over the given store with default settings.
pub fn create_test_app(storage: &Arc<MemoryDataStore>) -> Router {
    create_router(AppState::new(Arc::clone(storage)))
}

/// Sends a JSON POST and returns status and parsed body.
pub async fn post_json(
    app: Router,
    uri: &str,
    body: serde_json::Value,
) -> (StatusCode, serde_json::Value) {
    post_raw(app, uri, body.to_string()).await
}

/// Sends a raw POST body and returns status and parsed body.
pub async fn post_raw(app: Router, uri: &str, body: String) -> (StatusCode, serde_json::Value) {
    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri(uri)
                .header("content-type", "application/json")
                .body(Body::from(body))
                .unwrap(),
        )
        .await
        .unwrap();

    let status = response.status();
    let body = axum::body::to_bytes(response.into_body(), 1024 * 1024)
        .await
        .unwrap();
    let json = if body.is_empty() {
        serde_json::Value::Null
    } else {
        serde_json::from_slice(&body).unwrap()
    };

    (status, json)
}

/// Posts `ids` to the batch endpoint.
pub async fn lookup(app: Router, ids: &[i64]) -> (StatusCode, serde_json::Value) {
    post_json(app, "/v0/subjects", serde_json::json!({ "ids": ids })).await
}
