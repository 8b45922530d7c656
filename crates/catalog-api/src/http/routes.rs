//! HTTP route definitions and handlers.

use std::sync::Arc;

use axum::{
    async_trait,
    extract::{FromRequest, Request, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;
use tower_http::limit::RequestBodyLimitLayer;
use tracing::{debug, error};

use catalog_domain::DomainError;
use catalog_server::handlers::batch::{BatchError, SubjectBatchRequest};
use catalog_storage::DataStore;

use super::access::AccessContext;
use super::response::{SubjectBatchBody, SubjectBatchV0};
use super::state::AppState;
use crate::observability::{metrics_handler, MetricsState};

/// Custom JSON extractor that returns 400 Bad Request instead of 422
/// Unprocessable Entity for deserialization errors.
///
/// Preserves 413 Payload Too Large for body limit errors.
pub struct JsonBadRequest<T>(pub T);

#[async_trait]
impl<S, T> FromRequest<S> for JsonBadRequest<T>
where
    T: serde::de::DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = (StatusCode, Json<ApiError>);

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<T>::from_request(req, state).await {
            Ok(Json(value)) => Ok(JsonBadRequest(value)),
            Err(rejection) => {
                use axum::extract::rejection::JsonRejection;

                // Body limit errors arrive wrapped in a BytesRejection
                let status = match &rejection {
                    JsonRejection::BytesRejection(_)
                        if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE =>
                    {
                        StatusCode::PAYLOAD_TOO_LARGE
                    }
                    _ => StatusCode::BAD_REQUEST,
                };

                let message = rejection.body_text();
                let error = if status == StatusCode::PAYLOAD_TOO_LARGE {
                    ApiError::payload_too_large(message)
                } else {
                    ApiError::validation_error(message)
                };

                Err((status, Json(error)))
            }
        }
    }
}

/// Default request body size limit (1MB).
pub const DEFAULT_BODY_LIMIT: usize = 1024 * 1024;

fn api_routes<S: DataStore>() -> Router<Arc<AppState<S>>> {
    Router::new().route("/v0/subjects", post(get_subjects::<S>))
}

/// Creates the HTTP router with the catalog endpoints.
///
/// Applies the default body size limit (1MB).
pub fn create_router<S: DataStore>(state: AppState<S>) -> Router {
    create_router_with_body_limit(state, DEFAULT_BODY_LIMIT)
}

/// Creates the HTTP router with a custom body size limit.
pub fn create_router_with_body_limit<S: DataStore>(
    state: AppState<S>,
    body_limit: usize,
) -> Router {
    let shared_state = Arc::new(state);
    api_routes::<S>()
        .route("/health", get(health_check))
        .route("/ready", get(readiness_check::<S>))
        .with_state(shared_state)
        .layer(RequestBodyLimitLayer::new(body_limit))
}

/// Creates the HTTP router with observability endpoints.
///
/// This includes the catalog endpoints plus:
/// - `/metrics` - Prometheus metrics endpoint
/// - `/health` - Basic health check
/// - `/ready` - Readiness check (validates storage)
pub fn create_router_with_observability<S: DataStore>(
    state: AppState<S>,
    metrics_state: MetricsState,
) -> Router {
    create_router_with_observability_and_limit(state, metrics_state, DEFAULT_BODY_LIMIT)
}

/// Creates the HTTP router with observability endpoints and custom body size limit.
pub fn create_router_with_observability_and_limit<S: DataStore>(
    state: AppState<S>,
    metrics_state: MetricsState,
    body_limit: usize,
) -> Router {
    let shared_state = Arc::new(state);

    // Body limit applies to API routes only
    let api_router = api_routes::<S>()
        .route("/ready", get(readiness_check::<S>))
        .with_state(shared_state)
        .layer(RequestBodyLimitLayer::new(body_limit));

    let observability_router = Router::new()
        .route("/metrics", get(metrics_handler))
        .route("/health", get(health_check))
        .with_state(metrics_state);

    api_router.merge(observability_router)
}

// ============================================================
// Error Handling
// ============================================================

/// Stable error codes returned in [`ApiError::code`].
///
/// Each code maps to one HTTP status in [`ApiError::into_response`]:
///
/// | Code | Status |
/// |------|--------|
/// | [`VALIDATION_ERROR`] | 400 |
/// | [`PAYLOAD_TOO_LARGE`] | 413 |
/// | [`INTERNAL_ERROR`] | 500 |
/// | [`SERVICE_UNAVAILABLE`] | 503 |
/// | [`TIMEOUT`] | 504 |
pub mod error_codes {
    /// Malformed or out-of-bounds request.
    pub const VALIDATION_ERROR: &str = "validation_error";
    /// Request body exceeds maximum allowed size.
    pub const PAYLOAD_TOO_LARGE: &str = "payload_too_large";
    /// Unexpected internal server error.
    pub const INTERNAL_ERROR: &str = "internal_error";
    /// Storage backend temporarily unavailable.
    pub const SERVICE_UNAVAILABLE: &str = "service_unavailable";
    /// A storage read timed out.
    pub const TIMEOUT: &str = "timeout";
}

/// API error response body.
#[derive(Debug, Serialize)]
pub struct ApiError {
    pub code: String,
    pub message: String,
}

impl ApiError {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
        }
    }

    /// Creates a validation error (400).
    pub fn validation_error(message: impl Into<String>) -> Self {
        Self::new(error_codes::VALIDATION_ERROR, message)
    }

    /// Creates a payload too large error (413).
    pub fn payload_too_large(message: impl Into<String>) -> Self {
        Self::new(error_codes::PAYLOAD_TOO_LARGE, message)
    }

    /// Creates an internal error (500).
    pub fn internal_error(message: impl Into<String>) -> Self {
        Self::new(error_codes::INTERNAL_ERROR, message)
    }

    /// Creates a service unavailable error (503).
    pub fn service_unavailable(message: impl Into<String>) -> Self {
        Self::new(error_codes::SERVICE_UNAVAILABLE, message)
    }

    /// Creates a timeout error (504).
    pub fn gateway_timeout(message: impl Into<String>) -> Self {
        Self::new(error_codes::TIMEOUT, message)
    }

    /// Returns the HTTP status for this error's code.
    pub fn status(&self) -> StatusCode {
        use error_codes::*;

        match self.code.as_str() {
            VALIDATION_ERROR => StatusCode::BAD_REQUEST,
            PAYLOAD_TOO_LARGE => StatusCode::PAYLOAD_TOO_LARGE,
            SERVICE_UNAVAILABLE => StatusCode::SERVICE_UNAVAILABLE,
            TIMEOUT => StatusCode::GATEWAY_TIMEOUT,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        (self.status(), Json(self)).into_response()
    }
}

impl From<BatchError> for ApiError {
    fn from(err: BatchError) -> Self {
        match err {
            // The handler has already logged the full error; clients get a sanitized message.
            BatchError::Collaborator { source, .. } => match source {
                DomainError::Timeout { .. } => ApiError::gateway_timeout("subject lookup timed out"),
                DomainError::Unavailable { .. } => {
                    ApiError::service_unavailable("storage temporarily unavailable")
                }
                _ => ApiError::internal_error("internal error during subject lookup"),
            },
            validation => ApiError::validation_error(validation.to_string()),
        }
    }
}

type ApiResult<T> = Result<T, ApiError>;

// ============================================================
// Health and Readiness Checks
// ============================================================

/// Liveness probe. Does not touch dependencies.
async fn health_check() -> impl IntoResponse {
    Json(serde_json::json!({ "status": "ok" }))
}

/// Readiness probe: 200 when storage answers its health check, 503 otherwise.
///
/// Error details are logged but not exposed in the response.
async fn readiness_check<S: DataStore>(State(state): State<Arc<AppState<S>>>) -> impl IntoResponse {
    match state.storage.health_check().await {
        Ok(()) => (
            StatusCode::OK,
            Json(serde_json::json!({
                "status": "ready",
                "checks": {
                    "storage": "ok"
                }
            })),
        ),
        Err(e) => {
            error!("Readiness check failed: storage unavailable: {}", e);
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(serde_json::json!({
                    "status": "not_ready",
                    "checks": {
                        "storage": "unavailable"
                    }
                })),
            )
        }
    }
}

// ============================================================
// Subjects
// ============================================================

/// `POST /v0/subjects`: batch subject lookup.
///
/// The caller's access context decides whether NSFW subjects are visible.
/// Hidden subjects are reported as missing.
async fn get_subjects<S: DataStore>(
    State(state): State<Arc<AppState<S>>>,
    access: AccessContext,
    JsonBadRequest(body): JsonBadRequest<SubjectBatchBody>,
) -> ApiResult<Json<SubjectBatchV0>> {
    debug!(ids = body.ids.len(), allow_nsfw = access.allow_nsfw, "subject batch request");

    let request = SubjectBatchRequest::new(body.ids, access.subject_filter());
    let response = state.batch_handler.get(request).await?;

    Ok(Json(SubjectBatchV0::from(response)))
}
