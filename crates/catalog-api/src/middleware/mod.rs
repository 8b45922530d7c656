//! API middleware: request ids, access logging, request metrics, CORS and
//! the per-request deadline.

mod logging;
mod metrics;
mod request_id;

pub use logging::RequestLoggingLayer;
pub use metrics::{MetricsLayer, RequestMetrics, StatusClass};
pub use request_id::{RequestId, RequestIdLayer, MAX_REQUEST_ID_LEN, REQUEST_ID_HEADER};

use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::timeout::TimeoutLayer;

/// Creates a CORS layer with permissive settings.
///
/// Restrict origins in deployments that expose the API to browsers.
pub fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any)
        .expose_headers(Any)
}

/// Wraps `router` in the standard middleware stack.
///
/// Outermost first: CORS, request id, metrics, access log, then the
/// deadline. A request that outlives `request_timeout` is answered with
/// 408 and its in-flight storage reads are dropped.
pub fn with_standard_layers(
    router: Router,
    metrics: Arc<RequestMetrics>,
    request_timeout: Duration,
) -> Router {
    router
        .layer(TimeoutLayer::new(request_timeout))
        .layer(RequestLoggingLayer::new())
        .layer(MetricsLayer::new(metrics))
        .layer(RequestIdLayer::new())
        .layer(cors_layer())
}
