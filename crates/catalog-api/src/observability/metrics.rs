//! Prometheus metrics infrastructure.
//!
//! Metrics are recorded through the `metrics` facade and rendered by
//! `metrics-exporter-prometheus`.
//!
//! # Metrics Exposed
//!
//! - `catalog_http_requests_total` - HTTP requests by method, path, status class
//! - `catalog_http_request_duration_seconds` - HTTP request duration histogram
//! - `catalog_subject_batch_ids_total` - Ids received by the batch lookup
//! - `catalog_subject_batch_unique_ids` - Distinct ids per batch
//! - `catalog_subject_batch_size` - Ids per batch, duplicates included
//! - `catalog_subject_batch_outcomes_total` - Classified ids by outcome
//! - `catalog_subject_cache_hits_total` / `catalog_subject_cache_misses_total`

use std::sync::Arc;

use axum::{extract::State, http::header::CONTENT_TYPE, response::IntoResponse};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};

/// Shared state containing the Prometheus handle for metrics rendering.
#[derive(Clone)]
pub struct MetricsState {
    handle: Arc<PrometheusHandle>,
}

impl MetricsState {
    pub fn new(handle: PrometheusHandle) -> Self {
        Self {
            handle: Arc::new(handle),
        }
    }

    /// Renders the current metrics in Prometheus text format.
    pub fn render(&self) -> String {
        self.handle.render()
    }
}

/// Error type for metrics initialization.
#[derive(Debug, thiserror::Error)]
pub enum MetricsError {
    #[error("failed to install Prometheus recorder: recorder already installed")]
    AlreadyInstalled,
}

/// Installs the global Prometheus recorder and describes the catalog metrics.
///
/// Must be called at most once per process.
pub fn init_metrics() -> Result<MetricsState, MetricsError> {
    let handle = PrometheusBuilder::new()
        .install_recorder()
        .map_err(|_| MetricsError::AlreadyInstalled)?;

    register_default_metrics();

    Ok(MetricsState::new(handle))
}

fn register_default_metrics() {
    metrics::describe_counter!("catalog_http_requests_total", "Total number of HTTP requests");
    metrics::describe_histogram!(
        "catalog_http_request_duration_seconds",
        "HTTP request duration in seconds"
    );

    metrics::describe_counter!(
        "catalog_subject_batch_ids_total",
        "Total number of ids received by the batch subject lookup"
    );
    metrics::describe_histogram!(
        "catalog_subject_batch_unique_ids",
        "Distinct ids per batch subject lookup"
    );
    metrics::describe_histogram!(
        "catalog_subject_batch_size",
        "Ids per batch subject lookup, duplicates included"
    );
    metrics::describe_counter!(
        "catalog_subject_batch_outcomes_total",
        "Classified ids by outcome (resolved, missing, redirect)"
    );

    metrics::describe_counter!(
        "catalog_subject_cache_hits_total",
        "Subject records served from the cache"
    );
    metrics::describe_counter!(
        "catalog_subject_cache_misses_total",
        "Subject records loaded from storage"
    );
}

/// Prometheus exposition format content type.
const PROMETHEUS_CONTENT_TYPE: &str = "text/plain; version=0.0.4; charset=utf-8";

/// Handler for the `/metrics` endpoint.
pub async fn metrics_handler(State(state): State<MetricsState>) -> impl IntoResponse {
    ([(CONTENT_TYPE, PROMETHEUS_CONTENT_TYPE)], state.render())
}
