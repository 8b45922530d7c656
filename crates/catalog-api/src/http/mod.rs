//! HTTP REST API endpoints.
//!
//! | Endpoint | Method | Description |
//! |----------|--------|-------------|
//! | `/v0/subjects` | POST | Batch subject lookup |
//! | `/health` | GET | Liveness probe |
//! | `/ready` | GET | Readiness probe (storage) |
//! | `/metrics` | GET | Prometheus metrics (observability router only) |

pub mod access;
pub mod response;
pub mod routes;
pub mod state;

pub use access::AccessContext;
pub use response::{SubjectBatchBody, SubjectBatchV0, SubjectV0};
pub use routes::{
    create_router, create_router_with_body_limit, create_router_with_observability,
    create_router_with_observability_and_limit, error_codes, ApiError, DEFAULT_BODY_LIMIT,
};
pub use state::{AppState, StoreBatchHandler, SubjectSource};

#[cfg(test)]
mod tests;
