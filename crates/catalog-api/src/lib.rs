//! catalog-api: HTTP API layer and server binary
//!
//! This crate exposes the catalog over HTTP:
//! - `POST /v0/subjects` batch lookup via Axum
//! - Adapters from `DataStore` to the domain reader traits
//! - Middleware (request ids, access log, metrics, deadline)
//! - Logging and Prometheus setup
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │                 catalog-api                 │
//! ├─────────────────────────────────────────────┤
//! │  adapters.rs    - Storage to domain traits  │
//! │  http/          - Routes, state, wire types │
//! │  middleware/    - Request id, log, metrics  │
//! │  observability/ - Logging and metrics setup │
//! └─────────────────────────────────────────────┘
//! ```

pub mod adapters;
pub mod http;
pub mod middleware;
pub mod observability;
