//! Storage error types.

use thiserror::Error;

/// Storage-specific errors.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Backend connection error.
    #[error("database connection error: {message}")]
    ConnectionError { message: String },

    /// Backend query error.
    #[error("database query error: {message}")]
    QueryError { message: String },

    /// A query exceeded its deadline.
    #[error("query timeout after {timeout_ms}ms: {operation}")]
    QueryTimeout { operation: String, timeout_ms: u64 },

    /// Health check failed.
    #[error("health check failed: {message}")]
    HealthCheckFailed { message: String },

    /// Invalid input error.
    #[error("invalid input: {message}")]
    InvalidInput { message: String },

    /// Serialization error.
    #[error("serialization error: {message}")]
    SerializationError { message: String },

    /// A fixture file could not be read.
    #[error("failed to read fixture {path}: {message}")]
    FixtureError { path: String, message: String },

    /// Internal error.
    #[error("internal storage error: {message}")]
    InternalError { message: String },
}

/// Result type for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;
