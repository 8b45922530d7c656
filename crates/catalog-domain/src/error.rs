//! Domain error types for catalog operations.

use thiserror::Error;

/// Domain-specific errors raised by collaborators.
#[derive(Debug, Error)]
pub enum DomainError {
    /// The backing store failed while serving a read.
    #[error("storage operation failed: {reason}")]
    StorageOperationFailed { reason: String },

    /// The backing store did not answer in time.
    #[error("timeout after {duration_ms}ms")]
    Timeout { duration_ms: u64 },

    /// The backing store is not reachable.
    #[error("storage unavailable: {reason}")]
    Unavailable { reason: String },

    /// A stored value could not be decoded into a domain type.
    #[error("invalid stored data: {message}")]
    InvalidData { message: String },
}

/// Result type for domain operations.
pub type DomainResult<T> = Result<T, DomainError>;
