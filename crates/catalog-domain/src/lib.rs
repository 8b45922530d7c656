//! catalog-domain: Core catalog domain types
//!
//! This crate contains the pieces every other layer agrees on:
//! - Subject, tag and episode types plus the visibility filter
//! - Collaborator traits the batch handler fetches through
//! - An optional TTL cache in front of the subject reader
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │               catalog-domain                │
//! ├─────────────────────────────────────────────┤
//! │  model/      - Subject, tags, filters       │
//! │  repository/ - Reader/counter traits        │
//! │  cache/      - Cached subject reader        │
//! └─────────────────────────────────────────────┘
//! ```

pub mod cache;
pub mod error;
pub mod model;
pub mod repository;

// Re-export commonly used types at the crate root
pub use cache::{CachedSubjectReader, SubjectCache, SubjectCacheConfig};
pub use error::{DomainError, DomainResult};
