//! Data types for batch subject lookup.

use std::collections::HashMap;

use catalog_domain::model::{MetaTag, Subject, SubjectFilter, SubjectId};
use catalog_domain::DomainError;

/// Maximum number of ids accepted in one batch request.
pub const MAX_BATCH_SIZE: usize = 50;

/// Default number of episode counts allowed in flight per request.
pub const DEFAULT_EPISODE_COUNT_CONCURRENCY: usize = 4;

/// Tuning for the batch handler.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchConfig {
    /// Upper bound on concurrent episode counts per request.
    /// `1` issues them strictly one after another.
    pub episode_count_concurrency: usize,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            episode_count_concurrency: DEFAULT_EPISODE_COUNT_CONCURRENCY,
        }
    }
}

impl BatchConfig {
    /// Sets the episode count concurrency. Values below 1 are raised to 1.
    pub fn with_episode_count_concurrency(mut self, concurrency: usize) -> Self {
        self.episode_count_concurrency = concurrency.max(1);
        self
    }
}

/// Request for a batch lookup.
#[derive(Debug, Clone)]
pub struct SubjectBatchRequest {
    /// Raw ids in caller order, duplicates included.
    pub ids: Vec<i64>,
    /// Visibility filter derived from the caller's access context.
    pub filter: SubjectFilter,
}

impl SubjectBatchRequest {
    /// Creates a new batch request.
    pub fn new(ids: Vec<i64>, filter: SubjectFilter) -> Self {
        Self { ids, filter }
    }
}

/// A resolved record combined with its meta tags and episode total.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnrichedSubject {
    pub subject: Subject,
    pub meta_tags: Vec<MetaTag>,
    pub total_episodes: u64,
}

/// Response from a batch lookup.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SubjectBatchResponse {
    /// One entry per resolved occurrence, in request order.
    pub data: Vec<EnrichedSubject>,
    /// Distinct unresolved ids, in order of first appearance.
    pub missing: Vec<SubjectId>,
    /// Requested id to redirect target, one entry per distinct id.
    pub redirects: HashMap<SubjectId, SubjectId>,
}

/// Errors that can occur during a batch lookup.
#[derive(Debug, thiserror::Error)]
pub enum BatchError {
    /// The request contains no ids.
    #[error("ids is required")]
    EmptyBatch,

    /// The request exceeds the maximum allowed size.
    #[error("batch size {size} exceeds maximum allowed {max}")]
    BatchTooLarge { size: usize, max: usize },

    /// An id is not a valid subject id.
    #[error("invalid id at index {index}: {reason} (got {value})")]
    InvalidId {
        index: usize,
        value: i64,
        reason: &'static str,
    },

    /// A collaborator failed; `operation` names the failing call.
    #[error("{operation}: {source}")]
    Collaborator {
        operation: &'static str,
        #[source]
        source: DomainError,
    },
}

impl BatchError {
    pub(crate) fn collaborator(operation: &'static str, source: DomainError) -> Self {
        BatchError::Collaborator { operation, source }
    }

    /// Returns true for errors caused by the request itself.
    pub fn is_validation(&self) -> bool {
        !matches!(self, BatchError::Collaborator { .. })
    }
}

/// Result type for batch operations.
pub type BatchResult<T> = Result<T, BatchError>;
