//! Traits for the read operations needed by the batch lookup.

use std::collections::HashMap;

use async_trait::async_trait;

use crate::error::DomainResult;
use crate::model::{EpisodeFilter, MetaTag, Subject, SubjectFilter, SubjectId};

/// Reads canonical subject records.
#[async_trait]
pub trait SubjectReader: Send + Sync {
    /// Fetches the records for `ids` that exist and pass `filter`.
    ///
    /// Ids that do not exist or are hidden by the filter are absent from
    /// the returned map. No error distinguishes the two cases.
    async fn get_by_ids(
        &self,
        ids: &[SubjectId],
        filter: &SubjectFilter,
    ) -> DomainResult<HashMap<SubjectId, Subject>>;
}

/// Reads meta tags attached to subjects.
#[async_trait]
pub trait TagReader: Send + Sync {
    /// Fetches meta tags for `ids`. Ids without tags may be absent.
    async fn get_by_ids(&self, ids: &[SubjectId]) -> DomainResult<HashMap<SubjectId, Vec<MetaTag>>>;
}

/// Counts episodes belonging to a subject.
#[async_trait]
pub trait EpisodeCounter: Send + Sync {
    async fn count(&self, subject_id: SubjectId, filter: &EpisodeFilter) -> DomainResult<u64>;
}
