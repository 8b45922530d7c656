//! Adapters that bridge storage layer to domain layer.
//!
//! The domain layer (catalog-domain) defines the read traits the batch
//! handler depends on:
//! - `SubjectReader`: canonical subject records under a visibility filter
//! - `TagReader`: meta tags per subject
//! - `EpisodeCounter`: episode totals per subject
//!
//! The storage layer (catalog-storage) implements `DataStore` over raw rows.
//! This module converts rows into domain types and storage errors into
//! domain errors.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;

use catalog_domain::error::{DomainError, DomainResult};
use catalog_domain::model::{
    EpisodeFilter, MetaTag, Subject, SubjectFilter, SubjectId, SubjectType, Tag,
};
use catalog_domain::repository::{EpisodeCounter, SubjectReader, TagReader};
use catalog_storage::{DataStore, StorageError, StoredMetaTag, StoredSubject};

/// Maps a storage failure onto the domain error taxonomy.
pub fn storage_to_domain(err: StorageError) -> DomainError {
    match err {
        StorageError::QueryTimeout { timeout_ms, .. } => DomainError::Timeout {
            duration_ms: timeout_ms,
        },
        StorageError::ConnectionError { message } | StorageError::HealthCheckFailed { message } => {
            DomainError::Unavailable { reason: message }
        }
        other => DomainError::StorageOperationFailed {
            reason: other.to_string(),
        },
    }
}

/// Converts a stored row into a domain record.
///
/// A redirect column of `0` means the record is substantive.
pub fn subject_from_row(row: StoredSubject) -> DomainResult<Subject> {
    let id = SubjectId::new(row.id).map_err(|reason| DomainError::InvalidData {
        message: format!("subject row id {}: {reason}", row.id),
    })?;
    let subject_type =
        SubjectType::try_from(row.subject_type).map_err(|message| DomainError::InvalidData {
            message: format!("subject {id}: {message}"),
        })?;
    let redirect = match row.redirect {
        0 => None,
        target => Some(SubjectId::new(target).map_err(|reason| DomainError::InvalidData {
            message: format!("subject {id} redirect: {reason}"),
        })?),
    };

    Ok(Subject {
        id,
        subject_type,
        name: row.name,
        name_cn: row.name_cn,
        summary: row.summary,
        nsfw: row.nsfw,
        locked: row.locked,
        date: row.date,
        platform: row.platform,
        volumes: row.volumes,
        eps: row.eps,
        tags: row
            .tags
            .into_iter()
            .map(|(name, count)| Tag::new(name, count))
            .collect(),
        redirect,
    })
}

fn raw_ids(ids: &[SubjectId]) -> Vec<u32> {
    ids.iter().map(|id| id.get()).collect()
}

/// Adapter that implements `SubjectReader` using a `DataStore`.
///
/// The visibility filter is pushed down to storage.
pub struct DataStoreSubjectReader<S: DataStore> {
    storage: Arc<S>,
}

impl<S: DataStore> DataStoreSubjectReader<S> {
    /// Creates a new adapter wrapping the given storage.
    pub fn new(storage: Arc<S>) -> Self {
        Self { storage }
    }
}

#[async_trait]
impl<S: DataStore> SubjectReader for DataStoreSubjectReader<S> {
    async fn get_by_ids(
        &self,
        ids: &[SubjectId],
        filter: &SubjectFilter,
    ) -> DomainResult<HashMap<SubjectId, Subject>> {
        let rows = self
            .storage
            .get_subjects(&raw_ids(ids), filter.nsfw)
            .await
            .map_err(storage_to_domain)?;

        rows.into_iter()
            .map(|row| subject_from_row(row).map(|subject| (subject.id, subject)))
            .collect()
    }
}

/// Adapter that implements `TagReader` using a `DataStore`.
pub struct DataStoreTagReader<S: DataStore> {
    storage: Arc<S>,
}

impl<S: DataStore> DataStoreTagReader<S> {
    pub fn new(storage: Arc<S>) -> Self {
        Self { storage }
    }
}

#[async_trait]
impl<S: DataStore> TagReader for DataStoreTagReader<S> {
    async fn get_by_ids(&self, ids: &[SubjectId]) -> DomainResult<HashMap<SubjectId, Vec<MetaTag>>> {
        let rows = self
            .storage
            .get_meta_tags(&raw_ids(ids))
            .await
            .map_err(storage_to_domain)?;

        // Rows for ids we did not ask for are dropped rather than trusted.
        Ok(ids
            .iter()
            .filter_map(|id| {
                rows.get(&id.get()).map(|tags| {
                    let tags = tags
                        .iter()
                        .map(|StoredMetaTag { name, count }| MetaTag::new(name.clone(), *count))
                        .collect();
                    (*id, tags)
                })
            })
            .collect())
    }
}

/// Adapter that implements `EpisodeCounter` using a `DataStore`.
pub struct DataStoreEpisodeCounter<S: DataStore> {
    storage: Arc<S>,
}

impl<S: DataStore> DataStoreEpisodeCounter<S> {
    pub fn new(storage: Arc<S>) -> Self {
        Self { storage }
    }
}

#[async_trait]
impl<S: DataStore> EpisodeCounter for DataStoreEpisodeCounter<S> {
    async fn count(&self, subject_id: SubjectId, filter: &EpisodeFilter) -> DomainResult<u64> {
        self.storage
            .count_episodes(subject_id.get(), filter.episode_type.map(|t| t.code()))
            .await
            .map_err(storage_to_domain)
    }
}
