//! In-memory storage implementation.
//!
//! All tables are `DashMap`s keyed by subject id, so reads never take a
//! global lock and concurrent requests do not contend with each other.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use dashmap::DashMap;
use tracing::instrument;

use crate::error::StorageResult;
use crate::traits::{
    validate_episode, validate_subject, DataStore, StoredEpisode, StoredMetaTag, StoredSubject,
};

/// In-memory implementation of DataStore.
///
/// # Performance Characteristics
///
/// - **Get subjects**: O(K) for K requested ids
/// - **Get meta tags**: O(K) for K requested ids
/// - **Count episodes**: O(E) where E is episodes of that subject
/// - **Writes**: O(1) average (DashMap insert)
#[derive(Debug, Default)]
pub struct MemoryDataStore {
    subjects: DashMap<u32, StoredSubject>,
    meta_tags: DashMap<u32, Vec<StoredMetaTag>>,
    /// Episodes grouped by subject id, then keyed by episode id.
    episodes: DashMap<u32, HashMap<u32, StoredEpisode>>,
}

impl MemoryDataStore {
    /// Creates a new in-memory data store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a new in-memory data store wrapped in Arc.
    pub fn new_shared() -> Arc<Self> {
        Arc::new(Self::new())
    }

    /// Returns the number of stored subjects.
    pub fn subject_count(&self) -> usize {
        self.subjects.len()
    }
}

#[async_trait]
impl DataStore for MemoryDataStore {
    #[instrument(skip(self, ids), fields(ids = ids.len()))]
    async fn get_subjects(
        &self,
        ids: &[u32],
        nsfw: Option<bool>,
    ) -> StorageResult<Vec<StoredSubject>> {
        Ok(ids
            .iter()
            .filter_map(|id| self.subjects.get(id).map(|s| s.value().clone()))
            .filter(|s| nsfw.map_or(true, |nsfw| s.nsfw == nsfw))
            .collect())
    }

    async fn put_subject(&self, subject: StoredSubject) -> StorageResult<()> {
        validate_subject(&subject)?;
        self.subjects.insert(subject.id, subject);
        Ok(())
    }

    #[instrument(skip(self, subject_ids), fields(ids = subject_ids.len()))]
    async fn get_meta_tags(
        &self,
        subject_ids: &[u32],
    ) -> StorageResult<HashMap<u32, Vec<StoredMetaTag>>> {
        Ok(subject_ids
            .iter()
            .filter_map(|id| self.meta_tags.get(id).map(|t| (*id, t.value().clone())))
            .collect())
    }

    async fn put_meta_tags(&self, subject_id: u32, tags: Vec<StoredMetaTag>) -> StorageResult<()> {
        if tags.is_empty() {
            self.meta_tags.remove(&subject_id);
        } else {
            self.meta_tags.insert(subject_id, tags);
        }
        Ok(())
    }

    #[instrument(skip(self))]
    async fn count_episodes(&self, subject_id: u32, episode_type: Option<u8>) -> StorageResult<u64> {
        let count = self.episodes.get(&subject_id).map_or(0, |episodes| {
            episodes
                .values()
                .filter(|e| episode_type.map_or(true, |t| e.episode_type == t))
                .count()
        });
        Ok(count as u64)
    }

    async fn put_episode(&self, episode: StoredEpisode) -> StorageResult<()> {
        validate_episode(&episode)?;
        self.episodes
            .entry(episode.subject_id)
            .or_default()
            .insert(episode.id, episode);
        Ok(())
    }

    async fn health_check(&self) -> StorageResult<()> {
        Ok(())
    }
}
