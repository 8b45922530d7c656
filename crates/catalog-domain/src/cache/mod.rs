//! Subject record caching with TTL.
//!
//! This module puts a Moka cache in front of any [`SubjectReader`].
//!
//! # Architecture
//!
//! Moka's async Cache provides:
//! - Lock-free concurrent reads
//! - Automatic TTL-based eviction
//! - Memory-bounded storage
//!
//! # Visibility
//!
//! Entries hold the *unfiltered* record. The caller's [`SubjectFilter`] is
//! applied when reading out of the cache, so a single entry serves callers
//! with different access contexts. Cache misses are loaded from the inner
//! reader with an unrestricted filter.
//!
//! Ids the inner reader does not return are never cached.
//!
//! # Example
//!
//! ```rust,ignore
//! use catalog_domain::cache::{CachedSubjectReader, SubjectCache, SubjectCacheConfig};
//!
//! let cache = SubjectCache::new(SubjectCacheConfig::default().with_enabled(true));
//! let reader = CachedSubjectReader::new(inner_reader, Arc::new(cache));
//! let subjects = reader.get_by_ids(&ids, &SubjectFilter::for_access(false)).await?;
//! ```

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use moka::future::Cache;
use tracing::debug;

use crate::error::DomainResult;
use crate::model::{Subject, SubjectFilter, SubjectId};
use crate::repository::SubjectReader;

/// Configuration for the subject cache.
///
/// Caching is disabled by default. Merges and edits become visible only
/// after the TTL expires when it is on.
#[derive(Debug, Clone)]
pub struct SubjectCacheConfig {
    /// Whether caching is enabled.
    pub enabled: bool,
    /// Maximum number of records in the cache.
    pub max_capacity: u64,
    /// Time-to-live for cached records.
    pub ttl: Duration,
}

impl Default for SubjectCacheConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            max_capacity: 10_000,
            ttl: Duration::from_secs(60),
        }
    }
}

impl SubjectCacheConfig {
    /// Enables or disables caching.
    pub fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    /// Sets the maximum capacity.
    pub fn with_max_capacity(mut self, max_capacity: u64) -> Self {
        self.max_capacity = max_capacity;
        self
    }

    /// Sets the TTL.
    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }
}

/// TTL cache of subject records keyed by id.
#[derive(Clone)]
pub struct SubjectCache {
    cache: Cache<SubjectId, Subject>,
    config: SubjectCacheConfig,
}

impl std::fmt::Debug for SubjectCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SubjectCache")
            .field("config", &self.config)
            .field("entry_count", &self.cache.entry_count())
            .finish()
    }
}

impl SubjectCache {
    /// Creates a new subject cache with the given configuration.
    pub fn new(config: SubjectCacheConfig) -> Self {
        let cache = Cache::builder()
            .max_capacity(config.max_capacity)
            .time_to_live(config.ttl)
            .build();

        Self { cache, config }
    }

    /// Returns the configuration for this cache.
    pub fn config(&self) -> &SubjectCacheConfig {
        &self.config
    }

    /// Returns whether caching is enabled.
    pub fn is_enabled(&self) -> bool {
        self.config.enabled
    }

    /// Inserts a record.
    pub async fn insert(&self, subject: Subject) {
        self.cache.insert(subject.id, subject).await;
    }

    /// Retrieves a cached record.
    ///
    /// Records `catalog_subject_cache_hits_total` / `catalog_subject_cache_misses_total`.
    pub async fn get(&self, id: SubjectId) -> Option<Subject> {
        let result = self.cache.get(&id).await;
        if result.is_some() {
            metrics::counter!("catalog_subject_cache_hits_total").increment(1);
        } else {
            metrics::counter!("catalog_subject_cache_misses_total").increment(1);
        }
        result
    }

    /// Removes a single record.
    pub async fn invalidate(&self, id: SubjectId) {
        self.cache.invalidate(&id).await;
    }

    /// Returns the approximate number of entries in the cache.
    pub fn entry_count(&self) -> u64 {
        self.cache.entry_count()
    }

    /// Runs pending maintenance tasks (evictions). Useful in tests.
    pub async fn run_pending_tasks(&self) {
        self.cache.run_pending_tasks().await;
    }
}

/// A [`SubjectReader`] that serves records from a [`SubjectCache`] and
/// falls back to the inner reader for misses.
pub struct CachedSubjectReader<R: SubjectReader> {
    inner: Arc<R>,
    cache: Arc<SubjectCache>,
}

impl<R: SubjectReader> CachedSubjectReader<R> {
    pub fn new(inner: Arc<R>, cache: Arc<SubjectCache>) -> Self {
        Self { inner, cache }
    }

    /// Returns the underlying cache.
    pub fn cache(&self) -> &Arc<SubjectCache> {
        &self.cache
    }
}

#[async_trait]
impl<R: SubjectReader> SubjectReader for CachedSubjectReader<R> {
    async fn get_by_ids(
        &self,
        ids: &[SubjectId],
        filter: &SubjectFilter,
    ) -> DomainResult<HashMap<SubjectId, Subject>> {
        if !self.cache.is_enabled() {
            return self.inner.get_by_ids(ids, filter).await;
        }

        let mut found = HashMap::with_capacity(ids.len());
        let mut misses = Vec::new();
        for &id in ids {
            match self.cache.get(id).await {
                Some(subject) => {
                    found.insert(id, subject);
                }
                None => misses.push(id),
            }
        }

        debug!(
            requested = ids.len(),
            hits = found.len(),
            misses = misses.len(),
            "subject cache lookup"
        );

        if !misses.is_empty() {
            let loaded = self
                .inner
                .get_by_ids(&misses, &SubjectFilter::unrestricted())
                .await?;
            for (id, subject) in loaded {
                self.cache.insert(subject.clone()).await;
                found.insert(id, subject);
            }
        }

        found.retain(|_, subject| filter.allows(subject));
        Ok(found)
    }
}
