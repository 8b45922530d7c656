//! Application state for HTTP handlers.

use std::sync::Arc;

use catalog_domain::cache::{CachedSubjectReader, SubjectCache, SubjectCacheConfig};
use catalog_server::handlers::batch::{BatchConfig, SubjectBatchHandler};
use catalog_storage::DataStore;

use crate::adapters::{DataStoreEpisodeCounter, DataStoreSubjectReader, DataStoreTagReader};

/// Subject reader used by the HTTP layer: storage behind the record cache.
pub type SubjectSource<S> = CachedSubjectReader<DataStoreSubjectReader<S>>;

/// Batch handler wired to a `DataStore`.
pub type StoreBatchHandler<S> =
    SubjectBatchHandler<SubjectSource<S>, DataStoreTagReader<S>, DataStoreEpisodeCounter<S>>;

/// Application state shared across all HTTP handlers.
///
/// Adapters bridge the storage layer to the domain traits the batch
/// handler reads through. Subject records always pass through the cache
/// decorator, which forwards straight to storage while caching is disabled.
#[derive(Clone)]
pub struct AppState<S: DataStore> {
    /// The storage backend.
    pub storage: Arc<S>,
    /// The batch subject lookup handler.
    pub batch_handler: Arc<StoreBatchHandler<S>>,
    /// The subject record cache.
    pub cache: Arc<SubjectCache>,
}

impl<S: DataStore> AppState<S> {
    /// Creates a new application state with default batch and cache settings.
    pub fn new(storage: Arc<S>) -> Self {
        Self::with_config(storage, BatchConfig::default(), SubjectCacheConfig::default())
    }

    /// Creates a new application state with custom settings.
    pub fn with_config(
        storage: Arc<S>,
        batch_config: BatchConfig,
        cache_config: SubjectCacheConfig,
    ) -> Self {
        let cache = Arc::new(SubjectCache::new(cache_config));

        let subjects = Arc::new(CachedSubjectReader::new(
            Arc::new(DataStoreSubjectReader::new(Arc::clone(&storage))),
            Arc::clone(&cache),
        ));
        let tags = Arc::new(DataStoreTagReader::new(Arc::clone(&storage)));
        let episodes = Arc::new(DataStoreEpisodeCounter::new(Arc::clone(&storage)));

        let batch_handler = Arc::new(SubjectBatchHandler::with_config(
            subjects,
            tags,
            episodes,
            batch_config,
        ));

        Self {
            storage,
            batch_handler,
            cache,
        }
    }
}
