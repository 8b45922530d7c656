//! Batch subject lookup handler implementation.

use std::collections::HashMap;
use std::sync::Arc;

use catalog_domain::model::{EpisodeFilter, Subject, SubjectId};
use catalog_domain::repository::{EpisodeCounter, SubjectReader, TagReader};
use futures::stream::{self, StreamExt, TryStreamExt};
use tracing::{debug, error, instrument};

use super::classify::classify;
use super::dedup::unique_ids;
use super::types::{
    BatchConfig, BatchError, BatchResult, SubjectBatchRequest, SubjectBatchResponse,
};
use super::validate::validate_ids;

/// Handler for batch subject lookups.
///
/// Holds the three collaborators it reads through. The handler keeps no
/// per-request state, so a single instance serves concurrent requests.
pub struct SubjectBatchHandler<S, T, E>
where
    S: SubjectReader,
    T: TagReader,
    E: EpisodeCounter,
{
    /// Canonical record source (visibility filtered).
    subjects: Arc<S>,
    /// Meta tag source.
    tags: Arc<T>,
    /// Episode total source.
    episodes: Arc<E>,
    config: BatchConfig,
}

impl<S, T, E> SubjectBatchHandler<S, T, E>
where
    S: SubjectReader,
    T: TagReader,
    E: EpisodeCounter,
{
    /// Creates a new handler with the default configuration.
    pub fn new(subjects: Arc<S>, tags: Arc<T>, episodes: Arc<E>) -> Self {
        Self::with_config(subjects, tags, episodes, BatchConfig::default())
    }

    /// Creates a new handler with a custom configuration.
    pub fn with_config(
        subjects: Arc<S>,
        tags: Arc<T>,
        episodes: Arc<E>,
        config: BatchConfig,
    ) -> Self {
        Self {
            subjects,
            tags,
            episodes,
            config,
        }
    }

    pub fn config(&self) -> &BatchConfig {
        &self.config
    }

    /// Validates raw request ids. See [`validate_ids`].
    pub fn validate(&self, ids: &[i64]) -> BatchResult<Vec<SubjectId>> {
        validate_ids(ids)
    }

    /// Executes a batch lookup.
    ///
    /// Validation runs before any collaborator is called. Records and meta
    /// tags are each fetched once for the distinct ids; episode totals are
    /// fetched once per distinct resolved, non-redirected id. The first
    /// collaborator error aborts the request.
    #[instrument(skip_all, fields(requested = request.ids.len()))]
    pub async fn get(&self, request: SubjectBatchRequest) -> BatchResult<SubjectBatchResponse> {
        let order = self.validate(&request.ids)?;
        let unique = unique_ids(&order);

        debug!(unique = unique.len(), "deduplicated batch ids");
        metrics::counter!("catalog_subject_batch_ids_total").increment(order.len() as u64);
        metrics::histogram!("catalog_subject_batch_unique_ids").record(unique.len() as f64);

        let subjects = self
            .subjects
            .get_by_ids(&unique, &request.filter)
            .await
            .map_err(|source| fail("subject.get_by_ids", source))?;

        let tags = self
            .tags
            .get_by_ids(&unique)
            .await
            .map_err(|source| fail("tag.get_by_ids", source))?;

        let episode_totals = self.count_episodes(&unique, &subjects).await?;

        let response = classify(&order, &subjects, &tags, &episode_totals);
        record_outcomes(&order, &response);

        debug!(
            data = response.data.len(),
            missing = response.missing.len(),
            redirects = response.redirects.len(),
            "batch lookup complete"
        );

        Ok(response)
    }

    /// Fetches episode totals for every resolved, non-redirected id.
    ///
    /// At most `episode_count_concurrency` counts run at once. Returning on
    /// the first error drops the stream, which cancels the counts still in
    /// flight.
    async fn count_episodes(
        &self,
        unique: &[SubjectId],
        subjects: &HashMap<SubjectId, Subject>,
    ) -> BatchResult<HashMap<SubjectId, u64>> {
        let resolved: Vec<SubjectId> = unique
            .iter()
            .copied()
            .filter(|id| subjects.get(id).is_some_and(|s| !s.is_redirect()))
            .collect();

        if resolved.is_empty() {
            return Ok(HashMap::new());
        }

        let episodes = &self.episodes;
        let filter = EpisodeFilter::default();

        stream::iter(resolved)
            .map(|id| async move {
                episodes
                    .count(id, &filter)
                    .await
                    .map(|total| (id, total))
                    .map_err(|source| fail("episode.count", source))
            })
            .buffer_unordered(self.config.episode_count_concurrency.max(1))
            .try_collect()
            .await
    }
}

fn fail(operation: &'static str, source: catalog_domain::DomainError) -> BatchError {
    error!(operation, error = %source, "batch lookup collaborator failed");
    BatchError::collaborator(operation, source)
}

/// Emits per-outcome counters. Data is counted per occurrence; missing and
/// redirected ids per distinct id, matching the response shape.
fn record_outcomes(order: &[SubjectId], response: &SubjectBatchResponse) {
    metrics::counter!("catalog_subject_batch_outcomes_total", "outcome" => "resolved")
        .increment(response.data.len() as u64);
    metrics::counter!("catalog_subject_batch_outcomes_total", "outcome" => "missing")
        .increment(response.missing.len() as u64);
    metrics::counter!("catalog_subject_batch_outcomes_total", "outcome" => "redirect")
        .increment(response.redirects.len() as u64);
    metrics::histogram!("catalog_subject_batch_size").record(order.len() as f64);
}
