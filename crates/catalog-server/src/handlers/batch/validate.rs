//! Request validation.

use catalog_domain::model::SubjectId;

use super::types::{BatchError, BatchResult, MAX_BATCH_SIZE};

/// Validates raw request ids and converts them to [`SubjectId`]s.
///
/// Checks, in order: the list is non-empty, it holds at most
/// [`MAX_BATCH_SIZE`] ids, and every id is a positive `u32`. The first
/// failing check wins. On success the ids come back in the same order,
/// duplicates included.
pub fn validate_ids(ids: &[i64]) -> BatchResult<Vec<SubjectId>> {
    if ids.is_empty() {
        return Err(BatchError::EmptyBatch);
    }

    if ids.len() > MAX_BATCH_SIZE {
        return Err(BatchError::BatchTooLarge {
            size: ids.len(),
            max: MAX_BATCH_SIZE,
        });
    }

    ids.iter()
        .enumerate()
        .map(|(index, &value)| {
            SubjectId::try_from_raw(value).map_err(|reason| BatchError::InvalidId {
                index,
                value,
                reason,
            })
        })
        .collect()
}
