//! Batch subject lookup.
//!
//! Resolves a list of subject ids into enriched records in one round trip:
//!
//! 1. **Validation**: non-empty, at most [`MAX_BATCH_SIZE`] ids, all positive
//! 2. **Deduplication**: storage is queried once per distinct id
//! 3. **Fetch**: records, meta tags, then episode totals for resolved records
//! 4. **Classification**: every requested id, in request order, becomes a
//!    data entry, a missing id or a redirect
//!
//! Data entries are produced per occurrence, so a duplicated id yields
//! duplicated entries. Missing ids and redirects are keyed by id and appear
//! once each.
//!
//! Any collaborator error aborts the whole batch. There are no partial
//! responses.

mod classify;
mod dedup;
mod handler;
mod types;
mod validate;

pub use classify::{classify, Outcome, ResponseBuilder};
pub use dedup::{unique_ids, OrderedSet};
pub use handler::SubjectBatchHandler;
pub use types::{
    BatchConfig, BatchError, BatchResult, EnrichedSubject, SubjectBatchRequest,
    SubjectBatchResponse, DEFAULT_EPISODE_COUNT_CONCURRENCY, MAX_BATCH_SIZE,
};
pub use validate::validate_ids;
