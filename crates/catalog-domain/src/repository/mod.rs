//! Collaborator interfaces used by the batch lookup.
//!
//! The batch handler never touches storage directly. It reads through three
//! narrow traits so that storage backends, caches and test doubles can be
//! swapped independently.

mod traits;

pub use traits::{EpisodeCounter, SubjectReader, TagReader};
