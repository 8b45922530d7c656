//! Catalog model types.
//!
//! This module contains:
//! - Identifiers (`SubjectId`)
//! - The canonical subject record and its tags
//! - Episode and visibility filters passed to collaborators

mod types;

pub use types::*;
