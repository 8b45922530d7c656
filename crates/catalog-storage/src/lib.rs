//! catalog-storage: Storage abstraction layer
//!
//! This crate provides the storage abstraction for the catalog, including:
//! - DataStore trait for subject, tag and episode reads
//! - In-memory implementation for tests and small deployments
//! - JSON fixture loading to seed a store
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │              catalog-storage                │
//! ├─────────────────────────────────────────────┤
//! │  traits.rs   - DataStore trait definition   │
//! │  memory.rs   - In-memory implementation     │
//! │  seed.rs     - JSON fixture loader          │
//! └─────────────────────────────────────────────┘
//! ```

pub mod error;
pub mod memory;
pub mod seed;
pub mod traits;

// Re-export commonly used types
pub use error::{StorageError, StorageResult};
pub use memory::MemoryDataStore;
pub use seed::Fixture;
pub use traits::{DataStore, StoredEpisode, StoredMetaTag, StoredSubject};
