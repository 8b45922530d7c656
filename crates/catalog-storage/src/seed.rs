//! JSON fixtures for seeding a store.
//!
//! A fixture file looks like:
//!
//! ```json
//! {
//!   "subjects": [{"id": 1, "type": 2, "name": "Cowboy Bebop"}],
//!   "meta_tags": {"1": [{"name": "TV", "count": 1}]},
//!   "episodes": [{"id": 10, "subject_id": 1, "type": 0}]
//! }
//! ```

use std::collections::HashMap;
use std::path::Path;

use serde::Deserialize;
use tracing::info;

use crate::error::{StorageError, StorageResult};
use crate::traits::{DataStore, StoredEpisode, StoredMetaTag, StoredSubject};

/// Catalog data loaded from a fixture file.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Fixture {
    #[serde(default)]
    pub subjects: Vec<StoredSubject>,
    #[serde(default)]
    pub meta_tags: HashMap<u32, Vec<StoredMetaTag>>,
    #[serde(default)]
    pub episodes: Vec<StoredEpisode>,
}

impl Fixture {
    /// Parses a fixture from a JSON string.
    pub fn from_json(json: &str) -> StorageResult<Self> {
        serde_json::from_str(json).map_err(|e| StorageError::SerializationError {
            message: e.to_string(),
        })
    }

    /// Reads and parses a fixture file.
    pub fn from_path<P: AsRef<Path>>(path: P) -> StorageResult<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|e| StorageError::FixtureError {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        Self::from_json(&contents)
    }

    /// Writes every row of the fixture into `store`.
    ///
    /// Stops at the first rejected row.
    pub async fn apply<S: DataStore + ?Sized>(&self, store: &S) -> StorageResult<()> {
        for subject in &self.subjects {
            store.put_subject(subject.clone()).await?;
        }
        for (subject_id, tags) in &self.meta_tags {
            store.put_meta_tags(*subject_id, tags.clone()).await?;
        }
        for episode in &self.episodes {
            store.put_episode(episode.clone()).await?;
        }

        info!(
            subjects = self.subjects.len(),
            tagged = self.meta_tags.len(),
            episodes = self.episodes.len(),
            "fixture loaded"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::MemoryDataStore;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const FIXTURE: &str = r#"{
        "subjects": [
            {"id": 1, "type": 2, "name": "one", "tags": [["mecha", 4]]},
            {"id": 2, "type": 2, "name": "", "redirect": 5}
        ],
        "meta_tags": {"1": [{"name": "TV", "count": 1}]},
        "episodes": [
            {"id": 10, "subject_id": 1, "type": 0},
            {"id": 11, "subject_id": 1, "type": 1}
        ]
    }"#;

    #[test]
    fn test_parses_fixture() {
        let fixture = Fixture::from_json(FIXTURE).unwrap();
        assert_eq!(fixture.subjects.len(), 2);
        assert_eq!(fixture.subjects[0].tags, vec![("mecha".to_string(), 4)]);
        assert_eq!(fixture.subjects[1].redirect, 5);
        assert_eq!(fixture.meta_tags[&1][0].name, "TV");
        assert_eq!(fixture.episodes[1].episode_type, 1);
    }

    #[test]
    fn test_invalid_json_is_serialization_error() {
        let err = Fixture::from_json("{not json").unwrap_err();
        assert!(matches!(err, StorageError::SerializationError { .. }));
    }

    #[test]
    fn test_missing_file_is_fixture_error() {
        let err = Fixture::from_path("/nonexistent/fixture.json").unwrap_err();
        assert!(matches!(err, StorageError::FixtureError { .. }));
        assert!(err.to_string().contains("/nonexistent/fixture.json"));
    }

    #[tokio::test]
    async fn test_apply_seeds_store_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "{FIXTURE}").unwrap();

        let store = MemoryDataStore::new();
        Fixture::from_path(file.path())
            .unwrap()
            .apply(&store)
            .await
            .unwrap();

        assert_eq!(store.subject_count(), 2);
        assert_eq!(store.count_episodes(1, None).await.unwrap(), 2);
        assert_eq!(store.get_meta_tags(&[1]).await.unwrap().len(), 1);
    }
}
