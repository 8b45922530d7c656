//! DataStore trait definition.

use std::collections::HashMap;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::{StorageError, StorageResult};

/// A stored subject row.
///
/// `redirect` is `0` for substantive subjects and holds the id of the
/// target subject for merged ones.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredSubject {
    pub id: u32,
    #[serde(rename = "type")]
    pub subject_type: u8,
    pub name: String,
    #[serde(default)]
    pub name_cn: String,
    #[serde(default)]
    pub summary: String,
    #[serde(default)]
    pub nsfw: bool,
    #[serde(default)]
    pub locked: bool,
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default)]
    pub platform: u16,
    #[serde(default)]
    pub volumes: u32,
    #[serde(default)]
    pub eps: u32,
    /// User tags as `(name, count)` pairs.
    #[serde(default)]
    pub tags: Vec<(String, u32)>,
    #[serde(default)]
    pub redirect: u32,
}

impl StoredSubject {
    /// Creates a row with only the required columns set.
    pub fn new(id: u32, subject_type: u8, name: impl Into<String>) -> Self {
        Self {
            id,
            subject_type,
            name: name.into(),
            name_cn: String::new(),
            summary: String::new(),
            nsfw: false,
            locked: false,
            date: None,
            platform: 0,
            volumes: 0,
            eps: 0,
            tags: Vec::new(),
            redirect: 0,
        }
    }
}

/// A stored meta tag row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredMetaTag {
    pub name: String,
    #[serde(default)]
    pub count: u32,
}

impl StoredMetaTag {
    pub fn new(name: impl Into<String>, count: u32) -> Self {
        Self {
            name: name.into(),
            count,
        }
    }
}

/// A stored episode row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredEpisode {
    pub id: u32,
    pub subject_id: u32,
    #[serde(rename = "type", default)]
    pub episode_type: u8,
    #[serde(default)]
    pub name: String,
}

/// Abstract storage interface for catalog data.
///
/// Implementations must be thread-safe (Send + Sync) and support
/// async operations.
#[async_trait]
pub trait DataStore: Send + Sync + 'static {
    // Subject operations

    /// Returns the subjects whose id is in `ids`.
    ///
    /// When `nsfw` is set, only subjects with a matching flag are returned.
    /// Unknown ids are skipped. Order of the result is unspecified.
    async fn get_subjects(&self, ids: &[u32], nsfw: Option<bool>)
        -> StorageResult<Vec<StoredSubject>>;

    /// Inserts or replaces a subject.
    async fn put_subject(&self, subject: StoredSubject) -> StorageResult<()>;

    // Tag operations

    /// Returns meta tags for each requested subject that has any.
    async fn get_meta_tags(
        &self,
        subject_ids: &[u32],
    ) -> StorageResult<HashMap<u32, Vec<StoredMetaTag>>>;

    /// Replaces the meta tags of a subject.
    async fn put_meta_tags(&self, subject_id: u32, tags: Vec<StoredMetaTag>)
        -> StorageResult<()>;

    // Episode operations

    /// Counts episodes of a subject, optionally restricted to one type.
    async fn count_episodes(&self, subject_id: u32, episode_type: Option<u8>)
        -> StorageResult<u64>;

    /// Inserts or replaces an episode.
    async fn put_episode(&self, episode: StoredEpisode) -> StorageResult<()>;

    // Health

    /// Verifies the backend can serve reads.
    async fn health_check(&self) -> StorageResult<()>;
}

/// Validates a subject row before it is written.
pub fn validate_subject(subject: &StoredSubject) -> StorageResult<()> {
    if subject.id == 0 {
        return Err(StorageError::InvalidInput {
            message: "subject id cannot be zero".to_string(),
        });
    }
    if subject.redirect == subject.id {
        return Err(StorageError::InvalidInput {
            message: format!("subject {} cannot redirect to itself", subject.id),
        });
    }
    Ok(())
}

/// Validates an episode row before it is written.
pub fn validate_episode(episode: &StoredEpisode) -> StorageResult<()> {
    if episode.id == 0 {
        return Err(StorageError::InvalidInput {
            message: "episode id cannot be zero".to_string(),
        });
    }
    if episode.subject_id == 0 {
        return Err(StorageError::InvalidInput {
            message: format!("episode {} has no subject", episode.id),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_subject_rejects_zero_id() {
        let subject = StoredSubject::new(0, 2, "zero");
        assert!(matches!(
            validate_subject(&subject),
            Err(StorageError::InvalidInput { .. })
        ));
    }

    #[test]
    fn test_validate_subject_rejects_self_redirect() {
        let mut subject = StoredSubject::new(4, 2, "loop");
        subject.redirect = 4;
        let err = validate_subject(&subject).unwrap_err();
        assert!(err.to_string().contains("redirect to itself"));
    }

    #[test]
    fn test_validate_episode_requires_subject() {
        let episode = StoredEpisode {
            id: 1,
            subject_id: 0,
            episode_type: 0,
            name: String::new(),
        };
        assert!(validate_episode(&episode).is_err());
    }

    #[test]
    fn test_stored_subject_defaults_optional_columns() {
        let subject: StoredSubject =
            serde_json::from_str(r#"{"id": 8, "type": 2, "name": "Cowboy Bebop"}"#).unwrap();
        assert_eq!(subject, StoredSubject::new(8, 2, "Cowboy Bebop"));
    }
}
