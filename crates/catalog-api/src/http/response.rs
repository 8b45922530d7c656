//! Wire types for `/v0/subjects`.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use catalog_domain::model::{SubjectId, SubjectType, Tag};
use catalog_server::handlers::batch::{EnrichedSubject, SubjectBatchResponse};

/// Request body for `POST /v0/subjects`.
///
/// Ids are taken as signed integers so zero and negative values reach
/// validation instead of failing deserialization.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SubjectBatchBody {
    pub ids: Vec<i64>,
}

/// A resolved subject as rendered by the v0 API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubjectV0 {
    pub id: SubjectId,
    #[serde(rename = "type")]
    pub subject_type: SubjectType,
    pub name: String,
    pub name_cn: String,
    pub summary: String,
    pub nsfw: bool,
    pub locked: bool,
    pub date: Option<String>,
    pub platform: u16,
    pub volumes: u32,
    pub eps: u32,
    pub total_episodes: u64,
    pub meta_tags: Vec<String>,
    pub tags: Vec<Tag>,
}

impl From<EnrichedSubject> for SubjectV0 {
    fn from(entry: EnrichedSubject) -> Self {
        let EnrichedSubject {
            subject,
            meta_tags,
            total_episodes,
        } = entry;

        Self {
            id: subject.id,
            subject_type: subject.subject_type,
            name: subject.name,
            name_cn: subject.name_cn,
            summary: subject.summary,
            nsfw: subject.nsfw,
            locked: subject.locked,
            date: subject.date,
            platform: subject.platform,
            volumes: subject.volumes,
            eps: subject.eps,
            total_episodes,
            meta_tags: meta_tags.into_iter().map(|tag| tag.name).collect(),
            tags: subject.tags,
        }
    }
}

/// Response body for `POST /v0/subjects`.
///
/// `redirects` is `null` when no requested id redirects. Keys are sorted so
/// identical lookups serialize to identical bytes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubjectBatchV0 {
    pub data: Vec<SubjectV0>,
    pub missing: Vec<SubjectId>,
    pub redirects: Option<BTreeMap<SubjectId, SubjectId>>,
}

impl From<SubjectBatchResponse> for SubjectBatchV0 {
    fn from(response: SubjectBatchResponse) -> Self {
        let redirects = if response.redirects.is_empty() {
            None
        } else {
            Some(response.redirects.into_iter().collect())
        };

        Self {
            data: response.data.into_iter().map(SubjectV0::from).collect(),
            missing: response.missing,
            redirects,
        }
    }
}
