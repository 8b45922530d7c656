//! Classification of requested ids and response assembly.

use std::collections::HashMap;

use catalog_domain::model::{MetaTag, Subject, SubjectId};

use super::dedup::OrderedSet;
use super::types::{EnrichedSubject, SubjectBatchResponse};

/// How a single requested id resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome<'a> {
    /// No visible record exists.
    Missing,
    /// The record was merged into the given subject.
    Redirect(SubjectId),
    /// The record exists and is substantive.
    Resolved(&'a Subject),
}

impl<'a> Outcome<'a> {
    /// Classifies `id` against the fetched records.
    ///
    /// Redirects are resolved one hop only: the target is reported as-is.
    pub fn of(id: SubjectId, subjects: &'a HashMap<SubjectId, Subject>) -> Self {
        match subjects.get(&id) {
            None => Outcome::Missing,
            Some(subject) => match subject.redirect {
                Some(target) => Outcome::Redirect(target),
                None => Outcome::Resolved(subject),
            },
        }
    }
}

/// Accumulates classified ids into a [`SubjectBatchResponse`].
///
/// Data entries are appended per occurrence. Missing ids and redirects are
/// recorded once per distinct id.
#[derive(Debug)]
pub struct ResponseBuilder<'a> {
    tags: &'a HashMap<SubjectId, Vec<MetaTag>>,
    episode_totals: &'a HashMap<SubjectId, u64>,
    data: Vec<EnrichedSubject>,
    missing: OrderedSet<SubjectId>,
    redirects: HashMap<SubjectId, SubjectId>,
}

impl<'a> ResponseBuilder<'a> {
    pub fn new(
        capacity: usize,
        tags: &'a HashMap<SubjectId, Vec<MetaTag>>,
        episode_totals: &'a HashMap<SubjectId, u64>,
    ) -> Self {
        Self {
            tags,
            episode_totals,
            data: Vec::with_capacity(capacity),
            missing: OrderedSet::new(),
            redirects: HashMap::new(),
        }
    }

    /// Records the outcome for one occurrence of `id`.
    pub fn push(&mut self, id: SubjectId, outcome: Outcome<'_>) {
        match outcome {
            Outcome::Missing => {
                self.missing.insert(id);
            }
            Outcome::Redirect(target) => {
                self.redirects.insert(id, target);
            }
            Outcome::Resolved(subject) => {
                self.data.push(EnrichedSubject {
                    subject: subject.clone(),
                    meta_tags: self.tags.get(&id).cloned().unwrap_or_default(),
                    total_episodes: self.episode_totals.get(&id).copied().unwrap_or_default(),
                });
            }
        }
    }

    pub fn finish(self) -> SubjectBatchResponse {
        SubjectBatchResponse {
            data: self.data,
            missing: self.missing.into_vec(),
            redirects: self.redirects,
        }
    }
}

/// Classifies every id of `order` (duplicates included) and assembles the
/// response.
pub fn classify(
    order: &[SubjectId],
    subjects: &HashMap<SubjectId, Subject>,
    tags: &HashMap<SubjectId, Vec<MetaTag>>,
    episode_totals: &HashMap<SubjectId, u64>,
) -> SubjectBatchResponse {
    let mut builder = ResponseBuilder::new(order.len(), tags, episode_totals);
    for &id in order {
        builder.push(id, Outcome::of(id, subjects));
    }
    builder.finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use catalog_domain::model::SubjectType;

    fn sid(value: u32) -> SubjectId {
        SubjectId::new(value).unwrap()
    }

    fn subjects(records: Vec<Subject>) -> HashMap<SubjectId, Subject> {
        records.into_iter().map(|s| (s.id, s)).collect()
    }

    #[test]
    fn test_outcome_of_each_class() {
        let records = subjects(vec![
            Subject::new(sid(1), SubjectType::Anime, "one"),
            Subject::redirect_stub(sid(2), SubjectType::Anime, sid(5)),
        ]);

        assert!(matches!(Outcome::of(sid(1), &records), Outcome::Resolved(s) if s.id == sid(1)));
        assert_eq!(Outcome::of(sid(2), &records), Outcome::Redirect(sid(5)));
        assert_eq!(Outcome::of(sid(3), &records), Outcome::Missing);
    }

    #[test]
    fn test_redirect_target_is_not_followed() {
        let records = subjects(vec![
            Subject::redirect_stub(sid(2), SubjectType::Anime, sid(5)),
            Subject::redirect_stub(sid(5), SubjectType::Anime, sid(7)),
        ]);

        let response = classify(&[sid(2)], &records, &HashMap::new(), &HashMap::new());

        assert_eq!(response.redirects.len(), 1);
        assert_eq!(response.redirects[&sid(2)], sid(5));
    }

    #[test]
    fn test_duplicates_fill_data_per_occurrence() {
        let records = subjects(vec![Subject::new(sid(1), SubjectType::Anime, "one")]);
        let tags = HashMap::from([(sid(1), vec![MetaTag::new("TV", 1)])]);
        let totals = HashMap::from([(sid(1), 26)]);

        let response = classify(&[sid(1), sid(1), sid(1)], &records, &tags, &totals);

        assert_eq!(response.data.len(), 3);
        assert!(response.data.iter().all(|e| e == &response.data[0]));
        assert_eq!(response.data[0].total_episodes, 26);
        assert_eq!(response.data[0].meta_tags, vec![MetaTag::new("TV", 1)]);
    }

    #[test]
    fn test_missing_tags_and_totals_default_to_empty() {
        let records = subjects(vec![Subject::new(sid(4), SubjectType::Book, "four")]);

        let response = classify(&[sid(4)], &records, &HashMap::new(), &HashMap::new());

        assert!(response.data[0].meta_tags.is_empty());
        assert_eq!(response.data[0].total_episodes, 0);
    }

    #[test]
    fn test_missing_listed_once_in_first_appearance_order() {
        let response = classify(
            &[sid(5), sid(4), sid(5), sid(3), sid(4)],
            &HashMap::new(),
            &HashMap::new(),
            &HashMap::new(),
        );

        assert_eq!(response.missing, vec![sid(5), sid(4), sid(3)]);
        assert!(response.data.is_empty());
        assert!(response.redirects.is_empty());
    }
}
