//! Insertion-ordered deduplication.

use std::collections::HashSet;
use std::hash::Hash;

use catalog_domain::model::SubjectId;

/// A set that remembers the order in which values were first inserted.
///
/// Membership checks are O(1); iteration follows first-insertion order
/// regardless of hashing.
#[derive(Debug, Clone)]
pub struct OrderedSet<K> {
    items: Vec<K>,
    seen: HashSet<K>,
}

impl<K: Hash + Eq + Copy> OrderedSet<K> {
    pub fn new() -> Self {
        Self::with_capacity(0)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            items: Vec::with_capacity(capacity),
            seen: HashSet::with_capacity(capacity),
        }
    }

    /// Adds `value` if absent. Returns true when it was newly inserted.
    pub fn insert(&mut self, value: K) -> bool {
        if !self.seen.insert(value) {
            return false;
        }
        self.items.push(value);
        true
    }

    pub fn contains(&self, value: &K) -> bool {
        self.seen.contains(value)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn as_slice(&self) -> &[K] {
        &self.items
    }

    pub fn iter(&self) -> std::slice::Iter<'_, K> {
        self.items.iter()
    }

    pub fn into_vec(self) -> Vec<K> {
        self.items
    }
}

impl<K: Hash + Eq + Copy> Default for OrderedSet<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Hash + Eq + Copy> FromIterator<K> for OrderedSet<K> {
    fn from_iter<I: IntoIterator<Item = K>>(iter: I) -> Self {
        let iter = iter.into_iter();
        let mut set = Self::with_capacity(iter.size_hint().0);
        for value in iter {
            set.insert(value);
        }
        set
    }
}

impl<K: Hash + Eq + Copy> Extend<K> for OrderedSet<K> {
    fn extend<I: IntoIterator<Item = K>>(&mut self, iter: I) {
        for value in iter {
            self.insert(value);
        }
    }
}

/// Returns the distinct ids of `ids` in first-occurrence order.
///
/// Only used to shape storage calls. Response ordering always follows the
/// original request.
pub fn unique_ids(ids: &[SubjectId]) -> Vec<SubjectId> {
    ids.iter().copied().collect::<OrderedSet<_>>().into_vec()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sids(values: &[u32]) -> Vec<SubjectId> {
        values.iter().map(|&v| SubjectId::new(v).unwrap()).collect()
    }

    #[test]
    fn test_insert_reports_new_values_only() {
        let mut set = OrderedSet::new();
        assert!(set.insert(3));
        assert!(set.insert(1));
        assert!(!set.insert(3));
        assert_eq!(set.len(), 2);
        assert!(set.contains(&1));
        assert!(!set.contains(&2));
    }

    #[test]
    fn test_iteration_follows_first_insertion() {
        let set: OrderedSet<u32> = [9, 2, 9, 7, 2, 1].into_iter().collect();
        assert_eq!(set.as_slice(), &[9, 2, 7, 1]);
        assert_eq!(set.iter().copied().collect::<Vec<_>>(), vec![9, 2, 7, 1]);
    }

    #[test]
    fn test_extend_skips_known_values() {
        let mut set: OrderedSet<u32> = [1, 2].into_iter().collect();
        set.extend([2, 3, 1, 4]);
        assert_eq!(set.into_vec(), vec![1, 2, 3, 4]);
    }

    #[test]
    fn test_unique_ids_preserves_first_occurrence_order() {
        let ids = sids(&[1, 2, 3, 1, 2, 4]);
        assert_eq!(unique_ids(&ids), sids(&[1, 2, 3, 4]));
    }

    #[test]
    fn test_unique_ids_without_duplicates_is_identity() {
        let ids = sids(&[5, 4, 3]);
        assert_eq!(unique_ids(&ids), ids);
    }

    #[test]
    fn test_empty_set() {
        let set: OrderedSet<u32> = OrderedSet::default();
        assert!(set.is_empty());
        assert!(unique_ids(&[]).is_empty());
    }
}
