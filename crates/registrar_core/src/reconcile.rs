//! Set reconciliation for many-to-many relations.
//!
//! # Responsibility
//! - Compute the minimal add/remove delta between a persisted relation and
//!   a caller-submitted selection.
//!
//! # Invariants
//! - `to_add = desired − existing`; `to_remove = existing − desired`; keys
//!   present in both sets are untouched, so re-applying the same desired set
//!   yields empty deltas.
//! - Application is expressed as independent per-key add/remove operations,
//!   never delete-all-then-reinsert: unrelated attributes of unchanged links
//!   survive reconciliation.
//! - Policy: an absent submitted selection means the empty set, i.e. "no
//!   selections" clears every existing link. Pinned by test.
//! - The same algorithm serves newly created owners (existing = ∅) and
//!   edits of pre-existing ones.

use std::collections::BTreeSet;

/// Add/remove delta between a persisted set and a desired set.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SetDelta<K> {
    pub to_add: BTreeSet<K>,
    pub to_remove: BTreeSet<K>,
}

impl<K> SetDelta<K> {
    pub fn is_empty(&self) -> bool {
        self.to_add.is_empty() && self.to_remove.is_empty()
    }
}

/// Computes the delta turning `existing` into `desired`.
pub fn diff<K: Ord + Clone>(existing: &BTreeSet<K>, desired: &BTreeSet<K>) -> SetDelta<K> {
    SetDelta {
        to_add: desired.difference(existing).cloned().collect(),
        to_remove: existing.difference(desired).cloned().collect(),
    }
}

/// Normalizes a caller submission into a desired selection set.
///
/// `None` (nothing submitted) deliberately means "clear all": the delta
/// against any existing set removes every link.
pub fn selection_set<K: Ord + Clone>(submitted: Option<&[K]>) -> BTreeSet<K> {
    submitted
        .map(|keys| keys.iter().cloned().collect())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::{diff, selection_set};
    use std::collections::BTreeSet;

    fn set(keys: &[i64]) -> BTreeSet<i64> {
        keys.iter().copied().collect()
    }

    #[test]
    fn delta_adds_and_removes_disjoint_keys_only() {
        let delta = diff(&set(&[1, 2, 3]), &set(&[2, 3, 4]));
        assert_eq!(delta.to_add, set(&[4]));
        assert_eq!(delta.to_remove, set(&[1]));
    }

    #[test]
    fn reapplying_same_desired_set_yields_empty_delta() {
        let existing = set(&[1, 2, 3]);
        let desired = set(&[2, 3, 4]);
        let first = diff(&existing, &desired);
        assert!(!first.is_empty());

        // After applying `first`, the persisted set equals `desired`.
        let second = diff(&desired, &desired);
        assert!(second.is_empty());
    }

    #[test]
    fn empty_desired_set_clears_all_existing_links() {
        let delta = diff(&set(&[1, 2]), &selection_set::<i64>(None));
        assert!(delta.to_add.is_empty());
        assert_eq!(delta.to_remove, set(&[1, 2]));
    }

    #[test]
    fn creation_with_no_existing_links_adds_everything() {
        let delta = diff(&BTreeSet::new(), &set(&[10, 20]));
        assert_eq!(delta.to_add, set(&[10, 20]));
        assert!(delta.to_remove.is_empty());
    }
}
