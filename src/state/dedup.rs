use std::collections::HashSet;

use crate::state::identity::IdentityKey;

// ============================================================================
// First-seen-wins deduplication
// ============================================================================

/// Tracks identity keys seen in one bucket of one analysis pass.
///
/// An item is admitted only if none of its keys has been seen; admitted items
/// record all of their keys. Rejected items record nothing.
#[derive(Debug, Default)]
pub struct Deduplicator {
    seen: HashSet<IdentityKey>,
}

impl Deduplicator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `true` and records `keys` if the item is new.
    pub fn admit(&mut self, keys: &[IdentityKey]) -> bool {
        if keys.iter().any(|k| self.seen.contains(k)) {
            return false;
        }
        self.seen.extend(keys.iter().cloned());
        true
    }

    pub fn has_seen(&self, key: &IdentityKey) -> bool {
        self.seen.contains(key)
    }

    pub fn seen_count(&self) -> usize {
        self.seen.len()
    }
}

/// Drop later duplicates from `items`, preserving first-seen order.
///
/// Idempotent: the survivors have pairwise disjoint key sets, so a second
/// pass keeps all of them.
pub fn dedup_by_identity<T, F>(items: Vec<T>, keys: F) -> Vec<T>
where
    F: Fn(&T) -> Vec<IdentityKey>,
{
    let mut dedup = Deduplicator::new();
    items
        .into_iter()
        .filter(|item| dedup.admit(&keys(item)))
        .collect()
}
