//! The derived suspicious set.

use std::collections::HashMap;

use skyfuse_core::{Probability, TrackKey};

use crate::domain::{SuspiciousEntry, TrackSnapshot};

/// Tracks whose latest verdict carries a positive probability.
///
/// Mutators report whether anything changed; the engine republishes the
/// complete list, never a diff, whenever they say so. Sorting is by
/// probability descending with insertion order breaking ties.
#[derive(Debug, Default)]
pub struct SuspiciousSet {
    entries: HashMap<TrackKey, SuspiciousEntry>,
    order: Vec<TrackKey>,
}

impl SuspiciousSet {
    /// Creates an empty set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Applies a verdict: positive probability inserts or refreshes the
    /// track's entry, zero removes it. Returns `true` when the published
    /// list would change.
    pub fn apply(&mut self, snapshot: &TrackSnapshot, probability: Probability) -> bool {
        if !probability.is_positive() {
            return self.remove(&snapshot.key);
        }

        let entry = SuspiciousEntry::from_snapshot(snapshot, probability);
        match self.entries.get_mut(&snapshot.key) {
            Some(existing) if *existing == entry => false,
            Some(existing) => {
                *existing = entry;
                true
            }
            None => {
                self.order.push(snapshot.key.clone());
                self.entries.insert(snapshot.key.clone(), entry);
                true
            }
        }
    }

    /// Drops the entry for `key`. Returns `true` if one was present.
    pub fn remove(&mut self, key: &TrackKey) -> bool {
        if self.entries.remove(key).is_some() {
            self.order.retain(|k| k != key);
            true
        } else {
            false
        }
    }

    /// Drops every entry. Returns `true` if the set was non-empty.
    pub fn clear(&mut self) -> bool {
        if self.entries.is_empty() {
            return false;
        }
        self.entries.clear();
        self.order.clear();
        true
    }

    /// The complete list, probability descending, ties in insertion order.
    #[must_use]
    pub fn to_list(&self) -> Vec<SuspiciousEntry> {
        let mut list: Vec<SuspiciousEntry> = self
            .order
            .iter()
            .filter_map(|key| self.entries.get(key).cloned())
            .collect();
        list.sort_by(|a, b| b.probability.value().total_cmp(&a.probability.value()));
        list
    }

    /// Number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` when no entries are held.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
