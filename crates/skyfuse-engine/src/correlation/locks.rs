//! The correlation lock table.

use skyfuse_core::{distance_km, within_tolerance, IffStatus, TrackKey};

/// A remembered correlation: the identity last attached near a position.
///
/// Locks let an unidentified target that keeps moving stay on one track
/// instead of spawning a new synthetic key on every sweep.
#[derive(Debug, Clone, PartialEq)]
pub struct Lock {
    /// Track key the lock resolved to
    pub key: TrackKey,
    /// Last position the lock was matched at
    pub latitude: f64,
    /// Last position the lock was matched at
    pub longitude: f64,
    /// Identity the lock carries
    pub status: IffStatus,
    /// Callsign the lock carries, when the identity source had one
    pub callsign: Option<String>,
}

/// Insertion-ordered set of locks, searched nearest-first-inserted.
#[derive(Debug, Default)]
pub struct LockTable {
    locks: Vec<Lock>,
}

impl LockTable {
    /// Creates an empty table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the first lock within `tolerance_km` of the point, mutably,
    /// so the caller can let the lock follow the target.
    pub fn find_within_mut(
        &mut self,
        latitude: f64,
        longitude: f64,
        tolerance_km: f64,
    ) -> Option<&mut Lock> {
        self.locks.iter_mut().find(|lock| {
            let distance = distance_km(latitude, longitude, lock.latitude, lock.longitude);
            within_tolerance(distance, tolerance_km)
        })
    }

    /// Looks up the lock keyed by `key`.
    #[must_use]
    pub fn get(&self, key: &TrackKey) -> Option<&Lock> {
        self.locks.iter().find(|lock| &lock.key == key)
    }

    /// Inserts a lock, replacing any existing lock with the same key in
    /// place so search order is preserved.
    pub fn insert(&mut self, lock: Lock) {
        if let Some(existing) = self.locks.iter_mut().find(|l| l.key == lock.key) {
            *existing = lock;
        } else {
            self.locks.push(lock);
        }
    }

    /// Removes the lock keyed by `key`. Returns `true` if one was removed.
    pub fn remove(&mut self, key: &TrackKey) -> bool {
        let before = self.locks.len();
        self.locks.retain(|lock| &lock.key != key);
        self.locks.len() < before
    }

    /// Drops every lock.
    pub fn clear(&mut self) {
        self.locks.clear();
    }

    /// Number of locks held.
    #[must_use]
    pub fn len(&self) -> usize {
        self.locks.len()
    }

    /// Returns `true` when no locks are held.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.locks.is_empty()
    }
}
