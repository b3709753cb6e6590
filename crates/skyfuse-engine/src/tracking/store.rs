//! The fused track store.

use std::collections::HashMap;

use skyfuse_core::{IffStatus, TrackKey};

use crate::domain::{Classification, RadarObservation, Track, TrackSnapshot};

/// Owns every live track.
///
/// Each track carries the generation it was created with; a key that is
/// evicted and later re-created gets a fresh generation, which is how late
/// classification verdicts and deadline events for the old incarnation are
/// told apart from the new one.
#[derive(Debug, Default)]
pub struct TrackStore {
    tracks: HashMap<TrackKey, Track>,
    next_generation: u64,
}

impl TrackStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates or updates the track for `key` from a positional observation
    /// and resolved identity.
    ///
    /// Returns the post-update snapshot and whether the track was created.
    /// Merging preserves a previously-set classification; creation assigns a
    /// fresh generation.
    pub fn upsert(
        &mut self,
        key: TrackKey,
        observation: &RadarObservation,
        status: IffStatus,
        callsign: String,
    ) -> (TrackSnapshot, bool) {
        match self.tracks.get_mut(&key) {
            Some(track) => {
                track.apply_observation(observation, status, callsign);
                (track.snapshot(), false)
            }
            None => {
                self.next_generation += 1;
                let track = Track::create(key.clone(), observation, status, callsign, self.next_generation);
                let snapshot = track.snapshot();
                self.tracks.insert(key, track);
                (snapshot, true)
            }
        }
    }

    /// Sets status (and optionally callsign) on an existing track without
    /// positional data, used when an override is applied or reverted. A
    /// `None` callsign keeps the track's current one.
    pub fn set_identity(
        &mut self,
        key: &TrackKey,
        status: IffStatus,
        callsign: Option<String>,
    ) -> Option<TrackSnapshot> {
        let track = self.tracks.get_mut(key)?;
        let callsign = callsign.unwrap_or_else(|| track.callsign.clone());
        track.apply_identity(status, callsign);
        Some(track.snapshot())
    }

    /// Merges a classification verdict into the track, but only when the
    /// track still exists with the generation the verdict was computed for.
    pub fn apply_classification(
        &mut self,
        key: &TrackKey,
        generation: u64,
        classification: Classification,
    ) -> Option<TrackSnapshot> {
        let track = self.tracks.get_mut(key)?;
        if track.generation != generation {
            return None;
        }
        track.apply_classification(classification);
        Some(track.snapshot())
    }

    /// Removes the track for `key`.
    pub fn remove(&mut self, key: &TrackKey) -> Option<Track> {
        self.tracks.remove(key)
    }

    /// Removes the track only when it still carries `generation`.
    pub fn remove_if_generation(&mut self, key: &TrackKey, generation: u64) -> Option<Track> {
        if self.tracks.get(key)?.generation != generation {
            return None;
        }
        self.tracks.remove(key)
    }

    /// Removes every track, returning the removed keys in sorted order so
    /// bulk-removal notifications are deterministic.
    pub fn clear(&mut self) -> Vec<TrackKey> {
        let mut keys: Vec<TrackKey> = self.tracks.drain().map(|(key, _)| key).collect();
        keys.sort();
        keys
    }

    /// Looks up the track for `key`.
    #[must_use]
    pub fn get(&self, key: &TrackKey) -> Option<&Track> {
        self.tracks.get(key)
    }

    /// Returns `true` when a track exists for `key`.
    #[must_use]
    pub fn contains(&self, key: &TrackKey) -> bool {
        self.tracks.contains_key(key)
    }

    /// Number of live tracks.
    #[must_use]
    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    /// Returns `true` when no tracks are live.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }

    /// Snapshots every live track, sorted by key.
    #[must_use]
    pub fn snapshot_all(&self) -> Vec<TrackSnapshot> {
        let mut snapshots: Vec<TrackSnapshot> =
            self.tracks.values().map(Track::snapshot).collect();
        snapshots.sort_by(|a, b| a.key.cmp(&b.key));
        snapshots
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use skyfuse_core::Probability;

    fn key(raw: &str) -> TrackKey {
        TrackKey::from_identifier(raw).unwrap()
    }

    fn observation(id: &str, latitude: f64, longitude: f64) -> RadarObservation {
        RadarObservation::new(Some(id), latitude, longitude)
    }

    #[test]
    fn test_upsert_creates_then_merges() {
        let mut store = TrackStore::new();

        let (first, created) = store.upsert(
            key("ab12"),
            &observation("ab12", 10.0, 20.0),
            IffStatus::Unknown,
            "UNKNOWN".to_string(),
        );
        assert!(created);

        let (second, created) = store.upsert(
            key("ab12"),
            &observation("ab12", 10.1, 20.1),
            IffStatus::Foe,
            "EAGLE1".to_string(),
        );
        assert!(!created);
        assert_eq!(store.len(), 1);
        assert_eq!(second.latitude, 10.1);
        assert_eq!(second.status, IffStatus::Foe);
        assert_eq!(first.key, second.key);
    }

    #[test]
    fn test_generation_is_stable_across_updates() {
        let mut store = TrackStore::new();
        store.upsert(
            key("ab12"),
            &observation("ab12", 10.0, 20.0),
            IffStatus::Unknown,
            "UNKNOWN".to_string(),
        );
        let generation = store.get(&key("ab12")).unwrap().generation;

        store.upsert(
            key("ab12"),
            &observation("ab12", 10.1, 20.1),
            IffStatus::Unknown,
            "UNKNOWN".to_string(),
        );
        assert_eq!(store.get(&key("ab12")).unwrap().generation, generation);
    }

    #[test]
    fn test_recreation_gets_fresh_generation() {
        let mut store = TrackStore::new();
        store.upsert(
            key("ab12"),
            &observation("ab12", 10.0, 20.0),
            IffStatus::Unknown,
            "UNKNOWN".to_string(),
        );
        let first = store.get(&key("ab12")).unwrap().generation;

        store.remove(&key("ab12"));
        store.upsert(
            key("ab12"),
            &observation("ab12", 10.0, 20.0),
            IffStatus::Unknown,
            "UNKNOWN".to_string(),
        );
        assert!(store.get(&key("ab12")).unwrap().generation > first);
    }

    #[test]
    fn test_merge_preserves_classification() {
        let mut store = TrackStore::new();
        store.upsert(
            key("ab12"),
            &observation("ab12", 10.0, 20.0),
            IffStatus::Unknown,
            "UNKNOWN".to_string(),
        );
        let generation = store.get(&key("ab12")).unwrap().generation;
        store
            .apply_classification(
                &key("ab12"),
                generation,
                Classification {
                    suspicious: true,
                    probability: Probability::new(0.8).unwrap(),
                },
            )
            .unwrap();

        let (snapshot, _) = store.upsert(
            key("ab12"),
            &observation("ab12", 10.1, 20.1),
            IffStatus::Unknown,
            "UNKNOWN".to_string(),
        );
        assert!(snapshot.classification.unwrap().suspicious);
    }

    #[test]
    fn test_apply_classification_rejects_stale_generation() {
        let mut store = TrackStore::new();
        store.upsert(
            key("ab12"),
            &observation("ab12", 10.0, 20.0),
            IffStatus::Unknown,
            "UNKNOWN".to_string(),
        );
        let generation = store.get(&key("ab12")).unwrap().generation;

        // Evict and re-create: the old generation no longer applies.
        store.remove(&key("ab12"));
        store.upsert(
            key("ab12"),
            &observation("ab12", 10.0, 20.0),
            IffStatus::Unknown,
            "UNKNOWN".to_string(),
        );

        let stale = store.apply_classification(
            &key("ab12"),
            generation,
            Classification {
                suspicious: true,
                probability: Probability::new(0.9).unwrap(),
            },
        );
        assert!(stale.is_none());
        assert!(store.get(&key("ab12")).unwrap().classification.is_none());
    }

    #[test]
    fn test_remove_if_generation() {
        let mut store = TrackStore::new();
        store.upsert(
            key("ab12"),
            &observation("ab12", 10.0, 20.0),
            IffStatus::Unknown,
            "UNKNOWN".to_string(),
        );
        let generation = store.get(&key("ab12")).unwrap().generation;

        assert!(store.remove_if_generation(&key("ab12"), generation + 1).is_none());
        assert!(store.contains(&key("ab12")));
        assert!(store.remove_if_generation(&key("ab12"), generation).is_some());
        assert!(store.is_empty());
    }

    #[test]
    fn test_set_identity_only_touches_existing_tracks() {
        let mut store = TrackStore::new();
        assert!(store
            .set_identity(&key("ab12"), IffStatus::Foe, Some("FOE".to_string()))
            .is_none());

        store.upsert(
            key("ab12"),
            &observation("ab12", 10.0, 20.0),
            IffStatus::Unknown,
            "UNKNOWN".to_string(),
        );
        let snapshot = store
            .set_identity(&key("ab12"), IffStatus::Foe, Some("FOE".to_string()))
            .unwrap();
        assert_eq!(snapshot.status, IffStatus::Foe);
        assert_eq!(snapshot.callsign, "FOE");
    }

    #[test]
    fn test_set_identity_without_callsign_keeps_current() {
        let mut store = TrackStore::new();
        store.upsert(
            key("ab12"),
            &observation("ab12", 10.0, 20.0),
            IffStatus::Friend,
            "EAGLE1".to_string(),
        );

        let snapshot = store
            .set_identity(&key("ab12"), IffStatus::Foe, None)
            .unwrap();
        assert_eq!(snapshot.status, IffStatus::Foe);
        assert_eq!(snapshot.callsign, "EAGLE1");
    }

    #[test]
    fn test_clear_returns_sorted_keys() {
        let mut store = TrackStore::new();
        for id in ["zz99", "aa11", "mm55"] {
            store.upsert(
                key(id),
                &observation(id, 10.0, 20.0),
                IffStatus::Unknown,
                "UNKNOWN".to_string(),
            );
        }

        let removed = store.clear();
        let labels: Vec<&str> = removed.iter().map(TrackKey::as_str).collect();
        assert_eq!(labels, ["AA11", "MM55", "ZZ99"]);
        assert!(store.is_empty());
    }
}
