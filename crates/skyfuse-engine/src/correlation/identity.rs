//! Storage for identity reports.

use std::collections::HashMap;

use skyfuse_core::{distance_km, within_tolerance, TrackKey};
use tracing::debug;

use crate::domain::IffObservation;

/// Latest identity report per key.
///
/// Reports keyed by identifier and reports keyed by quantized position live
/// side by side. Proximity searches walk records in insertion order, so when
/// two reports are both within tolerance the earlier-inserted one wins.
#[derive(Debug, Default)]
pub struct IdentityStore {
    records: HashMap<TrackKey, IffObservation>,
    order: Vec<TrackKey>,
}

impl IdentityStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts or replaces the report under its storage key.
    ///
    /// Returns the key the report was stored under, or `None` when the
    /// report carries neither an identifier nor a usable position and was
    /// skipped.
    pub fn upsert(&mut self, observation: IffObservation) -> Option<TrackKey> {
        let Some(key) = observation.storage_key() else {
            debug!("skipping unkeyable identity report");
            return None;
        };
        if !self.records.contains_key(&key) {
            self.order.push(key.clone());
        }
        self.records.insert(key.clone(), observation);
        Some(key)
    }

    /// Looks up the report stored under `key`.
    #[must_use]
    pub fn lookup(&self, key: &TrackKey) -> Option<&IffObservation> {
        self.records.get(key)
    }

    /// Returns the first positioned report within `tolerance_km` of the
    /// point, in insertion order.
    #[must_use]
    pub fn proximity_first(
        &self,
        latitude: f64,
        longitude: f64,
        tolerance_km: f64,
    ) -> Option<(&TrackKey, &IffObservation)> {
        self.order.iter().find_map(|key| {
            let record = self.records.get(key)?;
            let (rec_lat, rec_lon) = record.position()?;
            let distance = distance_km(latitude, longitude, rec_lat, rec_lon);
            within_tolerance(distance, tolerance_km).then_some((key, record))
        })
    }

    /// Drops every report.
    pub fn clear(&mut self) {
        self.records.clear();
        self.order.clear();
    }

    /// Number of stored reports.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Returns `true` when no reports are stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use skyfuse_core::IffStatus;

    fn report(id: &str, status: IffStatus) -> IffObservation {
        IffObservation::new(Some(id), status)
    }

    #[test]
    fn test_upsert_by_identifier() {
        let mut store = IdentityStore::new();
        let key = store.upsert(report("ab12", IffStatus::Foe)).unwrap();

        assert_eq!(key.as_str(), "AB12");
        assert_eq!(store.lookup(&key).unwrap().status, IffStatus::Foe);
    }

    #[test]
    fn test_upsert_by_position_when_identifier_absent() {
        let mut store = IdentityStore::new();
        let obs = IffObservation::new(None, IffStatus::Neutral).with_position(10.0001, 20.0001);
        let key = store.upsert(obs).unwrap();

        assert_eq!(key.as_str(), "1000010_2000010");
    }

    #[test]
    fn test_unkeyable_report_is_skipped() {
        let mut store = IdentityStore::new();
        assert!(store.upsert(IffObservation::new(None, IffStatus::Foe)).is_none());
        assert!(store.is_empty());
    }

    #[test]
    fn test_upsert_replaces_without_reordering() {
        let mut store = IdentityStore::new();
        store.upsert(
            report("ab12", IffStatus::Unknown).with_position(10.0, 20.0),
        );
        store.upsert(
            report("cd34", IffStatus::Neutral).with_position(10.001, 20.001),
        );
        // Re-reporting the first key must not move it behind the second.
        store.upsert(report("ab12", IffStatus::Foe).with_position(10.0, 20.0));

        let (key, record) = store.proximity_first(10.0, 20.0, 5.0).unwrap();
        assert_eq!(key.as_str(), "AB12");
        assert_eq!(record.status, IffStatus::Foe);
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn test_proximity_first_match_wins() {
        let mut store = IdentityStore::new();
        store.upsert(report("first", IffStatus::Friend).with_position(10.0, 20.0));
        store.upsert(report("second", IffStatus::Foe).with_position(10.001, 20.001));

        let (key, _) = store.proximity_first(10.0005, 20.0005, 5.0).unwrap();
        assert_eq!(key.as_str(), "FIRST");
    }

    #[test]
    fn test_proximity_ignores_unpositioned_and_distant_reports() {
        let mut store = IdentityStore::new();
        store.upsert(report("nofix", IffStatus::Foe));
        store.upsert(report("far", IffStatus::Foe).with_position(50.0, 60.0));

        assert!(store.proximity_first(10.0, 20.0, 5.0).is_none());
    }

    #[test]
    fn test_clear() {
        let mut store = IdentityStore::new();
        store.upsert(report("ab12", IffStatus::Foe));
        store.clear();

        assert!(store.is_empty());
        assert!(store.lookup(&TrackKey::from_identifier("ab12").unwrap()).is_none());
    }
}
