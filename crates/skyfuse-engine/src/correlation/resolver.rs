//! Resolution of positional observations to track identity.

use skyfuse_core::{IffStatus, TrackKey};

use crate::correlation::{IdentityStore, Lock, LockTable};
use crate::domain::{RadarObservation, UNKNOWN_CALLSIGN};

/// How a resolution was reached.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolutionSource {
    /// Exact identifier match against a stored identity report
    Identifier,
    /// An existing lock within lock tolerance was reused
    LockReuse,
    /// An identity report within identity tolerance seeded a new lock
    IdentityProximity,
    /// Nothing matched; a fresh unknown lock was created
    NewLock,
}

impl ResolutionSource {
    /// Returns a static label for structured logging.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Identifier => "identifier",
            Self::LockReuse => "lock_reuse",
            Self::IdentityProximity => "identity_proximity",
            Self::NewLock => "new_lock",
        }
    }
}

impl std::fmt::Display for ResolutionSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Outcome of correlating one positional observation.
#[derive(Debug, Clone, PartialEq)]
pub struct Resolution {
    /// Track key the observation belongs to
    pub key: TrackKey,
    /// Status the correlation produced
    pub status: IffStatus,
    /// Callsign the correlation produced, already defaulted
    pub callsign: String,
    /// Which rule produced the resolution
    pub source: ResolutionSource,
}

/// Correlates positional observations against identities and locks.
///
/// Resolution runs in strict order: exact identifier match, then lock
/// reuse, then identity proximity, then a fresh unknown lock. An
/// identifier-carrying observation always keeps its identifier-derived key;
/// a lock hit only lends it status and callsign. An unidentified
/// observation adopts the key of the lock it hits, which is what keeps a
/// jittering target on a single track.
#[derive(Debug, Clone, Copy)]
pub struct CorrelationResolver {
    lock_tolerance_km: f64,
    identity_tolerance_km: f64,
}

impl CorrelationResolver {
    /// Creates a resolver with the given tolerances.
    #[must_use]
    pub fn new(lock_tolerance_km: f64, identity_tolerance_km: f64) -> Self {
        Self {
            lock_tolerance_km,
            identity_tolerance_km,
        }
    }

    /// Resolves one observation, updating the lock table as a side effect.
    pub fn resolve(
        &self,
        observation: &RadarObservation,
        identities: &IdentityStore,
        locks: &mut LockTable,
    ) -> Resolution {
        let identifier_key = observation
            .identifier
            .as_deref()
            .and_then(TrackKey::from_identifier);

        // Exact identifier correlation needs no lock bookkeeping.
        if let Some(key) = &identifier_key {
            if let Some(record) = identities.lookup(key) {
                return Resolution {
                    key: key.clone(),
                    status: record.status,
                    callsign: named(record.callsign.clone()),
                    source: ResolutionSource::Identifier,
                };
            }
        }

        if let Some(lock) = locks.find_within_mut(
            observation.latitude,
            observation.longitude,
            self.lock_tolerance_km,
        ) {
            // The lock follows the target it matched.
            lock.latitude = observation.latitude;
            lock.longitude = observation.longitude;
            return Resolution {
                key: identifier_key.unwrap_or_else(|| lock.key.clone()),
                status: lock.status,
                callsign: named(lock.callsign.clone()),
                source: ResolutionSource::LockReuse,
            };
        }

        let key = observation.key();
        if let Some((_, record)) = identities.proximity_first(
            observation.latitude,
            observation.longitude,
            self.identity_tolerance_km,
        ) {
            locks.insert(Lock {
                key: key.clone(),
                latitude: observation.latitude,
                longitude: observation.longitude,
                status: record.status,
                callsign: record.callsign.clone(),
            });
            return Resolution {
                key,
                status: record.status,
                callsign: named(record.callsign.clone()),
                source: ResolutionSource::IdentityProximity,
            };
        }

        locks.insert(Lock {
            key: key.clone(),
            latitude: observation.latitude,
            longitude: observation.longitude,
            status: IffStatus::Unknown,
            callsign: None,
        });
        Resolution {
            key,
            status: IffStatus::Unknown,
            callsign: UNKNOWN_CALLSIGN.to_string(),
            source: ResolutionSource::NewLock,
        }
    }
}

fn named(callsign: Option<String>) -> String {
    callsign.unwrap_or_else(|| UNKNOWN_CALLSIGN.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::IffObservation;

    fn resolver() -> CorrelationResolver {
        CorrelationResolver::new(3.0, 5.0)
    }

    fn radar(id: Option<&str>, latitude: f64, longitude: f64) -> RadarObservation {
        RadarObservation::new(id, latitude, longitude)
    }

    #[test]
    fn test_exact_identifier_match() {
        let mut identities = IdentityStore::new();
        identities.upsert(
            IffObservation::new(Some("ab12"), IffStatus::Foe).with_callsign("EAGLE1"),
        );
        let mut locks = LockTable::new();

        let resolution = resolver().resolve(&radar(Some("AB12 "), 39.9, 32.8), &identities, &mut locks);

        assert_eq!(resolution.key.as_str(), "AB12");
        assert_eq!(resolution.status, IffStatus::Foe);
        assert_eq!(resolution.callsign, "EAGLE1");
        assert_eq!(resolution.source, ResolutionSource::Identifier);
        // Exact matches never create locks.
        assert!(locks.is_empty());
    }

    #[test]
    fn test_unmatched_observation_creates_unknown_lock() {
        let identities = IdentityStore::new();
        let mut locks = LockTable::new();

        let resolution = resolver().resolve(&radar(None, 10.0001, 20.0001), &identities, &mut locks);

        assert_eq!(resolution.key.as_str(), "1000010_2000010");
        assert_eq!(resolution.status, IffStatus::Unknown);
        assert_eq!(resolution.callsign, "UNKNOWN");
        assert_eq!(resolution.source, ResolutionSource::NewLock);
        assert_eq!(locks.len(), 1);
    }

    #[test]
    fn test_nearby_positions_collapse_onto_one_key() {
        let identities = IdentityStore::new();
        let mut locks = LockTable::new();
        let resolver = resolver();

        let first = resolver.resolve(&radar(None, 10.0001, 20.0001), &identities, &mut locks);
        let second = resolver.resolve(&radar(None, 10.0002, 20.0000), &identities, &mut locks);

        assert_eq!(first.key, second.key);
        assert_eq!(second.source, ResolutionSource::LockReuse);
        assert_eq!(locks.len(), 1);
    }

    #[test]
    fn test_lock_follows_moving_target() {
        let identities = IdentityStore::new();
        let mut locks = LockTable::new();
        let resolver = resolver();

        // Each step is ~2.2 km; the third position is ~4.4 km from the
        // first, so it only matches because the lock moved along.
        let first = resolver.resolve(&radar(None, 10.00, 20.0), &identities, &mut locks);
        let second = resolver.resolve(&radar(None, 10.02, 20.0), &identities, &mut locks);
        let third = resolver.resolve(&radar(None, 10.04, 20.0), &identities, &mut locks);

        assert_eq!(first.key, second.key);
        assert_eq!(second.key, third.key);
        assert_eq!(third.source, ResolutionSource::LockReuse);
    }

    #[test]
    fn test_identity_proximity_seeds_a_lock() {
        let mut identities = IdentityStore::new();
        identities.upsert(
            IffObservation::new(Some("vx99"), IffStatus::Foe)
                .with_position(10.0, 20.0)
                .with_callsign("VIPER"),
        );
        let mut locks = LockTable::new();
        let resolver = resolver();

        let first = resolver.resolve(&radar(None, 10.01, 20.01), &identities, &mut locks);
        assert_eq!(first.status, IffStatus::Foe);
        assert_eq!(first.callsign, "VIPER");
        assert_eq!(first.source, ResolutionSource::IdentityProximity);
        assert_eq!(locks.len(), 1);

        let second = resolver.resolve(&radar(None, 10.011, 20.011), &identities, &mut locks);
        assert_eq!(second.key, first.key);
        assert_eq!(second.status, IffStatus::Foe);
        assert_eq!(second.source, ResolutionSource::LockReuse);
    }

    #[test]
    fn test_identified_observation_keeps_its_key_on_lock_hit() {
        let identities = IdentityStore::new();
        let mut locks = LockTable::new();
        locks.insert(Lock {
            key: TrackKey::from_position(10.0, 20.0),
            latitude: 10.0,
            longitude: 20.0,
            status: IffStatus::Neutral,
            callsign: Some("GHOST".to_string()),
        });

        let resolution =
            resolver().resolve(&radar(Some("cd34"), 10.001, 20.001), &identities, &mut locks);

        assert_eq!(resolution.key.as_str(), "CD34");
        assert_eq!(resolution.status, IffStatus::Neutral);
        assert_eq!(resolution.callsign, "GHOST");
        assert_eq!(resolution.source, ResolutionSource::LockReuse);
    }

    #[test]
    fn test_resolution_order_prefers_identifier_over_lock() {
        let mut identities = IdentityStore::new();
        identities.upsert(IffObservation::new(Some("ab12"), IffStatus::Friend));
        let mut locks = LockTable::new();
        locks.insert(Lock {
            key: TrackKey::from_position(10.0, 20.0),
            latitude: 10.0,
            longitude: 20.0,
            status: IffStatus::Foe,
            callsign: None,
        });

        let resolution =
            resolver().resolve(&radar(Some("ab12"), 10.0, 20.0), &identities, &mut locks);

        assert_eq!(resolution.source, ResolutionSource::Identifier);
        assert_eq!(resolution.status, IffStatus::Friend);
    }
}
