//! The fused track aggregate.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use skyfuse_core::{IffStatus, Probability, TrackKey};

use super::observation::RadarObservation;

/// Fallback text for a track with no correlated callsign.
pub const UNKNOWN_CALLSIGN: &str = "UNKNOWN";

/// Suspicion score attached to a track by the external classifier.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Classification {
    /// The classifier's binary verdict
    pub suspicious: bool,
    /// The classifier's score
    pub probability: Probability,
}

/// The fused entity: one per correlation key, alive from its first
/// positional observation until eviction.
///
/// Position and kinematics always mirror the latest positional observation
/// (radar is authoritative for position; an absent kinematic field in the
/// newest observation leaves the track's field absent). Identity fields come
/// from correlation or an operator override. The classification is advisory
/// and survives position updates until a fresh verdict replaces it.
#[derive(Debug, Clone)]
pub struct Track {
    /// Stable correlation key
    pub key: TrackKey,
    /// Normalized feed identifier, if one was ever observed
    pub identifier: Option<String>,
    /// Latitude in degrees, from the latest positional observation
    pub latitude: f64,
    /// Longitude in degrees, from the latest positional observation
    pub longitude: f64,
    /// Ground speed, from the latest positional observation
    pub velocity: Option<f64>,
    /// Barometric altitude, from the latest positional observation
    pub barometric_altitude: Option<f64>,
    /// Geometric altitude, from the latest positional observation
    pub geometric_altitude: Option<f64>,
    /// Heading in degrees, from the latest positional observation
    pub heading: Option<f64>,
    /// Correlated or overridden status
    pub status: IffStatus,
    /// Correlated or overridden callsign
    pub callsign: String,
    /// Latest classifier verdict, absent until the first response arrives
    pub classification: Option<Classification>,
    /// Monotone creation stamp; a stale async result (deadline or verdict)
    /// carrying an older generation is discarded
    pub generation: u64,
    /// When the track was created
    pub created_at: DateTime<Utc>,
    /// When the track last changed
    pub updated_at: DateTime<Utc>,
}

impl Track {
    /// Creates a track from its first positional observation and resolved
    /// identity.
    #[must_use]
    pub fn create(
        key: TrackKey,
        obs: &RadarObservation,
        status: IffStatus,
        callsign: String,
        generation: u64,
    ) -> Self {
        let now = Utc::now();
        Self {
            key,
            identifier: obs.identifier.clone(),
            latitude: obs.latitude,
            longitude: obs.longitude,
            velocity: obs.velocity,
            barometric_altitude: obs.barometric_altitude,
            geometric_altitude: obs.geometric_altitude,
            heading: obs.heading,
            status,
            callsign,
            classification: None,
            generation,
            created_at: now,
            updated_at: now,
        }
    }

    /// Applies a subsequent positional observation and its resolved identity.
    ///
    /// Kinematic fields mirror the observation as delivered: an absent field
    /// in the observation clears the track's field rather than freezing a
    /// stale value.
    pub fn apply_observation(&mut self, obs: &RadarObservation, status: IffStatus, callsign: String) {
        if obs.identifier.is_some() {
            self.identifier = obs.identifier.clone();
        }
        self.latitude = obs.latitude;
        self.longitude = obs.longitude;
        self.velocity = obs.velocity;
        self.barometric_altitude = obs.barometric_altitude;
        self.geometric_altitude = obs.geometric_altitude;
        self.heading = obs.heading;
        self.status = status;
        self.callsign = callsign;
        self.updated_at = Utc::now();
    }

    /// Replaces the identity fields without a positional update. Used when an
    /// override is set or reset while the track is alive.
    pub fn apply_identity(&mut self, status: IffStatus, callsign: String) {
        self.status = status;
        self.callsign = callsign;
        self.updated_at = Utc::now();
    }

    /// Attaches a fresh classifier verdict.
    pub fn apply_classification(&mut self, classification: Classification) {
        self.classification = Some(classification);
        self.updated_at = Utc::now();
    }

    /// Returns `true` if the latest verdict carries a positive probability.
    #[must_use]
    pub fn has_positive_probability(&self) -> bool {
        self.classification
            .map(|c| c.probability.is_positive())
            .unwrap_or(false)
    }

    /// Produces the outbound snapshot of this track.
    #[must_use]
    pub fn snapshot(&self) -> TrackSnapshot {
        TrackSnapshot {
            key: self.key.clone(),
            identifier: self.identifier.clone(),
            latitude: self.latitude,
            longitude: self.longitude,
            velocity: self.velocity,
            barometric_altitude: self.barometric_altitude,
            geometric_altitude: self.geometric_altitude,
            heading: self.heading,
            status: self.status,
            callsign: self.callsign.clone(),
            classification: self.classification,
            generation: self.generation,
            updated_at: self.updated_at,
        }
    }
}

/// Full point-in-time view of a track, published to consumers on every
/// change. Always a complete state, never a diff.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrackSnapshot {
    /// Stable correlation key
    pub key: TrackKey,
    /// Normalized feed identifier, if one was ever observed
    pub identifier: Option<String>,
    /// Latitude in degrees
    pub latitude: f64,
    /// Longitude in degrees
    pub longitude: f64,
    /// Ground speed, if known
    pub velocity: Option<f64>,
    /// Barometric altitude, if known
    pub barometric_altitude: Option<f64>,
    /// Geometric altitude, if known
    pub geometric_altitude: Option<f64>,
    /// Heading in degrees, if known
    pub heading: Option<f64>,
    /// Correlated or overridden status
    pub status: IffStatus,
    /// Correlated or overridden callsign
    pub callsign: String,
    /// Latest classifier verdict, if any
    pub classification: Option<Classification>,
    /// Creation stamp of the track incarnation this snapshot was taken from
    pub generation: u64,
    /// When the track last changed
    pub updated_at: DateTime<Utc>,
}
