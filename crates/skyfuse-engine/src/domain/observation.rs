//! Canonical feed observations.
//!
//! These are the shapes the engine operates on. The feed boundary
//! ([`crate::feed`]) is responsible for mapping raw frames, with all their
//! historical field spellings, onto these types; nothing past the boundary
//! deals with aliases or string-typed numbers.

use skyfuse_core::{IffStatus, TrackKey};

/// One positional (radar) observation.
///
/// Transient: consumed by a single update cycle and not retained. The
/// `identifier` is already normalized (trimmed, uppercased) by the feed
/// boundary. `heading` stays absent when the feed did not deliver one; it is
/// only coerced to a number at the classification wire boundary.
#[derive(Debug, Clone, PartialEq)]
pub struct RadarObservation {
    /// Normalized feed identifier, if the feed delivered one
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
}

impl RadarObservation {
    /// Creates a positional observation with no kinematics.
    ///
    /// The identifier is normalized here, so hand-constructed observations
    /// behave like ones that came through the feed boundary.
    #[must_use]
    pub fn new(identifier: Option<&str>, latitude: f64, longitude: f64) -> Self {
        Self {
            identifier: identifier.and_then(TrackKey::normalize_identifier),
            latitude,
            longitude,
            velocity: None,
            barometric_altitude: None,
            geometric_altitude: None,
            heading: None,
        }
    }

    /// Sets the ground speed.
    #[must_use]
    pub fn with_velocity(mut self, velocity: f64) -> Self {
        self.velocity = Some(velocity);
        self
    }

    /// Sets the barometric and geometric altitudes.
    #[must_use]
    pub fn with_altitudes(mut self, barometric: f64, geometric: f64) -> Self {
        self.barometric_altitude = Some(barometric);
        self.geometric_altitude = Some(geometric);
        self
    }

    /// Sets the heading.
    #[must_use]
    pub fn with_heading(mut self, heading: f64) -> Self {
        self.heading = Some(heading);
        self
    }

    /// Derives the correlation key for this observation.
    #[must_use]
    pub fn key(&self) -> TrackKey {
        TrackKey::from_parts(self.identifier.as_deref(), self.latitude, self.longitude)
    }

    /// Returns `true` if both coordinates are finite.
    #[must_use]
    pub fn has_finite_position(&self) -> bool {
        self.latitude.is_finite() && self.longitude.is_finite()
    }
}

/// One identity (IFF) observation.
///
/// Retained in the identity store until the identity stream terminates.
/// Coordinates are optional and used only for proximity correlation.
#[derive(Debug, Clone, PartialEq)]
pub struct IffObservation {
    /// Normalized feed identifier, if the feed delivered one
    pub identifier: Option<String>,
    /// Latitude in degrees, if known
    pub latitude: Option<f64>,
    /// Longitude in degrees, if known
    pub longitude: Option<f64>,
    /// Normalized friend/foe classification
    pub status: IffStatus,
    /// Reported callsign, if any
    pub callsign: Option<String>,
}

impl IffObservation {
    /// Creates an identity observation with no position or callsign.
    #[must_use]
    pub fn new(identifier: Option<&str>, status: IffStatus) -> Self {
        Self {
            identifier: identifier.and_then(TrackKey::normalize_identifier),
            latitude: None,
            longitude: None,
            status,
            callsign: None,
        }
    }

    /// Sets the reported position.
    #[must_use]
    pub fn with_position(mut self, latitude: f64, longitude: f64) -> Self {
        self.latitude = Some(latitude);
        self.longitude = Some(longitude);
        self
    }

    /// Sets the callsign.
    #[must_use]
    pub fn with_callsign(mut self, callsign: impl Into<String>) -> Self {
        self.callsign = Some(callsign.into());
        self
    }

    /// Returns the finite position, if one was reported.
    #[must_use]
    pub fn position(&self) -> Option<(f64, f64)> {
        match (self.latitude, self.longitude) {
            (Some(lat), Some(lon)) if lat.is_finite() && lon.is_finite() => Some((lat, lon)),
            _ => None,
        }
    }

    /// Derives the key this record is stored under: the identifier when
    /// present, the synthetic position key when only coordinates are known,
    /// `None` when the record is unkeyable (neither identifier nor position).
    #[must_use]
    pub fn storage_key(&self) -> Option<TrackKey> {
        if let Some(id) = self.identifier.as_deref() {
            return TrackKey::from_identifier(id);
        }
        self.position()
            .map(|(lat, lon)| TrackKey::from_position(lat, lon))
    }
}
