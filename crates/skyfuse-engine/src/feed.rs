//! The feed ingestion boundary.
//!
//! Upstream transports deliver observations as loosely-shaped JSON whose
//! field names drifted over the years (`lat`/`latitude`/`y_coordinate`,
//! `baroAlt`/`baro_altitude`, `callsign`/`callSign`, heading as a string).
//! Everything here exists to map those historical shapes onto the canonical
//! observation types before they reach the engine, so nothing downstream
//! ever sees an alias or a string-typed number.

use serde::{Deserialize, Deserializer, Serialize};
use skyfuse_core::{CoreError, CoreResult, IffStatus, TrackKey};

use crate::domain::{IffObservation, RadarObservation};
use crate::error::{EngineError, Result};

// =============================================================================
// Feeds and stream parameters
// =============================================================================

/// Which upstream feed an event belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FeedKind {
    /// The positional/kinematic feed
    Radar,
    /// The identity/classification feed
    Iff,
}

impl FeedKind {
    /// Returns a static lowercase label for this feed.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Radar => "radar",
            Self::Iff => "iff",
        }
    }
}

impl std::fmt::Display for FeedKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A latitude/longitude bounding box.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RegionBounds {
    /// Southern edge in degrees
    pub min_latitude: f64,
    /// Northern edge in degrees
    pub max_latitude: f64,
    /// Western edge in degrees
    pub min_longitude: f64,
    /// Eastern edge in degrees
    pub max_longitude: f64,
}

impl RegionBounds {
    /// Creates a bounding box.
    ///
    /// # Errors
    ///
    /// Returns an error if any edge is non-finite or the edges are not
    /// ordered min before max.
    pub fn new(
        min_latitude: f64,
        max_latitude: f64,
        min_longitude: f64,
        max_longitude: f64,
    ) -> CoreResult<Self> {
        let edges = [min_latitude, max_latitude, min_longitude, max_longitude];
        if edges.iter().any(|e| !e.is_finite()) {
            return Err(CoreError::validation("region edges must be finite"));
        }
        if min_latitude > max_latitude || min_longitude > max_longitude {
            return Err(CoreError::validation(
                "region edges must be ordered min before max",
            ));
        }
        Ok(Self {
            min_latitude,
            max_latitude,
            min_longitude,
            max_longitude,
        })
    }

    /// Returns `true` if the point lies inside the box (edges inclusive).
    #[must_use]
    pub fn contains(&self, latitude: f64, longitude: f64) -> bool {
        latitude >= self.min_latitude
            && latitude <= self.max_latitude
            && longitude >= self.min_longitude
            && longitude <= self.max_longitude
    }
}

/// Parameters supplied when a stream starts.
///
/// A new start supersedes the previous stream's parameters for that feed.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StreamParams {
    /// Optional identifier filter: only observations whose normalized
    /// identifier equals this value are admitted
    pub filter: Option<String>,
    /// Optional region bound: observations outside it are dropped at the
    /// boundary
    pub region: Option<RegionBounds>,
}

impl StreamParams {
    /// Creates empty parameters (everything admitted).
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the identifier filter. The value is normalized the same way feed
    /// identifiers are; a blank filter means no filter.
    #[must_use]
    pub fn with_filter(mut self, filter: impl AsRef<str>) -> Self {
        self.filter = TrackKey::normalize_identifier(filter.as_ref());
        self
    }

    /// Sets the region bound.
    #[must_use]
    pub fn with_region(mut self, region: RegionBounds) -> Self {
        self.region = Some(region);
        self
    }

    /// Decides whether a positional observation passes these parameters.
    #[must_use]
    pub fn admits(&self, identifier: Option<&str>, latitude: f64, longitude: f64) -> bool {
        self.admits_identity(identifier, Some((latitude, longitude)))
    }

    /// Decides whether an identity report passes these parameters. The
    /// region bound only applies when the report carries a position.
    #[must_use]
    pub fn admits_identity(
        &self,
        identifier: Option<&str>,
        position: Option<(f64, f64)>,
    ) -> bool {
        if let (Some(region), Some((latitude, longitude))) = (&self.region, position) {
            if !region.contains(latitude, longitude) {
                return false;
            }
        }
        if let Some(filter) = &self.filter {
            return identifier == Some(filter.as_str());
        }
        true
    }
}

// =============================================================================
// Raw frames
// =============================================================================

/// Accepts a number or a numeric string, treating anything else as absent.
///
/// One historical feed path delivered heading as the string `"0"`; values
/// that do not parse as numbers are dropped rather than failing the frame.
fn numeric_or_string<'de, D>(deserializer: D) -> std::result::Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Number(f64),
        Text(String),
    }

    Ok(match Option::<Raw>::deserialize(deserializer)? {
        None => None,
        Some(Raw::Number(n)) => Some(n),
        Some(Raw::Text(s)) => s.trim().parse::<f64>().ok(),
    })
}

/// Raw positional frame as delivered by the transport.
#[derive(Debug, Clone, Deserialize)]
pub struct RawRadarFrame {
    /// Opaque feed identifier
    #[serde(default)]
    pub id: Option<String>,
    /// Latitude, under any of its historical names
    #[serde(default, alias = "latitude", alias = "y_coordinate")]
    pub lat: Option<f64>,
    /// Longitude, under any of its historical names
    #[serde(default, alias = "longitude", alias = "x_coordinate")]
    pub lon: Option<f64>,
    /// Ground speed
    #[serde(default, alias = "speed")]
    pub velocity: Option<f64>,
    /// Barometric altitude, under any of its historical names
    #[serde(
        default,
        rename = "baroAlt",
        alias = "baro_altitude",
        alias = "baroAltitude"
    )]
    pub baro_alt: Option<f64>,
    /// Geometric altitude, under any of its historical names
    #[serde(
        default,
        rename = "geoAlt",
        alias = "geo_altitude",
        alias = "geoAltitude"
    )]
    pub geo_alt: Option<f64>,
    /// Heading; tolerates numeric strings
    #[serde(default, deserialize_with = "numeric_or_string")]
    pub heading: Option<f64>,
}

impl RawRadarFrame {
    /// Normalizes the frame into a canonical positional observation.
    ///
    /// # Errors
    ///
    /// Returns a malformed-frame error when coordinates are missing or
    /// non-finite.
    pub fn normalize(self) -> Result<RadarObservation> {
        let latitude = self
            .lat
            .ok_or_else(|| EngineError::malformed_frame("latitude missing"))?;
        let longitude = self
            .lon
            .ok_or_else(|| EngineError::malformed_frame("longitude missing"))?;
        if !latitude.is_finite() || !longitude.is_finite() {
            return Err(EngineError::malformed_frame(format!(
                "non-finite coordinates ({latitude}, {longitude})"
            )));
        }

        Ok(RadarObservation {
            identifier: self
                .id
                .as_deref()
                .and_then(TrackKey::normalize_identifier),
            latitude,
            longitude,
            velocity: self.velocity,
            barometric_altitude: self.baro_alt,
            geometric_altitude: self.geo_alt,
            heading: self.heading,
        })
    }
}

/// Raw identity frame as delivered by the transport.
#[derive(Debug, Clone, Deserialize)]
pub struct RawIffFrame {
    /// Opaque feed identifier
    #[serde(default)]
    pub id: Option<String>,
    /// Free-form status string
    #[serde(default)]
    pub status: Option<String>,
    /// Latitude, under any of its historical names
    #[serde(default, alias = "latitude", alias = "y_coordinate")]
    pub lat: Option<f64>,
    /// Longitude, under any of its historical names
    #[serde(default, alias = "longitude", alias = "x_coordinate")]
    pub lon: Option<f64>,
    /// Reported callsign
    #[serde(default, alias = "callSign")]
    pub callsign: Option<String>,
}

impl RawIffFrame {
    /// Normalizes the frame into a canonical identity observation.
    ///
    /// Identity frames have no required fields; a frame that normalizes to
    /// neither an identifier nor a position is skipped later, at the store.
    #[must_use]
    pub fn normalize(self) -> IffObservation {
        let callsign = self
            .callsign
            .map(|c| c.trim().to_string())
            .filter(|c| !c.is_empty());

        IffObservation {
            identifier: self
                .id
                .as_deref()
                .and_then(TrackKey::normalize_identifier),
            latitude: self.lat,
            longitude: self.lon,
            status: IffStatus::parse(self.status.as_deref().unwrap_or("")),
            callsign,
        }
    }
}

/// Parses and normalizes one positional frame from JSON.
///
/// # Errors
///
/// Returns a malformed-frame error when the JSON does not decode or the
/// frame fails normalization.
pub fn parse_radar_frame(json: &str) -> Result<RadarObservation> {
    let frame: RawRadarFrame = serde_json::from_str(json)?;
    frame.normalize()
}

/// Parses and normalizes one identity frame from JSON.
///
/// # Errors
///
/// Returns a malformed-frame error when the JSON does not decode.
pub fn parse_iff_frame(json: &str) -> Result<IffObservation> {
    let frame: RawIffFrame = serde_json::from_str(json)?;
    Ok(frame.normalize())
}
