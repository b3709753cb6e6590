//! Core value types for the SkyFuse track-fusion system.
//!
//! This module defines the small, pure value objects shared across the
//! system:
//!
//! - [`TrackKey`]: the stable correlation key identifying a fused track
//! - [`IffStatus`]: the normalized friend/foe classification enumeration
//! - [`Probability`]: a validated score in the range [0.0, 1.0]

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult};

// =============================================================================
// Track keys
// =============================================================================

/// Quantization scale for synthetic position-derived keys (5 decimal places).
const SYNTHETIC_SCALE: f64 = 1e5;

/// Stable correlation key for a fused track.
///
/// A key is the normalized identifier (trimmed, uppercased) when the
/// observation carries one; otherwise a synthetic key derived from the
/// quantized position, so repeated observations of the same unidentified
/// object collapse to one key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct TrackKey(String);

impl TrackKey {
    /// Normalizes a raw identifier: trims surrounding whitespace and
    /// uppercases. Returns `None` when nothing remains.
    #[must_use]
    pub fn normalize_identifier(raw: &str) -> Option<String> {
        let cleaned = raw.trim().to_uppercase();
        if cleaned.is_empty() {
            None
        } else {
            Some(cleaned)
        }
    }

    /// Creates a key from a raw identifier, if it normalizes to something.
    #[must_use]
    pub fn from_identifier(raw: &str) -> Option<Self> {
        Self::normalize_identifier(raw).map(Self)
    }

    /// Creates a synthetic key from a position.
    ///
    /// Each coordinate is rounded at the fifth decimal place, so positions
    /// closer than roughly a meter produce the same key.
    #[must_use]
    pub fn from_position(latitude: f64, longitude: f64) -> Self {
        let qlat = (latitude * SYNTHETIC_SCALE).round() as i64;
        let qlon = (longitude * SYNTHETIC_SCALE).round() as i64;
        Self(format!("{qlat}_{qlon}"))
    }

    /// Derives the key for an observation: identifier when present,
    /// synthetic position key otherwise.
    #[must_use]
    pub fn from_parts(identifier: Option<&str>, latitude: f64, longitude: f64) -> Self {
        identifier
            .and_then(Self::from_identifier)
            .unwrap_or_else(|| Self::from_position(latitude, longitude))
    }

    /// Returns the key as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes the key, returning the inner string.
    #[must_use]
    pub fn into_string(self) -> String {
        self.0
    }
}

impl std::fmt::Display for TrackKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<TrackKey> for String {
    fn from(key: TrackKey) -> Self {
        key.0
    }
}

// =============================================================================
// IFF status
// =============================================================================

/// Normalized friend/foe classification.
///
/// Feeds deliver this as a free-form string; [`IffStatus::parse`] maps the
/// historical spellings onto the enumeration and anything unrecognized onto
/// [`IffStatus::Unknown`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum IffStatus {
    /// Confirmed friendly platform
    Friend,
    /// Confirmed hostile platform
    Foe,
    /// Known platform with no side affiliation
    Neutral,
    /// No identity information available
    #[default]
    Unknown,
}

impl IffStatus {
    /// Parses a free-form feed status string, case-insensitively.
    ///
    /// `friend`/`friendly` map to [`Friend`](Self::Friend),
    /// `foe`/`hostile`/`enemy` to [`Foe`](Self::Foe), `neutral` to
    /// [`Neutral`](Self::Neutral); everything else (including empty) is
    /// [`Unknown`](Self::Unknown).
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "friend" | "friendly" => Self::Friend,
            "foe" | "hostile" | "enemy" => Self::Foe,
            "neutral" => Self::Neutral,
            _ => Self::Unknown,
        }
    }

    /// Returns the canonical uppercase token for this status.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Friend => "FRIEND",
            Self::Foe => "FOE",
            Self::Neutral => "NEUTRAL",
            Self::Unknown => "UNKNOWN",
        }
    }

    /// Returns `true` if no identity information is available.
    #[must_use]
    pub const fn is_unknown(&self) -> bool {
        matches!(self, Self::Unknown)
    }

    /// Returns `true` for a confirmed hostile.
    #[must_use]
    pub const fn is_foe(&self) -> bool {
        matches!(self, Self::Foe)
    }
}

impl std::fmt::Display for IffStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// =============================================================================
// Probability
// =============================================================================

/// Probability score in the range [0.0, 1.0].
#[derive(Debug, Clone, Copy, Default, PartialEq, PartialOrd)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Probability(f64);

impl Probability {
    /// Maximum probability (1.0).
    pub const MAX: Self = Self(1.0);

    /// Minimum probability (0.0).
    pub const MIN: Self = Self(0.0);

    /// Creates a new probability.
    ///
    /// # Errors
    ///
    /// Returns an error if the value is not in the range [0.0, 1.0].
    pub fn new(value: f64) -> CoreResult<Self> {
        if !(0.0..=1.0).contains(&value) {
            return Err(CoreError::validation(format!(
                "Probability must be in [0.0, 1.0], got {value}"
            )));
        }
        Ok(Self(value))
    }

    /// Creates a probability by clamping the value into [0.0, 1.0].
    ///
    /// Non-finite input clamps to 0.0.
    #[must_use]
    pub fn clamped(value: f64) -> Self {
        if value.is_finite() {
            Self(value.clamp(0.0, 1.0))
        } else {
            Self(0.0)
        }
    }

    /// Returns the raw probability value.
    #[must_use]
    pub const fn value(&self) -> f64 {
        self.0
    }

    /// Returns `true` if the probability is strictly greater than zero.
    #[must_use]
    pub fn is_positive(&self) -> bool {
        self.0 > 0.0
    }
}

impl std::fmt::Display for Probability {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.2}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // -------------------------------------------------------------------------
    // TrackKey
    // -------------------------------------------------------------------------

    #[test]
    fn test_identifier_normalization() {
        assert_eq!(
            TrackKey::normalize_identifier("  ab12 "),
            Some("AB12".to_string())
        );
        assert_eq!(TrackKey::normalize_identifier("   "), None);
        assert_eq!(TrackKey::normalize_identifier(""), None);
    }

    #[test]
    fn test_key_from_identifier_and_position_agree_on_precedence() {
        let key = TrackKey::from_parts(Some("ab12"), 39.9, 32.8);
        assert_eq!(key.as_str(), "AB12");

        let key = TrackKey::from_parts(Some("  "), 39.9, 32.8);
        assert_eq!(key, TrackKey::from_position(39.9, 32.8));
    }

    #[test]
    fn test_synthetic_key_quantization() {
        let key = TrackKey::from_position(10.0001, 20.0001);
        assert_eq!(key.as_str(), "1000010_2000010");

        // Sub-precision jitter collapses to the same key.
        assert_eq!(
            TrackKey::from_position(10.000101, 20.000099),
            TrackKey::from_position(10.0001, 20.0001)
        );
    }

    #[test]
    fn test_synthetic_key_negative_coordinates() {
        let key = TrackKey::from_position(-33.8688, 151.2093);
        assert_eq!(key.as_str(), "-3386880_15120930");
    }

    // -------------------------------------------------------------------------
    // IffStatus
    // -------------------------------------------------------------------------

    #[test]
    fn test_status_parse_table() {
        assert_eq!(IffStatus::parse("friend"), IffStatus::Friend);
        assert_eq!(IffStatus::parse("Friendly"), IffStatus::Friend);
        assert_eq!(IffStatus::parse("FOE"), IffStatus::Foe);
        assert_eq!(IffStatus::parse("hostile"), IffStatus::Foe);
        assert_eq!(IffStatus::parse("Enemy"), IffStatus::Foe);
        assert_eq!(IffStatus::parse("neutral"), IffStatus::Neutral);
        assert_eq!(IffStatus::parse("bogey"), IffStatus::Unknown);
        assert_eq!(IffStatus::parse(""), IffStatus::Unknown);
    }

    #[test]
    fn test_status_display() {
        assert_eq!(IffStatus::Foe.to_string(), "FOE");
        assert_eq!(IffStatus::default().to_string(), "UNKNOWN");
    }

    // -------------------------------------------------------------------------
    // Probability
    // -------------------------------------------------------------------------

    #[test]
    fn test_probability_range() {
        assert!(Probability::new(0.5).is_ok());
        assert!(Probability::new(0.0).is_ok());
        assert!(Probability::new(1.0).is_ok());
        assert!(Probability::new(1.1).is_err());
        assert!(Probability::new(-0.1).is_err());
        assert!(Probability::new(f64::NAN).is_err());
    }

    #[test]
    fn test_probability_clamped() {
        assert_eq!(Probability::clamped(1.7), Probability::MAX);
        assert_eq!(Probability::clamped(-2.0), Probability::MIN);
        assert_eq!(Probability::clamped(f64::NAN), Probability::MIN);
    }

    #[test]
    fn test_probability_is_positive() {
        assert!(Probability::new(0.01).unwrap().is_positive());
        assert!(!Probability::MIN.is_positive());
    }
}
