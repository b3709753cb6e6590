//! Wire shapes shared with the scoring service.

use serde::{Deserialize, Serialize};
use skyfuse_core::{CoreError, CoreResult, Probability};

use crate::domain::{Classification, TrackSnapshot};

/// The flattened feature vector sent for scoring.
///
/// Field names and shapes are fixed by the external service: two identifier
/// slots (`id2` empty when the track never carried a feed identifier),
/// status in display form under `friend_foe`, and heading coerced to `0.0`
/// when absent. Optional kinematics serialize as `null`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassificationRequest {
    /// Track key
    pub id1: String,
    /// Raw normalized feed identifier, empty when absent
    pub id2: String,
    /// Current callsign
    pub callsign: String,
    /// Status display form
    pub friend_foe: String,
    /// Latitude in degrees
    pub lat: f64,
    /// Longitude in degrees
    pub lon: f64,
    /// Ground speed
    pub speed: Option<f64>,
    /// Barometric altitude
    #[serde(rename = "baroAltitude")]
    pub baro_altitude: Option<f64>,
    /// Geometric altitude
    #[serde(rename = "geoAltitude")]
    pub geo_altitude: Option<f64>,
    /// Heading, `0.0` when the track has none
    pub heading: f64,
}

impl ClassificationRequest {
    /// Flattens a track snapshot into the service's feature vector.
    #[must_use]
    pub fn from_snapshot(snapshot: &TrackSnapshot) -> Self {
        Self {
            id1: snapshot.key.as_str().to_string(),
            id2: snapshot.identifier.clone().unwrap_or_default(),
            callsign: snapshot.callsign.clone(),
            friend_foe: snapshot.status.as_str().to_string(),
            lat: snapshot.latitude,
            lon: snapshot.longitude,
            speed: snapshot.velocity,
            baro_altitude: snapshot.barometric_altitude,
            geo_altitude: snapshot.geometric_altitude,
            heading: snapshot.heading.unwrap_or(0.0),
        }
    }
}

/// The scoring service's raw answer.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ClassifierVerdict {
    /// Binary decision: `1` suspicious, `0` not
    pub prediction: u8,
    /// Score in `[0, 1]`
    pub probability: f64,
}

impl ClassifierVerdict {
    /// Validates the raw answer into a track classification.
    ///
    /// # Errors
    ///
    /// Returns an error when `prediction` is not `0` or `1`, or
    /// `probability` falls outside `[0, 1]`.
    pub fn into_classification(self) -> CoreResult<Classification> {
        if self.prediction > 1 {
            return Err(CoreError::validation(format!(
                "prediction must be 0 or 1, got {}",
                self.prediction
            )));
        }
        Ok(Classification {
            suspicious: self.prediction == 1,
            probability: Probability::new(self.probability)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use skyfuse_core::{IffStatus, TrackKey};

    use crate::domain::RadarObservation;
    use crate::domain::Track;

    fn snapshot() -> TrackSnapshot {
        let observation = RadarObservation::new(Some("ab12"), 39.9, 32.8)
            .with_velocity(420.0)
            .with_altitudes(9000.0, 9150.0);
        Track::create(
            TrackKey::from_identifier("ab12").unwrap(),
            &observation,
            IffStatus::Foe,
            "EAGLE1".to_string(),
            1,
        )
        .snapshot()
    }

    #[test]
    fn test_feature_vector_shape() {
        let request = ClassificationRequest::from_snapshot(&snapshot());

        assert_eq!(request.id1, "AB12");
        assert_eq!(request.id2, "AB12");
        assert_eq!(request.friend_foe, "FOE");
        assert_eq!(request.speed, Some(420.0));
        // Absent heading is coerced, the service rejects nulls here.
        assert_eq!(request.heading, 0.0);
    }

    #[test]
    fn test_wire_field_names() {
        let json = serde_json::to_value(ClassificationRequest::from_snapshot(&snapshot())).unwrap();

        assert!(json.get("baroAltitude").is_some());
        assert!(json.get("geoAltitude").is_some());
        assert!(json.get("friend_foe").is_some());
        assert!(json.get("baro_altitude").is_none());
    }

    #[test]
    fn test_verdict_validation() {
        let valid = ClassifierVerdict { prediction: 1, probability: 0.8 };
        let classification = valid.into_classification().unwrap();
        assert!(classification.suspicious);
        assert!((classification.probability.value() - 0.8).abs() < f64::EPSILON);

        assert!(ClassifierVerdict { prediction: 2, probability: 0.5 }
            .into_classification()
            .is_err());
        assert!(ClassifierVerdict { prediction: 0, probability: 1.5 }
            .into_classification()
            .is_err());
    }

    #[test]
    fn test_verdict_parses_service_response() {
        let verdict: ClassifierVerdict =
            serde_json::from_str(r#"{"prediction":1,"probability":0.97}"#).unwrap();
        assert_eq!(verdict.prediction, 1);
    }
}
