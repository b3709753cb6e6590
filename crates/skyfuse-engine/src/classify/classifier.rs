//! The classifier seam and the built-in rule-based scorer.

use async_trait::async_trait;

use crate::classify::{ClassificationRequest, ClassifierVerdict};
use crate::error::Result;

/// Scores a feature vector for suspicion.
///
/// Implementations may call out over the network; they run off the engine's
/// event loop and must tolerate being raced by eviction (their verdict can
/// be discarded).
#[async_trait]
pub trait SuspicionClassifier: Send + Sync {
    /// Short implementation name, used in logs.
    fn name(&self) -> &str;

    /// Scores one feature vector.
    async fn classify(&self, request: &ClassificationRequest) -> Result<ClassifierVerdict>;
}

/// Tunable weights for [`RuleClassifier`].
#[derive(Debug, Clone)]
pub struct RuleClassifierConfig {
    /// Added when the fused status is FOE
    pub foe_weight: f64,
    /// Added when the fused status is UNKNOWN
    pub unknown_identity_weight: f64,
    /// Added when the track never carried a feed identifier
    pub missing_identifier_weight: f64,
    /// Speed above which the speed signal fires
    pub high_speed_kmh: f64,
    /// Added when the speed signal fires
    pub high_speed_weight: f64,
    /// Barometric/geometric divergence above which the altitude signal fires
    pub altitude_gap_m: f64,
    /// Added when the altitude signal fires
    pub altitude_gap_weight: f64,
    /// Score at or above which the binary decision is suspicious
    pub decision_threshold: f64,
}

impl Default for RuleClassifierConfig {
    fn default() -> Self {
        Self {
            foe_weight: 0.85,
            unknown_identity_weight: 0.35,
            missing_identifier_weight: 0.15,
            high_speed_kmh: 900.0,
            high_speed_weight: 0.25,
            altitude_gap_m: 1500.0,
            altitude_gap_weight: 0.15,
            decision_threshold: 0.5,
        }
    }
}

/// Deterministic in-process scorer, the default when no external service is
/// wired in.
///
/// Sums fixed weights for hostile or unknown identity, a missing feed
/// identifier, implausible speed and diverging altimeters. A declared
/// friend always scores zero.
#[derive(Debug, Default)]
pub struct RuleClassifier {
    config: RuleClassifierConfig,
}

impl RuleClassifier {
    /// Creates a scorer with default weights.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a scorer with custom weights.
    #[must_use]
    pub fn with_config(config: RuleClassifierConfig) -> Self {
        Self { config }
    }
}

#[async_trait]
impl SuspicionClassifier for RuleClassifier {
    fn name(&self) -> &str {
        "rule"
    }

    async fn classify(&self, request: &ClassificationRequest) -> Result<ClassifierVerdict> {
        let mut score = 0.0_f64;

        match request.friend_foe.as_str() {
            "FRIEND" => {
                return Ok(ClassifierVerdict {
                    prediction: 0,
                    probability: 0.0,
                })
            }
            "FOE" => score += self.config.foe_weight,
            "UNKNOWN" => score += self.config.unknown_identity_weight,
            _ => {}
        }

        if request.id2.is_empty() {
            score += self.config.missing_identifier_weight;
        }
        if let Some(speed) = request.speed {
            if speed > self.config.high_speed_kmh {
                score += self.config.high_speed_weight;
            }
        }
        if let (Some(baro), Some(geo)) = (request.baro_altitude, request.geo_altitude) {
            if (baro - geo).abs() > self.config.altitude_gap_m {
                score += self.config.altitude_gap_weight;
            }
        }

        let probability = score.clamp(0.0, 1.0);
        Ok(ClassifierVerdict {
            prediction: u8::from(probability >= self.config.decision_threshold),
            probability,
        })
    }
}
