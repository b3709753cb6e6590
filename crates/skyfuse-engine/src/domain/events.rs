//! Outbound engine notifications.
//!
//! Consumers subscribe to a broadcast of [`TrackEvent`]s. Every update
//! carries a full [`TrackSnapshot`], removals carry the affected keys, and
//! the suspicious list is always republished whole, never as a diff.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use skyfuse_core::{IffStatus, Probability, TrackKey};

use super::track::TrackSnapshot;

/// Why a track (or a batch of tracks) was removed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RemovalReason {
    /// No positional update arrived within the eviction deadline
    DeadlineElapsed,
    /// The positional stream ended or errored; all tracks were cleared
    StreamReset,
}

impl RemovalReason {
    /// Returns a static label for this reason.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::DeadlineElapsed => "deadline_elapsed",
            Self::StreamReset => "stream_reset",
        }
    }
}

impl std::fmt::Display for RemovalReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One row of the republished suspicious list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SuspiciousEntry {
    /// Correlation key of the suspicious track
    pub key: TrackKey,
    /// Callsign at the time of the verdict
    pub callsign: String,
    /// Status at the time of the verdict
    pub status: IffStatus,
    /// Classifier score
    pub probability: Probability,
    /// Latitude in degrees
    pub latitude: f64,
    /// Longitude in degrees
    pub longitude: f64,
    /// Ground speed, if known
    pub velocity: Option<f64>,
    /// Heading in degrees, if known
    pub heading: Option<f64>,
    /// Barometric altitude, if known
    pub barometric_altitude: Option<f64>,
    /// Geometric altitude, if known
    pub geometric_altitude: Option<f64>,
}

impl SuspiciousEntry {
    /// Builds an entry from a track snapshot and its score.
    #[must_use]
    pub fn from_snapshot(snapshot: &TrackSnapshot, probability: Probability) -> Self {
        Self {
            key: snapshot.key.clone(),
            callsign: snapshot.callsign.clone(),
            status: snapshot.status,
            probability,
            latitude: snapshot.latitude,
            longitude: snapshot.longitude,
            velocity: snapshot.velocity,
            heading: snapshot.heading,
            barometric_altitude: snapshot.barometric_altitude,
            geometric_altitude: snapshot.geometric_altitude,
        }
    }
}

/// Notification published to track consumers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum TrackEvent {
    /// A track was created or updated; carries the full current state
    Updated {
        /// Snapshot after the change
        track: TrackSnapshot,
        /// When the notification was produced
        timestamp: DateTime<Utc>,
    },
    /// One or more tracks were removed
    Removed {
        /// Keys of the removed tracks
        keys: Vec<TrackKey>,
        /// Why they were removed
        reason: RemovalReason,
        /// When the notification was produced
        timestamp: DateTime<Utc>,
    },
    /// The suspicious set changed; carries the complete replacement list,
    /// sorted by probability descending
    SuspiciousList {
        /// The full current list
        entries: Vec<SuspiciousEntry>,
        /// When the notification was produced
        timestamp: DateTime<Utc>,
    },
}

impl TrackEvent {
    /// Creates an update notification stamped now.
    #[must_use]
    pub fn updated(track: TrackSnapshot) -> Self {
        Self::Updated {
            track,
            timestamp: Utc::now(),
        }
    }

    /// Creates a removal notification stamped now.
    #[must_use]
    pub fn removed(keys: Vec<TrackKey>, reason: RemovalReason) -> Self {
        Self::Removed {
            keys,
            reason,
            timestamp: Utc::now(),
        }
    }

    /// Creates a suspicious-list notification stamped now.
    #[must_use]
    pub fn suspicious_list(entries: Vec<SuspiciousEntry>) -> Self {
        Self::SuspiciousList {
            entries,
            timestamp: Utc::now(),
        }
    }

    /// Returns when the notification was produced.
    #[must_use]
    pub fn timestamp(&self) -> DateTime<Utc> {
        match self {
            Self::Updated { timestamp, .. }
            | Self::Removed { timestamp, .. }
            | Self::SuspiciousList { timestamp, .. } => *timestamp,
        }
    }

    /// Returns a static label for the notification kind.
    #[must_use]
    pub const fn event_type(&self) -> &'static str {
        match self {
            Self::Updated { .. } => "TrackUpdated",
            Self::Removed { .. } => "TracksRemoved",
            Self::SuspiciousList { .. } => "SuspiciousList",
        }
    }
}
