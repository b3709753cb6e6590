//! Operator status overrides.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use skyfuse_core::{IffStatus, TrackKey};

/// An operator's standing decision about a track.
///
/// Overrides outrank feed correlation and survive track eviction; they are
/// only ever dropped by an explicit reset.
#[derive(Debug, Clone, PartialEq)]
pub struct StatusOverride {
    /// Status the operator pinned
    pub status: IffStatus,
    /// Callsign the operator pinned, when one was given
    pub callsign: Option<String>,
    /// When the override was applied
    pub applied_at: DateTime<Utc>,
}

/// Overrides keyed by track.
#[derive(Debug, Default)]
pub struct OverrideStore {
    overrides: HashMap<TrackKey, StatusOverride>,
}

impl OverrideStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Pins `status` (and optionally a callsign) for `key`, replacing any
    /// previous override.
    pub fn set(&mut self, key: TrackKey, status: IffStatus, callsign: Option<String>) {
        self.overrides.insert(
            key,
            StatusOverride {
                status,
                callsign,
                applied_at: Utc::now(),
            },
        );
    }

    /// Looks up the override for `key`.
    #[must_use]
    pub fn get(&self, key: &TrackKey) -> Option<&StatusOverride> {
        self.overrides.get(key)
    }

    /// Removes the override for `key`, returning it if one existed.
    pub fn remove(&mut self, key: &TrackKey) -> Option<StatusOverride> {
        self.overrides.remove(key)
    }

    /// Number of overrides held.
    #[must_use]
    pub fn len(&self) -> usize {
        self.overrides.len()
    }

    /// Returns `true` when no overrides are held.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.overrides.is_empty()
    }
}
