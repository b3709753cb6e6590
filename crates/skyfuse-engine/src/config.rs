//! Engine configuration.

use std::time::Duration;

/// Configuration for a [`FusionEngine`](crate::FusionEngine).
#[derive(Debug, Clone, PartialEq)]
pub struct EngineConfig {
    /// How long a track survives without a positional update before eviction
    pub eviction_deadline: Duration,
    /// Proximity radius for reusing an existing lock, in kilometers
    pub lock_tolerance_km: f64,
    /// Proximity radius for the one-time identity search, in kilometers
    pub identity_tolerance_km: f64,
    /// Capacity of the outbound track-event broadcast channel
    pub broadcast_capacity: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            eviction_deadline: Duration::from_millis(2000), // 2 s without data evicts
            lock_tolerance_km: 3.0,                         // lock reuse radius
            identity_tolerance_km: 5.0,                     // raw identity search radius
            broadcast_capacity: 256,
        }
    }
}

impl EngineConfig {
    /// Creates a builder for constructing a configuration.
    #[must_use]
    pub fn builder() -> EngineConfigBuilder {
        EngineConfigBuilder::default()
    }
}

/// Builder for [`EngineConfig`].
///
/// Setters clamp their input into the valid range rather than failing.
#[derive(Debug, Default)]
pub struct EngineConfigBuilder {
    config: EngineConfig,
}

impl EngineConfigBuilder {
    /// Sets the eviction deadline (clamped to at least 1 ms).
    #[must_use]
    pub fn eviction_deadline(mut self, deadline: Duration) -> Self {
        self.config.eviction_deadline = deadline.max(Duration::from_millis(1));
        self
    }

    /// Sets the lock reuse radius in kilometers (clamped to non-negative).
    #[must_use]
    pub fn lock_tolerance_km(mut self, km: f64) -> Self {
        self.config.lock_tolerance_km = km.max(0.0);
        self
    }

    /// Sets the raw identity search radius in kilometers (clamped to
    /// non-negative).
    #[must_use]
    pub fn identity_tolerance_km(mut self, km: f64) -> Self {
        self.config.identity_tolerance_km = km.max(0.0);
        self
    }

    /// Sets the broadcast channel capacity (clamped to at least 8).
    #[must_use]
    pub fn broadcast_capacity(mut self, capacity: usize) -> Self {
        self.config.broadcast_capacity = capacity.max(8);
        self
    }

    /// Builds the configuration.
    #[must_use]
    pub fn build(self) -> EngineConfig {
        self.config
    }
}
