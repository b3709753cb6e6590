//! Track fusion engine for dual-feed air surveillance.
//!
//! Correlates a positional radar feed with an identity (IFF) feed into
//! live fused tracks. Correlation tries an exact identifier match first,
//! then falls back to proximity: previously-resolved locks within 3 km,
//! then raw identity reports within 5 km. Operator overrides outrank
//! everything until reset. A track with no positional update for two
//! seconds is evicted; every update is scored for suspicion off the hot
//! path, and tracks with a positive score are republished as a complete
//! sorted list on every change.
//!
//! ```text
//!   radar feed ──► feed ──► ┌──────────────┐ ──► TrackEvent broadcast
//!                           │ FusionEngine │
//!   iff feed ────► feed ──► │  (one task,  │ ──► audit trail
//!                           │  one queue)  │
//!   operator ──► handle ──► └──────┬───────┘
//!                                  │ ▲
//!                        classifier▼ │verdict events
//! ```
//!
//! # Quick start
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use skyfuse_engine::audit::MemoryAuditSink;
//! use skyfuse_engine::{EngineConfig, FusionEngine, RadarObservation};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let engine = FusionEngine::new(EngineConfig::default())
//!         .with_audit_sink(Arc::new(MemoryAuditSink::new()));
//!     let handle = engine.handle();
//!     let mut events = handle.subscribe();
//!     tokio::spawn(engine.run());
//!
//!     handle.radar_observation(RadarObservation::new(Some("AB12"), 39.9, 32.8))?;
//!     let event = events.recv().await?;
//!     println!("{}", event.event_type());
//!
//!     handle.shutdown()?;
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod audit;
pub mod classify;
pub mod config;
pub mod correlation;
pub mod domain;
mod engine;
pub mod error;
pub mod feed;
pub mod tracking;

pub use audit::{AuditRecord, AuditSink, FileAuditSink, MemoryAuditSink};
pub use classify::{
    ClassificationRequest, ClassifierVerdict, RuleClassifier, RuleClassifierConfig,
    SuspicionClassifier,
};
pub use config::{EngineConfig, EngineConfigBuilder};
pub use domain::{
    Classification, IffObservation, RadarObservation, RemovalReason, SuspiciousEntry, Track,
    TrackEvent, TrackSnapshot,
};
pub use engine::{EngineHandle, FusionEngine};
pub use error::{EngineError, Result};
pub use feed::{
    parse_iff_frame, parse_radar_frame, FeedKind, RawIffFrame, RawRadarFrame, RegionBounds,
    StreamParams,
};

/// Engine crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Convenient single-import surface for consumers.
pub mod prelude {
    pub use crate::audit::{AuditSink, FileAuditSink, MemoryAuditSink};
    pub use crate::classify::{RuleClassifier, SuspicionClassifier};
    pub use crate::config::EngineConfig;
    pub use crate::domain::{
        IffObservation, RadarObservation, TrackEvent, TrackSnapshot,
    };
    pub use crate::engine::{EngineHandle, FusionEngine};
    pub use crate::error::{EngineError, Result};
    pub use crate::feed::{FeedKind, RegionBounds, StreamParams};
    pub use skyfuse_core::{IffStatus, Probability, TrackKey};
}

#[cfg(test)]
mod tests {
    #[test]
    fn test_version_is_set() {
        assert!(!super::VERSION.is_empty());
    }
}
