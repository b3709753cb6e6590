//! # SkyFuse Core
//!
//! Core types and utilities for the SkyFuse track-fusion system.
//!
//! This crate provides the foundational building blocks shared across the
//! SkyFuse workspace:
//!
//! - **Value Types**: [`TrackKey`], [`IffStatus`], and [`Probability`] for
//!   representing correlation keys, identity classifications, and suspicion
//!   scores.
//!
//! - **Geographic Math**: the [`geo`] module with haversine distance and
//!   tolerance comparison, used by proximity correlation.
//!
//! - **Error Types**: [`CoreError`] and [`CoreResult`] via the [`error`]
//!   module.
//!
//! ## Feature Flags
//!
//! - `serde`: Enable serialization/deserialization via serde
//!
//! ## Example
//!
//! ```rust
//! use skyfuse_core::{IffStatus, TrackKey};
//!
//! // A raw feed identifier normalizes into a stable key.
//! let key = TrackKey::from_parts(Some("  ab12 "), 39.9, 32.8);
//! assert_eq!(key.as_str(), "AB12");
//!
//! // A free-form status string maps onto the enumeration.
//! assert_eq!(IffStatus::parse("hostile"), IffStatus::Foe);
//! ```

#![forbid(unsafe_code)]

pub mod error;
pub mod geo;
pub mod types;

// Re-export commonly used types at the crate root
pub use error::{CoreError, CoreResult};
pub use geo::{distance_km, within_tolerance, EARTH_RADIUS_KM};
pub use types::{IffStatus, Probability, TrackKey};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Prelude module for convenient imports.
///
/// ```rust
/// use skyfuse_core::prelude::*;
/// ```
pub mod prelude {
    pub use crate::error::{CoreError, CoreResult};
    pub use crate::geo::{distance_km, within_tolerance, EARTH_RADIUS_KM};
    pub use crate::types::{IffStatus, Probability, TrackKey};
}
