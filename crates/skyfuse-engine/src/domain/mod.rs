//! Domain module containing the fused-track aggregate and its events.
//!
//! - **Observations**: canonical, already-normalized feed inputs
//!   ([`RadarObservation`], [`IffObservation`])
//! - **Aggregate**: the fused [`Track`] and its outbound [`TrackSnapshot`]
//! - **Events**: outbound notifications ([`TrackEvent`]) and the suspicious
//!   list entries

pub mod events;
pub mod observation;
pub mod track;

// Re-export all domain types
pub use events::*;
pub use observation::*;
pub use track::*;
