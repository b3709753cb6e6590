//! Correlation of positional observations with identity reports.
//!
//! Three layers cooperate here. [`IdentityStore`] holds the latest identity
//! report per key. [`LockTable`] remembers which identity a position was
//! last matched to, so a target that keeps moving does not re-run the
//! search on every sweep. [`CorrelationResolver`] ties the two together and
//! decides the track key, status and callsign for each positional
//! observation. Operator decisions live in [`OverrideStore`] and are applied
//! after resolution, never inside it.

pub mod identity;
pub mod locks;
pub mod overrides;
pub mod resolver;

pub use identity::IdentityStore;
pub use locks::{Lock, LockTable};
pub use overrides::{OverrideStore, StatusOverride};
pub use resolver::{CorrelationResolver, Resolution, ResolutionSource};
