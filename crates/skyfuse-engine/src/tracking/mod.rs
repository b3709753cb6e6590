//! Track storage and lifecycle.

pub(crate) mod scheduler;
pub mod store;

pub(crate) use scheduler::EvictionScheduler;
pub use store::TrackStore;
