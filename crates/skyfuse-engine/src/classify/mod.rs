//! Suspicion classification.
//!
//! Every fused update produces a feature vector that is scored by a
//! [`SuspicionClassifier`], off the engine's event loop. Verdicts come back
//! as events and are merged only when the originating track is still alive;
//! the set of tracks with a positive probability is republished whole on
//! every change.

pub mod classifier;
pub mod features;
pub(crate) mod gateway;
pub mod suspicious;

pub use classifier::{RuleClassifier, RuleClassifierConfig, SuspicionClassifier};
pub use features::{ClassificationRequest, ClassifierVerdict};
pub use suspicious::SuspiciousSet;

pub(crate) use gateway::ClassificationGateway;
