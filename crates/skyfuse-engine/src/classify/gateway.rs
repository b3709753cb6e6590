//! Dispatch of classification work off the event loop.

use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::debug;
use uuid::Uuid;

use crate::classify::{ClassificationRequest, SuspicionClassifier};
use crate::domain::TrackSnapshot;
use crate::engine::EngineEvent;

/// Bridges track updates to the classifier without blocking the engine.
///
/// Each dispatch spawns the classifier call and posts the outcome back into
/// the engine queue tagged with the track's generation, so the engine can
/// tell a live verdict from one that outlived its track.
pub(crate) struct ClassificationGateway {
    classifier: Arc<dyn SuspicionClassifier>,
    tx: mpsc::UnboundedSender<EngineEvent>,
}

impl ClassificationGateway {
    pub(crate) fn new(
        classifier: Arc<dyn SuspicionClassifier>,
        tx: mpsc::UnboundedSender<EngineEvent>,
    ) -> Self {
        Self { classifier, tx }
    }

    /// Spawns a classification for the snapshot.
    pub(crate) fn dispatch(&self, snapshot: &TrackSnapshot, generation: u64) {
        let request = ClassificationRequest::from_snapshot(snapshot);
        let request_id = Uuid::new_v4();
        let classifier = Arc::clone(&self.classifier);
        let tx = self.tx.clone();
        let key = snapshot.key.clone();

        debug!(
            %request_id,
            key = %key,
            classifier = classifier.name(),
            "dispatching classification"
        );

        tokio::spawn(async move {
            let outcome = classifier.classify(&request).await;
            // A closed receiver means the engine already stopped.
            let _ = tx.send(EngineEvent::VerdictReady {
                key,
                generation,
                request_id,
                outcome,
            });
        });
    }
}
