//! The fusion engine: one event queue, one task, all state.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;
use tokio::sync::{broadcast, mpsc};
use tracing::{debug, info, warn};
use uuid::Uuid;

use skyfuse_core::{IffStatus, TrackKey};

use crate::audit::{AuditRecord, AuditSink};
use crate::classify::{
    ClassificationGateway, ClassifierVerdict, RuleClassifier, SuspicionClassifier, SuspiciousSet,
};
use crate::config::EngineConfig;
use crate::correlation::{CorrelationResolver, IdentityStore, LockTable, OverrideStore, Resolution};
use crate::domain::{
    IffObservation, RadarObservation, RemovalReason, SuspiciousEntry, TrackEvent, TrackSnapshot,
    UNKNOWN_CALLSIGN,
};
use crate::error::{EngineError, Result};
use crate::feed::{FeedKind, StreamParams};
use crate::tracking::{EvictionScheduler, TrackStore};

/// Everything the engine task drains from its queue.
///
/// Feed observations, stream lifecycle signals and operator commands arrive
/// through the handle; deadline and verdict events are posted back by the
/// scheduler and the classification gateway.
#[derive(Debug)]
pub(crate) enum EngineEvent {
    Radar(RadarObservation),
    Iff(IffObservation),
    StreamStarted {
        feed: FeedKind,
        params: StreamParams,
    },
    StreamEnded {
        feed: FeedKind,
    },
    StreamFailed {
        feed: FeedKind,
        message: String,
    },
    SetOverride {
        key: TrackKey,
        status: IffStatus,
        callsign: Option<String>,
    },
    ResetOverride {
        key: TrackKey,
    },
    DeadlineElapsed {
        key: TrackKey,
        generation: u64,
        epoch: u64,
    },
    VerdictReady {
        key: TrackKey,
        generation: u64,
        request_id: Uuid,
        outcome: Result<ClassifierVerdict>,
    },
    Shutdown,
}

/// State shared between the engine task and its handles.
///
/// The mirrors are written by the engine before the matching broadcast is
/// sent, so a consumer that just received an event reads a mirror at least
/// as fresh as that event.
#[derive(Debug)]
struct EngineShared {
    events: broadcast::Sender<TrackEvent>,
    tracks: RwLock<HashMap<TrackKey, TrackSnapshot>>,
    suspicious: RwLock<Vec<SuspiciousEntry>>,
}

/// Cheap-to-clone front door to a running engine.
///
/// All mutating methods post an event into the engine queue and return
/// immediately; queries read the engine's shared mirrors.
#[derive(Debug, Clone)]
pub struct EngineHandle {
    tx: mpsc::UnboundedSender<EngineEvent>,
    shared: Arc<EngineShared>,
}

impl EngineHandle {
    /// Feeds one positional observation.
    pub fn radar_observation(&self, observation: RadarObservation) -> Result<()> {
        self.send(EngineEvent::Radar(observation))
    }

    /// Feeds one identity report.
    pub fn iff_observation(&self, observation: IffObservation) -> Result<()> {
        self.send(EngineEvent::Iff(observation))
    }

    /// Announces a (re)started stream. Idempotent; new parameters supersede
    /// the previous ones for that feed without clearing accumulated state.
    pub fn stream_started(&self, feed: FeedKind, params: StreamParams) -> Result<()> {
        self.send(EngineEvent::StreamStarted { feed, params })
    }

    /// Announces orderly stream termination.
    pub fn stream_ended(&self, feed: FeedKind) -> Result<()> {
        self.send(EngineEvent::StreamEnded { feed })
    }

    /// Announces stream failure.
    pub fn stream_error(&self, feed: FeedKind, message: impl Into<String>) -> Result<()> {
        self.send(EngineEvent::StreamFailed {
            feed,
            message: message.into(),
        })
    }

    /// Pins status (and optionally callsign) for a track until reset.
    ///
    /// A `None` callsign pins status only: the track's callsign keeps
    /// following correlation. The override outlives eviction — it re-applies
    /// if the key is re-created — and is only dropped by
    /// [`reset_status`](Self::reset_status).
    pub fn set_override(
        &self,
        key: TrackKey,
        status: IffStatus,
        callsign: Option<String>,
    ) -> Result<()> {
        self.send(EngineEvent::SetOverride {
            key,
            status,
            callsign,
        })
    }

    /// Operator shorthand: pins status FOE with callsign `FOE`.
    pub fn mark_foe(&self, key: TrackKey) -> Result<()> {
        self.set_override(key, IffStatus::Foe, Some(IffStatus::Foe.as_str().to_string()))
    }

    /// Drops the override for a track, returning it to whatever correlation
    /// currently computes.
    pub fn reset_status(&self, key: TrackKey) -> Result<()> {
        self.send(EngineEvent::ResetOverride { key })
    }

    /// Asks the engine task to stop after the events already queued.
    pub fn shutdown(&self) -> Result<()> {
        self.send(EngineEvent::Shutdown)
    }

    /// Subscribes to track change events.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<TrackEvent> {
        self.shared.events.subscribe()
    }

    /// Snapshot of every live track, sorted by key.
    #[must_use]
    pub fn tracks(&self) -> Vec<TrackSnapshot> {
        let mut tracks: Vec<TrackSnapshot> = self.shared.tracks.read().values().cloned().collect();
        tracks.sort_by(|a, b| a.key.cmp(&b.key));
        tracks
    }

    /// Snapshot of one track, if it is live.
    #[must_use]
    pub fn track(&self, key: &TrackKey) -> Option<TrackSnapshot> {
        self.shared.tracks.read().get(key).cloned()
    }

    /// The current suspicious list, probability descending.
    #[must_use]
    pub fn suspicious(&self) -> Vec<SuspiciousEntry> {
        self.shared.suspicious.read().clone()
    }

    fn send(&self, event: EngineEvent) -> Result<()> {
        self.tx
            .send(event)
            .map_err(|_| EngineError::channel_closed("engine event queue"))
    }
}

/// Fuses the positional and identity feeds into live tracks.
///
/// All state is owned by the engine task; handlers run to completion, one
/// event at a time, so no two mutations for the same track ever interleave.
/// The only concurrent work is classification, which re-enters through the
/// queue as a [`EngineEvent::VerdictReady`].
pub struct FusionEngine {
    config: EngineConfig,
    rx: mpsc::UnboundedReceiver<EngineEvent>,
    tx: mpsc::UnboundedSender<EngineEvent>,
    tracks: TrackStore,
    identities: IdentityStore,
    locks: LockTable,
    overrides: OverrideStore,
    resolver: CorrelationResolver,
    scheduler: EvictionScheduler,
    gateway: ClassificationGateway,
    suspicious: SuspiciousSet,
    audit: Option<Arc<dyn AuditSink>>,
    radar_params: Option<StreamParams>,
    iff_params: Option<StreamParams>,
    shared: Arc<EngineShared>,
}

impl FusionEngine {
    /// Creates an engine with the built-in rule classifier and no audit
    /// sink.
    #[must_use]
    pub fn new(config: EngineConfig) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        let (events, _) = broadcast::channel(config.broadcast_capacity);
        let shared = Arc::new(EngineShared {
            events,
            tracks: RwLock::new(HashMap::new()),
            suspicious: RwLock::new(Vec::new()),
        });

        let scheduler = EvictionScheduler::new(config.eviction_deadline, tx.clone());
        let gateway = ClassificationGateway::new(Arc::new(RuleClassifier::new()), tx.clone());
        let resolver =
            CorrelationResolver::new(config.lock_tolerance_km, config.identity_tolerance_km);

        Self {
            config,
            rx,
            tx,
            tracks: TrackStore::new(),
            identities: IdentityStore::new(),
            locks: LockTable::new(),
            overrides: OverrideStore::new(),
            resolver,
            scheduler,
            gateway,
            suspicious: SuspiciousSet::new(),
            audit: None,
            radar_params: None,
            iff_params: None,
            shared,
        }
    }

    /// Replaces the classifier.
    #[must_use]
    pub fn with_classifier(mut self, classifier: Arc<dyn SuspicionClassifier>) -> Self {
        self.gateway = ClassificationGateway::new(classifier, self.tx.clone());
        self
    }

    /// Attaches an audit sink; without one, no trail is written.
    #[must_use]
    pub fn with_audit_sink(mut self, sink: Arc<dyn AuditSink>) -> Self {
        self.audit = Some(sink);
        self
    }

    /// Creates a handle for feeding events and querying state.
    #[must_use]
    pub fn handle(&self) -> EngineHandle {
        EngineHandle {
            tx: self.tx.clone(),
            shared: Arc::clone(&self.shared),
        }
    }

    /// Subscribes to track change events.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<TrackEvent> {
        self.shared.events.subscribe()
    }

    /// Drains the queue until shutdown.
    pub async fn run(mut self) {
        info!(
            eviction_ms = self.config.eviction_deadline.as_millis() as u64,
            lock_km = self.config.lock_tolerance_km,
            identity_km = self.config.identity_tolerance_km,
            "fusion engine started"
        );

        while let Some(event) = self.rx.recv().await {
            match event {
                EngineEvent::Shutdown => {
                    info!("fusion engine shutting down");
                    break;
                }
                event => self.handle_event(event),
            }
        }

        self.scheduler.cancel_all();
        info!("fusion engine stopped");
    }

    fn handle_event(&mut self, event: EngineEvent) {
        match event {
            EngineEvent::Radar(observation) => self.on_radar(observation),
            EngineEvent::Iff(observation) => self.on_iff(observation),
            EngineEvent::StreamStarted { feed, params } => self.on_stream_started(feed, params),
            EngineEvent::StreamEnded { feed } => self.on_stream_reset(feed, None),
            EngineEvent::StreamFailed { feed, message } => {
                self.on_stream_reset(feed, Some(message));
            }
            EngineEvent::SetOverride {
                key,
                status,
                callsign,
            } => self.on_set_override(key, status, callsign),
            EngineEvent::ResetOverride { key } => self.on_reset_override(key),
            EngineEvent::DeadlineElapsed {
                key,
                generation,
                epoch,
            } => self.on_deadline(key, generation, epoch),
            EngineEvent::VerdictReady {
                key,
                generation,
                request_id,
                outcome,
            } => self.on_verdict(key, generation, request_id, outcome),
            EngineEvent::Shutdown => {}
        }
    }

    fn on_radar(&mut self, observation: RadarObservation) {
        if !observation.has_finite_position() {
            warn!(
                identifier = ?observation.identifier,
                "dropping positional observation with non-finite coordinates"
            );
            return;
        }
        if let Some(params) = &self.radar_params {
            if !params.admits(
                observation.identifier.as_deref(),
                observation.latitude,
                observation.longitude,
            ) {
                debug!(
                    identifier = ?observation.identifier,
                    "positional observation outside stream parameters"
                );
                return;
            }
        }

        let Resolution {
            key,
            status,
            callsign,
            source,
        } = self
            .resolver
            .resolve(&observation, &self.identities, &mut self.locks);

        let (status, callsign) = match self.overrides.get(&key) {
            Some(o) => (o.status, o.callsign.clone().unwrap_or(callsign)),
            None => (status, callsign),
        };

        let (snapshot, created) = self
            .tracks
            .upsert(key.clone(), &observation, status, callsign);
        self.scheduler.schedule(key.clone(), snapshot.generation);

        debug!(key = %key, source = %source, created, "positional observation fused");

        self.publish_update(&snapshot);
        if let Some(sink) = &self.audit {
            if let Err(error) = sink.record(&AuditRecord::from_snapshot(&snapshot)) {
                warn!(key = %key, %error, "audit write failed");
            }
        }
        self.gateway.dispatch(&snapshot, snapshot.generation);
    }

    fn on_iff(&mut self, observation: IffObservation) {
        if let Some(params) = &self.iff_params {
            if !params.admits_identity(observation.identifier.as_deref(), observation.position()) {
                debug!(
                    identifier = ?observation.identifier,
                    "identity report outside stream parameters"
                );
                return;
            }
        }

        if let Some(key) = self.identities.upsert(observation) {
            debug!(key = %key, "identity report stored");
        }
    }

    fn on_stream_started(&mut self, feed: FeedKind, params: StreamParams) {
        info!(%feed, filter = ?params.filter, "stream started");
        match feed {
            FeedKind::Radar => self.radar_params = Some(params),
            FeedKind::Iff => self.iff_params = Some(params),
        }
    }

    fn on_stream_reset(&mut self, feed: FeedKind, error: Option<String>) {
        match &error {
            Some(message) => warn!(%feed, message = message.as_str(), "stream failed"),
            None => info!(%feed, "stream ended"),
        }

        match feed {
            FeedKind::Iff => {
                let dropped = self.identities.len();
                self.identities.clear();
                debug!(dropped, "identity store cleared");
            }
            FeedKind::Radar => {
                let timers = self.scheduler.len();
                let keys = self.tracks.clear();
                self.scheduler.cancel_all();
                self.locks.clear();
                let suspicious_changed = self.suspicious.clear();
                debug!(removed = keys.len(), timers, "positional state cleared");

                self.shared.tracks.write().clear();
                if !keys.is_empty() {
                    let _ = self
                        .shared
                        .events
                        .send(TrackEvent::removed(keys, RemovalReason::StreamReset));
                }
                if suspicious_changed {
                    self.publish_suspicious();
                }
            }
        }
    }

    fn on_set_override(&mut self, key: TrackKey, status: IffStatus, callsign: Option<String>) {
        info!(key = %key, %status, "override set");
        self.overrides.set(key.clone(), status, callsign.clone());

        // Apply to the live track immediately, not on the next update.
        if let Some(snapshot) = self.tracks.set_identity(&key, status, callsign) {
            self.publish_update(&snapshot);
        }
    }

    fn on_reset_override(&mut self, key: TrackKey) {
        if self.overrides.remove(&key).is_none() {
            debug!(key = %key, "no override to reset");
            return;
        }
        info!(key = %key, "override reset");

        if self.tracks.contains(&key) {
            let (status, callsign) = self.recompute_identity(&key);
            if let Some(snapshot) = self.tracks.set_identity(&key, status, Some(callsign)) {
                self.publish_update(&snapshot);
            }
        }
    }

    /// What correlation would currently say about `key`, with no override
    /// in the way.
    fn recompute_identity(&self, key: &TrackKey) -> (IffStatus, String) {
        if let Some(record) = self.identities.lookup(key) {
            let callsign = record
                .callsign
                .clone()
                .unwrap_or_else(|| UNKNOWN_CALLSIGN.to_string());
            return (record.status, callsign);
        }
        if let Some(lock) = self.locks.get(key) {
            let callsign = lock
                .callsign
                .clone()
                .unwrap_or_else(|| UNKNOWN_CALLSIGN.to_string());
            return (lock.status, callsign);
        }
        (IffStatus::Unknown, UNKNOWN_CALLSIGN.to_string())
    }

    fn on_deadline(&mut self, key: TrackKey, generation: u64, epoch: u64) {
        if !self.scheduler.expire(&key, epoch) {
            debug!(key = %key, "stale eviction deadline discarded");
            return;
        }

        match self.tracks.remove_if_generation(&key, generation) {
            Some(_) => {
                info!(key = %key, "track evicted after inactivity");
                self.locks.remove(&key);
                let suspicious_changed = self.suspicious.remove(&key);

                self.shared.tracks.write().remove(&key);
                let _ = self
                    .shared
                    .events
                    .send(TrackEvent::removed(vec![key], RemovalReason::DeadlineElapsed));
                if suspicious_changed {
                    self.publish_suspicious();
                }
            }
            None => debug!(key = %key, "deadline for departed track discarded"),
        }
    }

    fn on_verdict(
        &mut self,
        key: TrackKey,
        generation: u64,
        request_id: Uuid,
        outcome: Result<ClassifierVerdict>,
    ) {
        let verdict = match outcome {
            Ok(verdict) => verdict,
            Err(error) => {
                warn!(%request_id, key = %key, %error, "classification failed");
                return;
            }
        };
        let classification = match verdict.into_classification() {
            Ok(classification) => classification,
            Err(error) => {
                warn!(%request_id, key = %key, %error, "classifier returned an invalid verdict");
                return;
            }
        };

        match self.tracks.apply_classification(&key, generation, classification) {
            Some(snapshot) => {
                debug!(
                    %request_id,
                    key = %key,
                    probability = %classification.probability,
                    "classification merged"
                );
                self.publish_update(&snapshot);
                if self.suspicious.apply(&snapshot, classification.probability) {
                    self.publish_suspicious();
                }
            }
            None => {
                debug!(%request_id, key = %key, "verdict for stale or departed track discarded");
            }
        }
    }

    fn publish_update(&self, snapshot: &TrackSnapshot) {
        self.shared
            .tracks
            .write()
            .insert(snapshot.key.clone(), snapshot.clone());
        // No subscribers is fine.
        let _ = self.shared.events.send(TrackEvent::updated(snapshot.clone()));
    }

    fn publish_suspicious(&self) {
        let list = self.suspicious.to_list();
        *self.shared.suspicious.write() = list.clone();
        let _ = self.shared.events.send(TrackEvent::suspicious_list(list));
    }
}
