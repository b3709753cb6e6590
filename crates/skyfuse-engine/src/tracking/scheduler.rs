//! Per-track eviction timers.

use std::collections::HashMap;
use std::time::Duration;

use skyfuse_core::TrackKey;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::engine::EngineEvent;

struct TimerEntry {
    epoch: u64,
    handle: JoinHandle<()>,
}

/// One countdown timer per track key, cancel-and-replace on every reset.
///
/// Aborting the sleep task is not enough on its own: a timer may have fired
/// and queued its deadline event just before a positional update reset it.
/// Every arm therefore gets a fresh epoch, and the engine consumes a
/// deadline event only when its epoch is still the live one for that key.
pub(crate) struct EvictionScheduler {
    deadline: Duration,
    tx: mpsc::UnboundedSender<EngineEvent>,
    entries: HashMap<TrackKey, TimerEntry>,
    next_epoch: u64,
}

impl EvictionScheduler {
    pub(crate) fn new(deadline: Duration, tx: mpsc::UnboundedSender<EngineEvent>) -> Self {
        Self {
            deadline,
            tx,
            entries: HashMap::new(),
            next_epoch: 0,
        }
    }

    /// Arms (or re-arms) the timer for `key`.
    pub(crate) fn schedule(&mut self, key: TrackKey, generation: u64) {
        self.next_epoch += 1;
        let epoch = self.next_epoch;
        if let Some(previous) = self.entries.remove(&key) {
            previous.handle.abort();
        }

        let tx = self.tx.clone();
        let deadline = self.deadline;
        let event_key = key.clone();
        let handle = tokio::spawn(async move {
            tokio::time::sleep(deadline).await;
            // A closed receiver means the engine already stopped.
            let _ = tx.send(EngineEvent::DeadlineElapsed {
                key: event_key,
                generation,
                epoch,
            });
        });

        self.entries.insert(key, TimerEntry { epoch, handle });
    }

    /// Consumes the deadline for `key` if `epoch` is still its live timer.
    ///
    /// Returns `false` for a deadline that was re-armed or cancelled after
    /// the event was queued; such events must be discarded.
    pub(crate) fn expire(&mut self, key: &TrackKey, epoch: u64) -> bool {
        match self.entries.get(key) {
            Some(entry) if entry.epoch == epoch => {
                self.entries.remove(key);
                true
            }
            _ => false,
        }
    }

    /// Disarms every timer.
    pub(crate) fn cancel_all(&mut self) {
        for (_, entry) in self.entries.drain() {
            entry.handle.abort();
        }
    }

    /// Number of armed timers.
    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }
}

impl Drop for EvictionScheduler {
    fn drop(&mut self) {
        self.cancel_all();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::time::advance;

    fn key(raw: &str) -> TrackKey {
        TrackKey::from_identifier(raw).unwrap()
    }

    fn scheduler(
        deadline_ms: u64,
    ) -> (EvictionScheduler, mpsc::UnboundedReceiver<EngineEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (EvictionScheduler::new(Duration::from_millis(deadline_ms), tx), rx)
    }

    async fn drain_pending(rx: &mut mpsc::UnboundedReceiver<EngineEvent>) -> usize {
        // Let any completed sleep tasks run before checking the queue.
        for _ in 0..8 {
            tokio::task::yield_now().await;
        }
        let mut count = 0;
        while rx.try_recv().is_ok() {
            count += 1;
        }
        count
    }

    #[tokio::test(start_paused = true)]
    async fn test_deadline_fires_once() {
        let (mut scheduler, mut rx) = scheduler(2000);
        scheduler.schedule(key("a"), 7);

        let event = rx.recv().await.unwrap();
        let EngineEvent::DeadlineElapsed { key: event_key, generation, epoch } = event else {
            panic!("unexpected event");
        };
        assert_eq!(event_key.as_str(), "A");
        assert_eq!(generation, 7);
        assert!(scheduler.expire(&event_key, epoch));
        assert!(!scheduler.expire(&event_key, epoch));
        assert_eq!(drain_pending(&mut rx).await, 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_rearm_before_deadline_replaces_timer() {
        let (mut scheduler, mut rx) = scheduler(2000);
        scheduler.schedule(key("a"), 1);

        advance(Duration::from_millis(1999)).await;
        scheduler.schedule(key("a"), 1);

        // Past the first deadline: the aborted timer must stay silent.
        advance(Duration::from_millis(1999)).await;
        assert_eq!(drain_pending(&mut rx).await, 0);

        advance(Duration::from_millis(1)).await;
        let event = rx.recv().await.unwrap();
        let EngineEvent::DeadlineElapsed { epoch, .. } = event else {
            panic!("unexpected event");
        };
        assert!(scheduler.expire(&key("a"), epoch));
    }

    #[tokio::test(start_paused = true)]
    async fn test_stale_epoch_is_rejected() {
        let (mut scheduler, mut rx) = scheduler(10);
        scheduler.schedule(key("a"), 1);

        // First deadline fires and queues its event...
        let event = rx.recv().await.unwrap();
        let EngineEvent::DeadlineElapsed { epoch: stale, .. } = event else {
            panic!("unexpected event");
        };
        // ...but a re-arm lands before the event is consumed.
        scheduler.schedule(key("a"), 1);

        assert!(!scheduler.expire(&key("a"), stale));
        assert_eq!(scheduler.len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_all_silences_timers() {
        let (mut scheduler, mut rx) = scheduler(2000);
        scheduler.schedule(key("a"), 1);
        scheduler.schedule(key("b"), 2);
        assert_eq!(scheduler.len(), 2);

        scheduler.cancel_all();
        assert_eq!(scheduler.len(), 0);

        advance(Duration::from_millis(3000)).await;
        assert_eq!(drain_pending(&mut rx).await, 0);
    }
}
