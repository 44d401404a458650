//! In-process feed built on tokio channels.
//!
//! Each named unit owns a bounded mpsc queue and a consumer task that hands
//! messages to a [`MovementHandler`]. Unit state is published over a `watch`
//! channel so pause and resume take effect between messages:
//!
//! ```text
//! FeedPublisher ──mpsc──▶ consumer task ──▶ MovementHandler
//!                              ▲
//!                   watch<UnitState>
//!                              │
//!                  ChannelFeed::pause / resume / stop
//! ```
//!
//! While a unit is paused its queue fills up to capacity and publishers then
//! wait; nothing is dropped.

use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::domain::RawMovement;
use crate::error::IngestionError;
use crate::port::inbound::handler::MovementHandler;
use crate::port::outbound::feed::FeedControl;

/// Lifecycle of one consumption unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnitState {
    /// Registered, consumer task not started yet.
    Idle,
    Running,
    Paused,
    /// Terminal; the consumer task has exited or is exiting.
    Stopped,
}

struct Unit {
    id: String,
    state: watch::Sender<UnitState>,
    /// Dropped on drain so the consumer sees the end of the queue.
    sender: Mutex<Option<mpsc::Sender<RawMovement>>>,
    /// Taken by the consumer task on start.
    receiver: Mutex<Option<mpsc::Receiver<RawMovement>>>,
    task: Mutex<Option<JoinHandle<()>>>,
}

impl Unit {
    fn state(&self) -> UnitState {
        *self.state.borrow()
    }
}

/// Registry of pausable consumption units.
pub struct ChannelFeed {
    units: Vec<Unit>,
    handler: Arc<dyn MovementHandler>,
}

impl ChannelFeed {
    /// Register one unit per id, each with a queue of `capacity` messages.
    ///
    /// Duplicate ids are registered once.
    pub fn new<I, S>(ids: I, capacity: usize, handler: Arc<dyn MovementHandler>) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut units: Vec<Unit> = Vec::new();
        for id in ids {
            let id = id.into();
            if units.iter().any(|u| u.id == id) {
                continue;
            }
            let (sender, receiver) = mpsc::channel(capacity.max(1));
            let (state, _) = watch::channel(UnitState::Idle);
            units.push(Unit {
                id,
                state,
                sender: Mutex::new(Some(sender)),
                receiver: Mutex::new(Some(receiver)),
                task: Mutex::new(None),
            });
        }
        Self { units, handler }
    }

    fn unit(&self, id: &str) -> Option<&Unit> {
        self.units.iter().find(|u| u.id == id)
    }

    /// Spawn the consumer task of every idle unit.
    pub fn start(&self) {
        for unit in &self.units {
            let Some(receiver) = unit.receiver.lock().take() else {
                continue;
            };
            unit.state.send_replace(UnitState::Running);
            let task = tokio::spawn(consume(
                unit.id.clone(),
                receiver,
                unit.state.subscribe(),
                Arc::clone(&self.handler),
            ));
            *unit.task.lock() = Some(task);
            info!(unit = %unit.id, "Started feed unit");
        }
    }

    /// Current state of a unit.
    #[must_use]
    pub fn state(&self, id: &str) -> Option<UnitState> {
        self.unit(id).map(Unit::state)
    }

    /// Publisher pushing into the named unit's queue, until the feed drains.
    #[must_use]
    pub fn publisher(&self, id: &str) -> Option<FeedPublisher> {
        let unit = self.unit(id)?;
        let sender = unit.sender.lock().clone()?;
        Some(FeedPublisher {
            unit: unit.id.clone(),
            sender,
        })
    }

    /// Stop every unit now; queued messages are not consumed.
    pub async fn shutdown(&self) {
        for unit in &self.units {
            unit.state.send_replace(UnitState::Stopped);
        }
        self.join().await;
        info!(units = self.units.len(), "Feed shut down");
    }

    /// Close every queue and wait until running units have consumed what is
    /// queued. Paused units are stopped without consuming.
    ///
    /// Outstanding [`FeedPublisher`]s must be dropped first.
    pub async fn drain(&self) {
        for unit in &self.units {
            unit.sender.lock().take();
            if unit.state() != UnitState::Running {
                if unit.state() == UnitState::Paused {
                    warn!(unit = %unit.id, "Feed unit paused while draining, stopping it");
                }
                unit.state.send_replace(UnitState::Stopped);
            }
        }
        self.join().await;
        for unit in &self.units {
            unit.state.send_replace(UnitState::Stopped);
        }
        info!(units = self.units.len(), "Feed drained");
    }

    async fn join(&self) {
        for unit in &self.units {
            let task = unit.task.lock().take();
            if let Some(task) = task {
                if let Err(e) = task.await {
                    warn!(unit = %unit.id, error = %e, "Feed unit task ended abnormally");
                }
            }
        }
    }
}

async fn consume(
    id: String,
    mut receiver: mpsc::Receiver<RawMovement>,
    mut state: watch::Receiver<UnitState>,
    handler: Arc<dyn MovementHandler>,
) {
    loop {
        let current = *state.borrow_and_update();
        match current {
            UnitState::Stopped => break,
            UnitState::Idle | UnitState::Paused => {
                if state.changed().await.is_err() {
                    break;
                }
                continue;
            }
            UnitState::Running => {}
        }

        tokio::select! {
            // State changes win over queued messages.
            biased;
            changed = state.changed() => {
                if changed.is_err() {
                    break;
                }
            }
            message = receiver.recv() => match message {
                Some(movement) => handler.handle(&id, movement).await,
                None => break,
            },
        }
    }
    debug!(unit = %id, "Feed unit consumer exited");
}

#[async_trait]
impl FeedControl for ChannelFeed {
    fn unit_ids(&self) -> Vec<String> {
        self.units.iter().map(|u| u.id.clone()).collect()
    }

    fn contains(&self, id: &str) -> bool {
        self.unit(id).is_some()
    }

    fn is_running(&self, id: &str) -> bool {
        matches!(
            self.state(id),
            Some(UnitState::Running | UnitState::Paused)
        )
    }

    fn is_pause_requested(&self, id: &str) -> bool {
        self.state(id) == Some(UnitState::Paused)
    }

    async fn pause(&self, id: &str) -> Result<(), IngestionError> {
        let Some(unit) = self.unit(id) else {
            return Ok(());
        };
        let changed = unit.state.send_if_modified(|state| {
            if *state == UnitState::Running {
                *state = UnitState::Paused;
                true
            } else {
                false
            }
        });
        if changed {
            debug!(unit = id, "Paused feed unit");
        } else {
            debug!(unit = id, state = ?unit.state(), "Feed unit not running, pause ignored");
        }
        Ok(())
    }

    async fn resume(&self, id: &str) -> Result<(), IngestionError> {
        let Some(unit) = self.unit(id) else {
            return Ok(());
        };
        let changed = unit.state.send_if_modified(|state| {
            if *state == UnitState::Paused {
                *state = UnitState::Running;
                true
            } else {
                false
            }
        });
        if changed {
            debug!(unit = id, "Resumed feed unit");
        } else if unit.state() == UnitState::Stopped {
            warn!(unit = id, "Feed unit is stopped and cannot be resumed");
        }
        Ok(())
    }

    async fn stop(&self, id: &str) -> Result<(), IngestionError> {
        let Some(unit) = self.unit(id) else {
            return Ok(());
        };
        unit.state.send_replace(UnitState::Stopped);
        // A unit stopped before start never gets a consumer.
        unit.receiver.lock().take();
        debug!(unit = id, "Stopped feed unit");
        Ok(())
    }

    fn feed_name(&self) -> &'static str {
        "channel"
    }
}

/// Pushes movements into one feed unit.
#[derive(Clone)]
pub struct FeedPublisher {
    unit: String,
    sender: mpsc::Sender<RawMovement>,
}

impl FeedPublisher {
    #[must_use]
    pub fn unit(&self) -> &str {
        &self.unit
    }

    /// Queue a movement, waiting while the unit's queue is full.
    ///
    /// # Errors
    ///
    /// Returns [`IngestionError::Registry`] when the unit's consumer is gone.
    pub async fn publish(&self, movement: RawMovement) -> Result<(), IngestionError> {
        self.sender
            .send(movement)
            .await
            .map_err(|_| IngestionError::Registry(format!("feed unit '{}' is closed", self.unit)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testkit::domain::normal_movement;
    use std::time::Duration;

    #[derive(Default)]
    struct Recorder {
        seen: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl MovementHandler for Recorder {
        async fn handle(&self, unit: &str, _movement: RawMovement) {
            self.seen.lock().push(unit.to_string());
        }
    }

    impl Recorder {
        fn count(&self) -> usize {
            self.seen.lock().len()
        }

        async fn wait_for(&self, n: usize) {
            for _ in 0..200 {
                if self.count() >= n {
                    return;
                }
                tokio::time::sleep(Duration::from_millis(5)).await;
            }
        }
    }

    fn feed(ids: &[&str]) -> (ChannelFeed, Arc<Recorder>) {
        let recorder = Arc::new(Recorder::default());
        let feed = ChannelFeed::new(ids.iter().copied(), 8, recorder.clone());
        (feed, recorder)
    }

    // -------------------------------------------------------------------------
    // Lifecycle
    // -------------------------------------------------------------------------

    #[tokio::test]
    async fn units_run_after_start() {
        let (feed, _) = feed(&["a", "b", "a"]);
        assert_eq!(feed.unit_ids(), vec!["a".to_string(), "b".to_string()]);
        assert!(!feed.is_running("a"));

        feed.start();

        assert!(feed.is_running("a"));
        assert!(feed.is_running("b"));
        assert!(!feed.contains("c"));
        feed.shutdown().await;
    }

    #[tokio::test]
    async fn running_unit_delivers_messages() {
        let (feed, recorder) = feed(&["events"]);
        feed.start();
        let publisher = feed.publisher("events").unwrap();

        publisher.publish(normal_movement()).await.unwrap();
        publisher.publish(normal_movement()).await.unwrap();
        recorder.wait_for(2).await;

        assert_eq!(*recorder.seen.lock(), vec!["events", "events"]);
        feed.shutdown().await;
    }

    // -------------------------------------------------------------------------
    // Pause and resume
    // -------------------------------------------------------------------------

    #[tokio::test]
    async fn paused_unit_buffers_until_resumed() {
        let (feed, recorder) = feed(&["events"]);
        feed.start();
        let publisher = feed.publisher("events").unwrap();

        feed.pause("events").await.unwrap();
        assert!(feed.is_pause_requested("events"));
        assert!(feed.is_running("events"));

        publisher.publish(normal_movement()).await.unwrap();
        tokio::time::sleep(Duration::from_millis(30)).await;
        assert_eq!(recorder.count(), 0);

        feed.resume("events").await.unwrap();
        recorder.wait_for(1).await;
        assert_eq!(recorder.count(), 1);
        assert_eq!(feed.state("events"), Some(UnitState::Running));
        feed.shutdown().await;
    }

    #[tokio::test]
    async fn pause_and_resume_are_idempotent() {
        let (feed, _) = feed(&["events"]);
        feed.start();

        feed.pause("events").await.unwrap();
        feed.pause("events").await.unwrap();
        assert_eq!(feed.state("events"), Some(UnitState::Paused));

        feed.resume("events").await.unwrap();
        feed.resume("events").await.unwrap();
        assert_eq!(feed.state("events"), Some(UnitState::Running));

        assert!(feed.pause("missing").await.is_ok());
        feed.shutdown().await;
    }

    // -------------------------------------------------------------------------
    // Stop
    // -------------------------------------------------------------------------

    #[tokio::test]
    async fn stopped_unit_cannot_resume() {
        let (feed, _) = feed(&["events"]);
        feed.start();

        feed.stop("events").await.unwrap();
        feed.resume("events").await.unwrap();

        assert_eq!(feed.state("events"), Some(UnitState::Stopped));
        assert!(!feed.is_running("events"));
        feed.shutdown().await;
    }

    #[tokio::test]
    async fn drain_consumes_queued_messages() {
        let (feed, recorder) = feed(&["events"]);
        feed.start();
        let publisher = feed.publisher("events").unwrap();
        for _ in 0..5 {
            publisher.publish(normal_movement()).await.unwrap();
        }
        drop(publisher);

        feed.drain().await;

        assert_eq!(recorder.count(), 5);
        assert_eq!(feed.state("events"), Some(UnitState::Stopped));
        assert!(feed.publisher("events").is_none());
    }

    #[tokio::test]
    async fn unit_stopped_before_start_never_starts() {
        let (feed, _) = feed(&["events"]);
        feed.stop("events").await.unwrap();

        feed.start();

        assert_eq!(feed.state("events"), Some(UnitState::Stopped));
    }
}
