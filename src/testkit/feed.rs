//! In-memory [`FeedControl`] for testing ingestion control and cutover.
//!
//! [`ScriptedFeed`] keeps per-unit running/paused flags, records every
//! control call in order, and fails selected operations on demand.

use std::collections::{HashMap, HashSet};

use async_trait::async_trait;
use parking_lot::Mutex;

use crate::error::IngestionError;
use crate::port::outbound::feed::FeedControl;

/// A control call observed by [`ScriptedFeed`], successful or not.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FeedCall {
    Pause(String),
    Resume(String),
    Stop(String),
}

#[derive(Debug, Clone, Copy)]
struct UnitState {
    running: bool,
    paused: bool,
}

#[derive(Debug, Default)]
struct Inner {
    states: HashMap<String, UnitState>,
    calls: Vec<FeedCall>,
    fail_pause: HashSet<String>,
    fail_resume: HashSet<String>,
}

/// Scripted feed with units that start running and unpaused.
#[derive(Debug)]
pub struct ScriptedFeed {
    ids: Vec<String>,
    inner: Mutex<Inner>,
}

impl ScriptedFeed {
    pub fn new<I, S>(ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let ids: Vec<String> = ids.into_iter().map(Into::into).collect();
        let states = ids
            .iter()
            .map(|id| {
                (
                    id.clone(),
                    UnitState {
                        running: true,
                        paused: false,
                    },
                )
            })
            .collect();
        Self {
            ids,
            inner: Mutex::new(Inner {
                states,
                ..Inner::default()
            }),
        }
    }

    pub fn set_running(&self, id: &str, running: bool) {
        if let Some(state) = self.inner.lock().states.get_mut(id) {
            state.running = running;
        }
    }

    /// Make every pause of `id` fail.
    pub fn fail_pause(&self, id: &str) {
        self.inner.lock().fail_pause.insert(id.to_string());
    }

    /// Make every resume of `id` fail.
    pub fn fail_resume(&self, id: &str) {
        self.inner.lock().fail_resume.insert(id.to_string());
    }

    pub fn calls(&self) -> Vec<FeedCall> {
        self.inner.lock().calls.clone()
    }

    pub fn pause_count(&self) -> usize {
        self.count(|call| matches!(call, FeedCall::Pause(_)))
    }

    pub fn resume_count(&self) -> usize {
        self.count(|call| matches!(call, FeedCall::Resume(_)))
    }

    fn count(&self, predicate: impl Fn(&FeedCall) -> bool) -> usize {
        self.inner.lock().calls.iter().filter(|c| predicate(c)).count()
    }
}

#[async_trait]
impl FeedControl for ScriptedFeed {
    fn unit_ids(&self) -> Vec<String> {
        self.ids.clone()
    }

    fn contains(&self, id: &str) -> bool {
        self.inner.lock().states.contains_key(id)
    }

    fn is_running(&self, id: &str) -> bool {
        self.inner.lock().states.get(id).is_some_and(|s| s.running)
    }

    fn is_pause_requested(&self, id: &str) -> bool {
        self.inner.lock().states.get(id).is_some_and(|s| s.paused)
    }

    async fn pause(&self, id: &str) -> Result<(), IngestionError> {
        let mut inner = self.inner.lock();
        inner.calls.push(FeedCall::Pause(id.to_string()));
        if inner.fail_pause.contains(id) {
            return Err(IngestionError::Pause {
                unit: id.to_string(),
                reason: "scripted failure".into(),
            });
        }
        if let Some(state) = inner.states.get_mut(id) {
            state.paused = true;
        }
        Ok(())
    }

    async fn resume(&self, id: &str) -> Result<(), IngestionError> {
        let mut inner = self.inner.lock();
        inner.calls.push(FeedCall::Resume(id.to_string()));
        if inner.fail_resume.contains(id) {
            return Err(IngestionError::Resume {
                unit: id.to_string(),
                reason: "scripted failure".into(),
            });
        }
        if let Some(state) = inner.states.get_mut(id) {
            state.paused = false;
        }
        Ok(())
    }

    async fn stop(&self, id: &str) -> Result<(), IngestionError> {
        let mut inner = self.inner.lock();
        inner.calls.push(FeedCall::Stop(id.to_string()));
        if let Some(state) = inner.states.get_mut(id) {
            state.running = false;
        }
        Ok(())
    }

    fn feed_name(&self) -> &'static str {
        "scripted"
    }
}
