//! Observation of job lifecycle transitions.
//!
//! The backend owns lifecycle state; this layer only observes it. Producer
//! and consumer report the transitions they witness (acceptance, claim,
//! settlement) onto a broadcast channel the registry exposes.
//!
//! # Guarantees
//!
//! - **At-most-once delivery**: slow subscribers may lag and miss events.
//! - **In-memory only**: observations are not persisted.
//!
//! Observation is for dashboards and tests, never for control flow - the
//! backend's answers are the source of truth.

use chrono::{DateTime, Utc};
use tokio::sync::broadcast;

use crate::job::{JobId, JobState};
use crate::queue::QueueName;

/// Default buffer for lifecycle subscribers.
const DEFAULT_CAPACITY: usize = 1024;

/// One observed lifecycle transition.
#[derive(Debug, Clone)]
pub struct LifecycleEvent {
    /// The job that transitioned.
    pub job_id: JobId,
    /// The queue it belongs to.
    pub queue: QueueName,
    /// The state it was observed entering.
    pub state: JobState,
    /// When the transition was observed (not when the backend applied it).
    pub observed_at: DateTime<Utc>,
}

/// Broadcast tap for lifecycle observations.
#[derive(Debug, Clone)]
pub(crate) struct LifecycleTap {
    sender: broadcast::Sender<LifecycleEvent>,
}

impl LifecycleTap {
    pub(crate) fn new() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }

    pub(crate) fn with_capacity(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Fire-and-forget emit; returns the number of subscribers reached.
    pub(crate) fn emit(&self, job_id: JobId, queue: QueueName, state: JobState) -> usize {
        let event = LifecycleEvent {
            job_id,
            queue,
            state,
            observed_at: Utc::now(),
        };
        self.sender.send(event).unwrap_or(0)
    }

    pub(crate) fn subscribe(&self) -> broadcast::Receiver<LifecycleEvent> {
        self.sender.subscribe()
    }
}
