//! Testing utilities: spy and fault-injection backends.
//!
//! Only available with the `testing` feature (and inside this crate's own
//! tests):
//!
//! ```toml
//! [dev-dependencies]
//! switchboard = { version = "0.1", features = ["testing"] }
//! ```
//!
//! [`RecordingBackend`] records submissions without delivering anything -
//! use it to assert what producers sent (or that validation kept them from
//! sending at all). [`UnavailableBackend`] fails every call - use it to
//! exercise transient-fault propagation. For end-to-end consumer tests, use
//! the real [`InMemoryBackend`].

use std::sync::Mutex;

use serde_json::Value;

use crate::backend::{BackendError, QueueBackend};
use crate::job::{ClaimedJob, FailureReason, JobId, JobState};
use crate::queue::QueueName;

pub use crate::memory::{BackendOptions, DeadLetter, InMemoryBackend};

/// One recorded submission.
#[derive(Debug, Clone)]
pub struct RecordedSubmission {
    /// The synthetic id the spy returned.
    pub id: JobId,
    /// The target queue.
    pub queue: QueueName,
    /// The submitted payload.
    pub payload: Value,
}

/// Spy backend that records submissions and never delivers jobs.
///
/// # Example
///
/// ```ignore
/// let backend = Arc::new(RecordingBackend::new());
/// let producer = Producer::new(registry_over(backend.clone()));
///
/// let result = producer.enqueue_raw("sendReactionNotificationQueue", bad_payload).await;
///
/// assert!(result.is_err());
/// backend.assert_no_submissions();
/// ```
#[derive(Debug, Default)]
pub struct RecordingBackend {
    submissions: Mutex<Vec<RecordedSubmission>>,
}

impl RecordingBackend {
    /// Create an empty spy.
    pub fn new() -> Self {
        Self::default()
    }

    /// Everything submitted so far, in order.
    pub fn submissions(&self) -> Vec<RecordedSubmission> {
        self.submissions.lock().unwrap().clone()
    }

    /// Submissions targeting one queue, in order.
    pub fn submissions_to(&self, queue: QueueName) -> Vec<RecordedSubmission> {
        self.submissions
            .lock()
            .unwrap()
            .iter()
            .filter(|s| s.queue == queue)
            .cloned()
            .collect()
    }

    /// Total number of submissions.
    pub fn submission_count(&self) -> usize {
        self.submissions.lock().unwrap().len()
    }

    /// Assert nothing reached the backend.
    ///
    /// # Panics
    ///
    /// Panics when any submission was recorded.
    pub fn assert_no_submissions(&self) {
        let submissions = self.submissions.lock().unwrap();
        assert!(
            submissions.is_empty(),
            "expected zero backend calls, got {}: {:?}",
            submissions.len(),
            submissions.iter().map(|s| s.queue).collect::<Vec<_>>()
        );
    }

    /// Assert exactly `expected` submissions reached `queue`.
    ///
    /// # Panics
    ///
    /// Panics on a count mismatch.
    pub fn assert_submission_count(&self, queue: QueueName, expected: usize) {
        let actual = self.submissions_to(queue).len();
        assert_eq!(
            actual, expected,
            "expected {expected} submissions to {queue}, got {actual}"
        );
    }

    /// Drop all recorded submissions.
    pub fn clear(&self) {
        self.submissions.lock().unwrap().clear();
    }
}

#[async_trait::async_trait]
impl QueueBackend for RecordingBackend {
    async fn submit(&self, queue: QueueName, data: Value) -> Result<JobId, BackendError> {
        let id = JobId::new();
        self.submissions.lock().unwrap().push(RecordedSubmission {
            id: id.clone(),
            queue,
            payload: data,
        });
        Ok(id)
    }

    async fn claim(&self, _queue: QueueName) -> Result<Option<ClaimedJob>, BackendError> {
        Ok(None)
    }

    async fn ack(&self, _queue: QueueName, id: &JobId) -> Result<(), BackendError> {
        Err(BackendError::UnknownJob { id: id.clone() })
    }

    async fn nack(
        &self,
        _queue: QueueName,
        id: &JobId,
        _reason: &FailureReason,
    ) -> Result<JobState, BackendError> {
        Err(BackendError::UnknownJob { id: id.clone() })
    }
}

/// Backend that fails every call with a transient fault.
#[derive(Debug, Default, Clone, Copy)]
pub struct UnavailableBackend;

#[async_trait::async_trait]
impl QueueBackend for UnavailableBackend {
    async fn submit(&self, _queue: QueueName, _data: Value) -> Result<JobId, BackendError> {
        Err(BackendError::Unavailable {
            message: "injected outage".into(),
        })
    }

    async fn claim(&self, _queue: QueueName) -> Result<Option<ClaimedJob>, BackendError> {
        Err(BackendError::Unavailable {
            message: "injected outage".into(),
        })
    }

    async fn ack(&self, _queue: QueueName, _id: &JobId) -> Result<(), BackendError> {
        Err(BackendError::Unavailable {
            message: "injected outage".into(),
        })
    }

    async fn nack(
        &self,
        _queue: QueueName,
        _id: &JobId,
        _reason: &FailureReason,
    ) -> Result<JobState, BackendError> {
        Err(BackendError::Unavailable {
            message: "injected outage".into(),
        })
    }
}
