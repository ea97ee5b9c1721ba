//! Job identity, lifecycle states, and handler outcomes.
//!
//! A job id is assigned by the backend at submission time, is unique per
//! queue, and is never reused; it is the sole handle for tracking a job's
//! lifecycle. Payload data is immutable once submitted.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::payload::JobPayload;
use crate::queue::QueueName;

/// Opaque, backend-assigned job identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct JobId(String);

impl JobId {
    /// Mint a fresh id. Called by backends at submission time, never by
    /// producers or consumers.
    pub fn new() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }

    /// The id as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for JobId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for JobId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for JobId {
    fn from(raw: String) -> Self {
        Self(raw)
    }
}

impl AsRef<str> for JobId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// A decoded job delivered to a handler.
#[derive(Debug, Clone)]
pub struct Job<P> {
    /// Backend-assigned identifier.
    pub id: JobId,
    /// The queue this job was claimed from.
    pub queue: QueueName,
    /// The typed payload. Immutable once submitted.
    pub data: P,
    /// When the backend accepted the submission.
    pub created_at: DateTime<Utc>,
    /// 1-based delivery attempt. Greater than 1 means this is a retry and
    /// the handler may have run (fully or partially) before.
    pub attempt: u32,
}

impl<P: JobPayload> Job<P> {
    /// True when this delivery is a retry of an earlier attempt.
    pub fn is_retry(&self) -> bool {
        self.attempt > 1
    }
}

/// A claimed but not yet decoded job, as handed over by the backend.
#[derive(Debug, Clone)]
pub struct ClaimedJob {
    /// Backend-assigned identifier.
    pub id: JobId,
    /// The queue this job was claimed from.
    pub queue: QueueName,
    /// The serialized payload.
    pub payload: Value,
    /// 1-based delivery attempt.
    pub attempt: u32,
    /// When the backend accepted the submission.
    pub created_at: DateTime<Utc>,
}

/// Acknowledgment that the backend durably accepted a submission.
///
/// Returned once the enqueue call resumes; holding it says nothing about
/// processing, which happens later and possibly more than once.
#[derive(Debug, Clone)]
pub struct JobHandle {
    /// Backend-assigned identifier of the new job.
    pub id: JobId,
    /// The queue the job was submitted to.
    pub queue: QueueName,
    /// When the acknowledgment arrived.
    pub accepted_at: DateTime<Utc>,
}

/// Lifecycle state of a job, owned by the backend and only observed here.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobState {
    /// Durably accepted, waiting to be claimed.
    Waiting,
    /// Claimed by a worker; a handler invocation is in flight.
    Active,
    /// Handler signaled success. Terminal.
    Completed,
    /// Handler signaled failure on the given attempt.
    Failed {
        /// The attempt that failed (1-based).
        attempt: u32,
    },
    /// Requeued after a retryable failure; will become `Active` again.
    Retrying,
    /// Retry budget exhausted or failure not retryable. Terminal; surfaced
    /// through the backend's dead-letter inspection, never silently dropped.
    Dead,
}

impl JobState {
    /// Stable lowercase label, for logs and metrics.
    pub fn as_str(&self) -> &'static str {
        match self {
            JobState::Waiting => "waiting",
            JobState::Active => "active",
            JobState::Completed => "completed",
            JobState::Failed { .. } => "failed",
            JobState::Retrying => "retrying",
            JobState::Dead => "dead",
        }
    }

    /// Terminal states see no further transitions or handler invocations.
    pub fn is_terminal(&self) -> bool {
        matches!(self, JobState::Completed | JobState::Dead)
    }
}

impl fmt::Display for JobState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What a handler signals after processing one delivery.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// The job's business effect is done; the delivery is acknowledged and
    /// the job will not be delivered again.
    Success,
    /// Processing did not complete; the backend decides between requeue and
    /// dead-letter based on the reason and its attempt budget.
    Failure(FailureReason),
}

impl Outcome {
    /// Shorthand for a handler-level failure with a message.
    pub fn failure(message: impl Into<String>) -> Self {
        Outcome::Failure(FailureReason::Handler(message.into()))
    }

    /// True for [`Outcome::Success`].
    pub fn is_success(&self) -> bool {
        matches!(self, Outcome::Success)
    }
}

/// Why a delivery failed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureReason {
    /// The handler ran and reported a business-level failure.
    Handler(String),
    /// The handler did not signal within the per-attempt time budget.
    Timeout,
    /// The handler panicked; the panic was caught and converted.
    Panicked(String),
    /// The stored payload no longer decodes into the queue's payload type.
    /// Retrying cannot help; the backend dead-letters immediately.
    InvalidPayload(String),
}

impl FailureReason {
    /// Whether the backend should consider requeueing. Invalid payloads are
    /// permanent; everything else may be transient.
    pub fn is_retryable(&self) -> bool {
        !matches!(self, FailureReason::InvalidPayload(_))
    }
}

impl fmt::Display for FailureReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureReason::Handler(message) => write!(f, "handler failed: {message}"),
            FailureReason::Timeout => f.write_str("handler timed out"),
            FailureReason::Panicked(message) => write!(f, "handler panicked: {message}"),
            FailureReason::InvalidPayload(message) => {
                write!(f, "payload no longer decodes: {message}")
            }
        }
    }
}

impl From<anyhow::Error> for FailureReason {
    fn from(error: anyhow::Error) -> Self {
        FailureReason::Handler(format!("{error:#}"))
    }
}
