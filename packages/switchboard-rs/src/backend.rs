//! The durable queue backend boundary.
//!
//! The backend is an external collaborator: it owns persistence, broker
//! networking, visibility timeouts, and the retry budget. This layer only
//! defines the contract it must honor and observes the lifecycle transitions
//! its answers imply.
//!
//! # Example Implementation
//!
//! ```ignore
//! use switchboard::{BackendError, ClaimedJob, FailureReason, JobId, JobState, QueueBackend, QueueName};
//!
//! struct RedisBackend { /* ... */ }
//!
//! #[async_trait::async_trait]
//! impl QueueBackend for RedisBackend {
//!     async fn submit(&self, queue: QueueName, data: serde_json::Value) -> Result<JobId, BackendError> {
//!         // LPUSH to the queue's list, return the assigned id
//!     }
//!
//!     async fn claim(&self, queue: QueueName) -> Result<Option<ClaimedJob>, BackendError> {
//!         // BRPOPLPUSH into a processing list with a visibility timeout
//!     }
//!
//!     async fn ack(&self, queue: QueueName, id: &JobId) -> Result<(), BackendError> {
//!         // Remove from the processing list
//!     }
//!
//!     async fn nack(&self, queue: QueueName, id: &JobId, reason: &FailureReason) -> Result<JobState, BackendError> {
//!         // Requeue or dead-letter based on the attempt budget; report which
//!     }
//! }
//! ```

use serde_json::Value;
use thiserror::Error;

use crate::job::{ClaimedJob, FailureReason, JobId, JobState};
use crate::queue::QueueName;

/// Faults reported by the backend.
#[derive(Debug, Error)]
pub enum BackendError {
    /// The backend could not be reached or did not acknowledge. Transient.
    #[error("backend unavailable: {message}")]
    Unavailable {
        /// The transport's account of the fault.
        message: String,
    },

    /// The job id is not known to the backend for this queue. Indicates an
    /// ack/nack for a job that was never claimed or was already settled.
    #[error("job {id} is not known to the backend")]
    UnknownJob {
        /// The id that failed to resolve.
        id: JobId,
    },
}

/// Contract the durable backend must honor.
///
/// All operations address queues by their catalog identifier; the backend
/// sees only wire names. Delivery is at-least-once: a claimed job whose ack
/// never arrives (crash, network) is redelivered after the backend's
/// visibility timeout.
#[async_trait::async_trait]
pub trait QueueBackend: Send + Sync + 'static {
    /// Durably accept a payload. Returns once the job exists in `Waiting`
    /// state; the returned id is unique per queue and never reused.
    async fn submit(&self, queue: QueueName, data: Value) -> Result<JobId, BackendError>;

    /// Claim the next job, moving it `Waiting -> Active` and incrementing
    /// its attempt counter. `None` when the queue is empty.
    async fn claim(&self, queue: QueueName) -> Result<Option<ClaimedJob>, BackendError>;

    /// Settle a claimed job as `Completed`. The job is never delivered
    /// again.
    async fn ack(&self, queue: QueueName, id: &JobId) -> Result<(), BackendError>;

    /// Report a failed attempt. The backend decides between requeue and
    /// dead-letter (attempt budget, retryability of `reason`) and returns
    /// the state it moved the job to - [`JobState::Retrying`] or
    /// [`JobState::Dead`] - so the caller can observe the transition.
    async fn nack(
        &self,
        queue: QueueName,
        id: &JobId,
        reason: &FailureReason,
    ) -> Result<JobState, BackendError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backend_error_display() {
        let err = BackendError::Unavailable {
            message: "connection refused".into(),
        };
        assert_eq!(err.to_string(), "backend unavailable: connection refused");

        let id = JobId::from("j-1".to_string());
        let err = BackendError::UnknownJob { id };
        assert_eq!(err.to_string(), "job j-1 is not known to the backend");
    }
}
