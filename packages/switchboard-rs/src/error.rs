//! Structured error types for the dispatch contract.
//!
//! # Propagation Policy
//!
//! - [`SchemaViolation`](crate::schema::SchemaViolation) is a caller bug:
//!   surfaced immediately to the producer, never retried, never sent to the
//!   backend.
//! - [`RegistryError`] variants are configuration bugs, fatal at process
//!   initialization.
//! - [`EnqueueError::BackendUnavailable`] is transient infrastructure fault.
//!   The contract never retries internally; the error propagates to a caller
//!   capable of retrying with backoff or alerting.
//! - Handler failures travel as [`Outcome::Failure`](crate::job::Outcome)
//!   values, not errors; the backend's attempt budget governs retries.
//!
//! No error kind is ever converted into a successful outcome.

use thiserror::Error;

use crate::backend::BackendError;
use crate::schema::SchemaViolation;

/// Errors raised by queue registration and lookup.
#[derive(Debug, Error)]
pub enum RegistryError {
    /// `register` was called twice for the same queue.
    #[error("queue {name} is already registered")]
    DuplicateQueue {
        /// Wire name of the queue.
        name: &'static str,
    },

    /// The queue is absent from this registry, or the string names no
    /// catalog queue at all.
    #[error("queue {name} is not registered")]
    UnknownQueue {
        /// The name that failed to resolve.
        name: String,
    },
}

/// Errors raised by the producer's enqueue operations.
#[derive(Debug, Error)]
pub enum EnqueueError {
    /// The payload does not satisfy the queue's schema. Caller bug; the
    /// backend was not contacted.
    #[error(transparent)]
    Schema(#[from] SchemaViolation),

    /// The target queue is not registered.
    #[error("queue {name} is not registered")]
    UnknownQueue {
        /// The name that failed to resolve.
        name: String,
    },

    /// The backend did not acknowledge the submission. Transient; retry at
    /// the call site with backoff.
    #[error("queue backend unavailable")]
    BackendUnavailable {
        /// The backend's own account of the fault.
        #[source]
        source: BackendError,
    },
}

impl From<BackendError> for EnqueueError {
    fn from(source: BackendError) -> Self {
        EnqueueError::BackendUnavailable { source }
    }
}

/// Errors raised while wiring up consumers.
#[derive(Debug, Error)]
pub enum ConsumerError {
    /// The queue is not registered in the registry this consumer was built
    /// from.
    #[error("queue {name} is not registered")]
    UnknownQueue {
        /// Wire name of the queue.
        name: &'static str,
    },

    /// A handler is already registered for this queue in this consumer.
    #[error("a handler is already registered for queue {name}")]
    HandlerAlreadyRegistered {
        /// Wire name of the queue.
        name: &'static str,
    },
}
