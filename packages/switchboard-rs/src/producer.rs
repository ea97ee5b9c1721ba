//! The producer contract: type-safe enqueue with validate-before-submit.
//!
//! Enqueue is an asynchronous hand-off, not a procedure call: the calling
//! task suspends only until the backend acknowledges durable acceptance and
//! never waits for processing. The returned [`JobHandle`] is that
//! acknowledgment.
//!
//! Three entry points, one contract:
//! - [`Producer::enqueue`] - statically typed; the queue follows from the
//!   payload type.
//! - [`Producer::enqueue_raw`] - dynamically shaped (boundary inputs such as
//!   webhook bodies); validated against the queue's schema **before any
//!   backend call**.
//! - [`Producer::enqueue_erased`] - type-erased payloads from the dispatch
//!   router's fan-out.
//!
//! No deduplication happens here: two calls with identical data create two
//! distinct jobs. The contract never retries internally - a
//! [`EnqueueError::BackendUnavailable`] propagates to the caller, which owns
//! backoff policy.

use std::sync::Arc;

use serde_json::Value;
use tracing::{debug, warn};

use crate::error::EnqueueError;
use crate::job::{JobHandle, JobState};
use crate::payload::{ErasedJobPayload, JobPayload};
use crate::queue::QueueName;
use crate::registry::{QueueEntry, QueueRegistry};
use crate::schema::SchemaViolation;

/// Producer handle over a frozen registry. Cheap to clone.
#[derive(Clone)]
pub struct Producer {
    registry: Arc<QueueRegistry>,
}

impl Producer {
    /// Create a producer over the given registry.
    pub fn new(registry: Arc<QueueRegistry>) -> Self {
        Self { registry }
    }

    /// Enqueue a statically typed payload to its queue.
    ///
    /// The payload/queue pairing is a compile-time fact, so this path cannot
    /// hit `UnknownQueue` unless the process chose not to register the queue.
    /// The serialized form is still validated against the schema, keeping
    /// the typed and raw paths under one contract.
    pub async fn enqueue<P: JobPayload>(&self, payload: P) -> Result<JobHandle, EnqueueError> {
        let entry = self.entry(P::QUEUE)?;
        let data = serialize(&payload, entry)?;
        entry.descriptor.schema.validate(&data)?;
        self.submit(entry, data).await
    }

    /// Enqueue a dynamically shaped payload by wire name.
    ///
    /// Validation happens before the backend is contacted; a rejected
    /// payload never produces a job.
    pub async fn enqueue_raw(
        &self,
        queue_name: &str,
        data: Value,
    ) -> Result<JobHandle, EnqueueError> {
        let queue =
            QueueName::parse(queue_name).ok_or_else(|| EnqueueError::UnknownQueue {
                name: queue_name.to_string(),
            })?;
        let entry = self.entry(queue)?;
        entry.descriptor.schema.validate(&data)?;
        self.submit(entry, data).await
    }

    /// Enqueue a type-erased payload. Used by the dispatch router, which
    /// fans one domain event out into payloads for several queues.
    pub async fn enqueue_erased(
        &self,
        payload: Box<dyn ErasedJobPayload>,
    ) -> Result<JobHandle, EnqueueError> {
        let entry = self.entry(payload.queue())?;
        let data = serialize(&*payload, entry)?;
        entry.descriptor.schema.validate(&data)?;
        self.submit(entry, data).await
    }

    fn entry(&self, queue: QueueName) -> Result<&QueueEntry, EnqueueError> {
        self.registry
            .entry(queue)
            .ok_or_else(|| EnqueueError::UnknownQueue {
                name: queue.as_str().to_string(),
            })
    }

    /// Suspension point: resumes once the backend acknowledges durable
    /// acceptance. Exactly one `Waiting` job exists per successful return.
    async fn submit(&self, entry: &QueueEntry, data: Value) -> Result<JobHandle, EnqueueError> {
        let queue = entry.descriptor.name;
        let id = match entry.handle.submit(data).await {
            Ok(id) => id,
            Err(source) => {
                warn!(queue = %queue, error = %source, "backend did not acknowledge enqueue");
                return Err(EnqueueError::BackendUnavailable { source });
            }
        };

        self.registry
            .lifecycle()
            .emit(id.clone(), queue, JobState::Waiting);
        debug!(queue = %queue, job_id = %id, "job accepted");

        Ok(JobHandle {
            id,
            queue,
            accepted_at: chrono::Utc::now(),
        })
    }
}

fn serialize<P>(payload: &P, entry: &QueueEntry) -> Result<Value, EnqueueError>
where
    P: serde::Serialize + ?Sized,
{
    serde_json::to_value(payload).map_err(|error| {
        EnqueueError::Schema(SchemaViolation::Unserializable {
            schema: entry.descriptor.schema.name,
            message: error.to_string(),
        })
    })
}

impl std::fmt::Debug for Producer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Producer")
            .field("registry", &self.registry)
            .finish()
    }
}
