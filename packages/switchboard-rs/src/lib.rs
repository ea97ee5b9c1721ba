//! # Switchboard
//!
//! A typed job-dispatch layer where a closed queue catalog, validated
//! payloads, and explicit retry semantics connect producers to workers.
//!
//! ## Core Concepts
//!
//! Switchboard separates **what happened** from **what must happen next**:
//! - [`DomainEvent`] = a fact raised by application logic
//! - a job = side-effecting work owed because of that fact, owned by a queue
//!
//! The key principle: **one queue = one payload type = one handler**. The
//! queue set is a fixed, compile-time catalog ([`QueueName`]); payload types
//! carry their queue as a compile-time fact ([`JobPayload::QUEUE`]).
//!
//! ## Architecture
//!
//! ```text
//! Application edge (API / webhooks / admin)
//!     │
//!     ▼ Router::dispatch(event)
//! Dispatch Router ─── static table: event → [(queue, projection)]
//!     │
//!     ▼ Producer::enqueue(payload)      ◄─ validation happens HERE,
//! Queue Registry ── handle per queue        before any backend call
//!     │
//!     ▼ QueueBackend::submit            ◄─ suspension point: resumes on
//! Durable backend (external)                durable acceptance only
//!     │   Waiting → Active → {Completed | Failed → Retrying | Dead}
//!     ▼ QueueBackend::claim
//! Consumer ── per-queue handler pool, semaphore-bounded concurrency
//!     │
//!     ▼ ack / nack(reason)
//! ```
//!
//! ## Key Invariants
//!
//! 1. **The catalog is closed** - every queue is a [`QueueName`] variant;
//!    statically addressed queues cannot miss at runtime
//! 2. **One schema per queue, forever** - never shared, even when shapes
//!    coincide
//! 3. **Validation precedes the backend** - a rejected payload never
//!    becomes a job
//! 4. **Enqueue is a hand-off** - the caller suspends for the durable
//!    acknowledgment and never for processing
//! 5. **No internal retries in the producer** - transient faults propagate
//!    to the caller that owns backoff
//! 6. **At-least-once consumption** - handlers must be re-runnable for the
//!    same job id; terminal failures are surfaced, never dropped
//!
//! ## Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use switchboard::payload::ReactionNotificationJobData;
//! use switchboard::{
//!     handler_fn, Consumer, DomainEvent, Job, Outcome, Producer, QueueRegistry, Router,
//! };
//!
//! // Startup: register the catalog over a durable backend.
//! let registry = Arc::new(QueueRegistry::builder(backend).register_all()?.build());
//!
//! // Edge process: raise domain events, let the router fan out.
//! let router = Router::new(Producer::new(Arc::clone(&registry)));
//! router.dispatch(DomainEvent::ReactionAdded { reaction, user_id }).await?;
//!
//! // Worker process: one handler per queue, bounded concurrency.
//! let consumer = Consumer::new(registry)
//!     .process(handler_fn(|job: Job<ReactionNotificationJobData>| async move {
//!         match send_reaction_notification(&job.data).await {
//!             Ok(()) => Outcome::Success,
//!             Err(e) => Outcome::failure(e.to_string()),
//!         }
//!     }))?
//!     .start();
//! ```
//!
//! ## What This Is Not
//!
//! Switchboard is **not**:
//! - A queue backend (persistence, visibility timeouts, and the retry
//!   budget belong to the [`QueueBackend`] implementation)
//! - Exactly-once delivery
//! - A transaction coordinator across queues
//! - A priority scheduler
//!
//! Switchboard **is**:
//! > The contract layer: a schema catalog and the producer/consumer
//! > protocol that make dozens of independently evolving job kinds
//! > type-safe to enqueue and predictable to fail.

// Core modules
mod backend;
mod consumer;
mod error;
mod job;
mod lifecycle;
mod memory;
mod producer;
mod queue;
mod registry;
mod router;
mod schema;

// The payload/record catalog (large, kept namespaced)
pub mod payload;
pub mod record;

// Testing utilities (feature-gated)
#[cfg(any(test, feature = "testing"))]
pub mod testing;


// Re-export the backend boundary
pub use backend::{BackendError, QueueBackend};

// Re-export the consumer contract
pub use consumer::{
    handler_fn, try_handler_fn, Consumer, ConsumerHandle, HandlerFn, JobHandler, TryHandlerFn,
    WorkerOptions,
};

// Re-export error types
pub use error::{ConsumerError, EnqueueError, RegistryError};

// Re-export job types
pub use job::{ClaimedJob, FailureReason, Job, JobHandle, JobId, JobState, Outcome};

// Re-export lifecycle observation
pub use lifecycle::LifecycleEvent;

// Re-export the in-memory reference backend
pub use memory::{BackendOptions, DeadLetter, InMemoryBackend};

// Re-export the payload/queue binding traits
pub use payload::{ErasedJobPayload, JobPayload};

// Re-export the producer contract
pub use producer::Producer;

// Re-export the queue catalog
pub use queue::{QueueName, WorkerGroup};

// Re-export the registry
pub use registry::{QueueDescriptor, QueueRegistry, RegistryBuilder};

// Re-export the dispatch router
pub use router::{CommunityChange, DomainEvent, FanOut, Router};

// Re-export schema metadata
pub use schema::{FieldKind, FieldSpec, PayloadSchema, SchemaViolation};

// Re-export commonly used external types
pub use async_trait::async_trait;
