//! The queue registry: descriptors and backend handles, frozen at startup.
//!
//! The registry owns the set of registered [`QueueDescriptor`]s and one
//! connection-scoped backend handle per queue, opened at registration and
//! reused for every later enqueue and consume call. The descriptor map is
//! write-once: the [`RegistryBuilder`] is consumed into an immutable
//! [`QueueRegistry`], so no locking is needed after initialization.
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use switchboard::{QueueName, QueueRegistry};
//!
//! // A worker process for the notifier fleet registers only its own queues:
//! let registry = QueueRegistry::builder(backend)
//!     .register(QueueName::SendThreadNotification)?
//!     .register(QueueName::SendReactionNotification)?
//!     .build();
//!
//! // The edge process producing into every queue registers the full catalog:
//! let registry = QueueRegistry::builder(backend).register_all()?.build();
//! ```

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::broadcast;
use tracing::debug;

use crate::backend::{BackendError, QueueBackend};
use crate::error::RegistryError;
use crate::job::{ClaimedJob, FailureReason, JobId, JobState};
use crate::lifecycle::{LifecycleEvent, LifecycleTap};
use crate::queue::QueueName;
use crate::schema::PayloadSchema;

/// A registered queue: its identity and the schema bound to it.
#[derive(Debug, Clone, Copy)]
pub struct QueueDescriptor {
    /// Catalog identifier.
    pub name: QueueName,
    /// The one payload schema for this queue's entire lifetime.
    pub schema: &'static PayloadSchema,
}

/// Connection-scoped handle to one queue on the backend.
///
/// Opened once at registration; every enqueue/claim/settle for the queue
/// reuses it, so there is no per-call connection cost.
#[derive(Clone)]
pub(crate) struct QueueHandle {
    backend: Arc<dyn QueueBackend>,
    queue: QueueName,
}

impl QueueHandle {
    pub(crate) async fn submit(&self, data: serde_json::Value) -> Result<JobId, BackendError> {
        self.backend.submit(self.queue, data).await
    }

    pub(crate) async fn claim(&self) -> Result<Option<ClaimedJob>, BackendError> {
        self.backend.claim(self.queue).await
    }

    pub(crate) async fn ack(&self, id: &JobId) -> Result<(), BackendError> {
        self.backend.ack(self.queue, id).await
    }

    pub(crate) async fn nack(
        &self,
        id: &JobId,
        reason: &FailureReason,
    ) -> Result<JobState, BackendError> {
        self.backend.nack(self.queue, id, reason).await
    }
}

pub(crate) struct QueueEntry {
    pub(crate) descriptor: QueueDescriptor,
    pub(crate) handle: QueueHandle,
}

/// Builder for a [`QueueRegistry`]. Runs once at process initialization.
pub struct RegistryBuilder {
    backend: Arc<dyn QueueBackend>,
    entries: HashMap<QueueName, QueueEntry>,
}

impl RegistryBuilder {
    /// Register one queue, opening its backend handle.
    ///
    /// # Errors
    ///
    /// [`RegistryError::DuplicateQueue`] if the queue is already registered.
    pub fn register(mut self, name: QueueName) -> Result<Self, RegistryError> {
        if self.entries.contains_key(&name) {
            return Err(RegistryError::DuplicateQueue {
                name: name.as_str(),
            });
        }

        let descriptor = QueueDescriptor {
            name,
            schema: name.schema(),
        };
        let handle = QueueHandle {
            backend: Arc::clone(&self.backend),
            queue: name,
        };
        debug!(queue = %name, schema = descriptor.schema.name, "registered queue");
        self.entries.insert(name, QueueEntry { descriptor, handle });
        Ok(self)
    }

    /// Register the entire catalog. Used by processes that produce into
    /// every queue (the application edge).
    pub fn register_all(mut self) -> Result<Self, RegistryError> {
        for queue in QueueName::ALL {
            self = self.register(*queue)?;
        }
        Ok(self)
    }

    /// Freeze the registry. After this the descriptor map is read-only.
    pub fn build(self) -> QueueRegistry {
        QueueRegistry {
            entries: self.entries,
            lifecycle: LifecycleTap::new(),
        }
    }
}

/// The frozen queue registry.
///
/// Shared as `Arc<QueueRegistry>` between producers, consumers, and the
/// router. Backend handles are owned exclusively by the registry and are not
/// exposed for direct mutation.
pub struct QueueRegistry {
    entries: HashMap<QueueName, QueueEntry>,
    lifecycle: LifecycleTap,
}

impl QueueRegistry {
    /// Start building a registry over the given backend.
    pub fn builder(backend: Arc<dyn QueueBackend>) -> RegistryBuilder {
        RegistryBuilder {
            backend,
            entries: HashMap::new(),
        }
    }

    /// Resolve a catalog queue to its descriptor.
    ///
    /// # Errors
    ///
    /// [`RegistryError::UnknownQueue`] when the queue was not registered in
    /// this registry (a process only registers the queues it serves).
    pub fn resolve(&self, name: QueueName) -> Result<&QueueDescriptor, RegistryError> {
        self.entries
            .get(&name)
            .map(|entry| &entry.descriptor)
            .ok_or_else(|| RegistryError::UnknownQueue {
                name: name.as_str().to_string(),
            })
    }

    /// Resolve a wire name to its descriptor. Strings outside the closed
    /// catalog fail the same way as unregistered queues.
    pub fn resolve_name(&self, name: &str) -> Result<&QueueDescriptor, RegistryError> {
        let queue = QueueName::parse(name).ok_or_else(|| RegistryError::UnknownQueue {
            name: name.to_string(),
        })?;
        self.resolve(queue)
    }

    /// Subscribe to observed lifecycle transitions.
    pub fn subscribe_lifecycle(&self) -> broadcast::Receiver<LifecycleEvent> {
        self.lifecycle.subscribe()
    }

    /// The registered queues, in arbitrary order.
    pub fn queues(&self) -> impl Iterator<Item = QueueName> + '_ {
        self.entries.keys().copied()
    }

    /// Number of registered queues.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when nothing is registered.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub(crate) fn entry(&self, name: QueueName) -> Option<&QueueEntry> {
        self.entries.get(&name)
    }

    pub(crate) fn lifecycle(&self) -> &LifecycleTap {
        &self.lifecycle
    }
}

impl std::fmt::Debug for QueueRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QueueRegistry")
            .field("queues", &self.entries.len())
            .finish_non_exhaustive()
    }
}
