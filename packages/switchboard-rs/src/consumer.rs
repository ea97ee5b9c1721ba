//! The consumer contract: per-queue handler pools with bounded concurrency.
//!
//! A [`Consumer`] binds one [`JobHandler`] per queue, then [`Consumer::start`]
//! spawns a worker loop per queue that claims jobs, runs the handler, and
//! settles each delivery with an ack or a nack.
//!
//! # Concurrency & Backpressure
//!
//! Each queue's in-flight handler invocations are bounded by a semaphore
//! sized to [`WorkerOptions::concurrency`]. That bound is the backpressure
//! control: it caps how many jobs one process handles simultaneously,
//! independent of how fast producers enqueue. Invocations for different jobs
//! have no ordering guarantee, and jobs are not processed in submission
//! order.
//!
//! # At-Least-Once
//!
//! A handler may be invoked more than once for the same job id (crash
//! between claim and ack, visibility timeout). Handlers must be safely
//! re-runnable for the same input; [`Job::is_retry`] flags redeliveries.
//!
//! # Failure Handling
//!
//! - Handler returns [`Outcome::Failure`]: the delivery is nacked; the
//!   backend requeues or dead-letters per its attempt budget.
//! - Handler exceeds the per-attempt timeout: counted as
//!   [`FailureReason::Timeout`].
//! - Handler panics: the panic is caught and converted to a failure; the
//!   worker loop survives.
//! - Stored payload no longer decodes: [`FailureReason::InvalidPayload`],
//!   dead-lettered without invoking the handler.

use std::any::Any;
use std::collections::HashMap;
use std::future::Future;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::Duration;

use futures::future::BoxFuture;
use futures::FutureExt;
use tokio::sync::{watch, Semaphore};
use tokio::task::{JoinHandle, JoinSet};
use tracing::{debug, error, info, warn};

use crate::error::ConsumerError;
use crate::job::{ClaimedJob, FailureReason, Job, JobState, Outcome};
use crate::lifecycle::LifecycleTap;
use crate::payload::JobPayload;
use crate::queue::QueueName;
use crate::registry::{QueueHandle, QueueRegistry};

/// Processes jobs claimed from one queue.
///
/// Implement directly for handlers with dependencies, or adapt a closure
/// with [`handler_fn`] / [`try_handler_fn`].
#[async_trait::async_trait]
pub trait JobHandler<P: JobPayload>: Send + Sync + 'static {
    /// Process one delivery and signal the outcome. May suspend for further
    /// asynchronous work before signaling.
    async fn handle(&self, job: Job<P>) -> Outcome;
}

/// Adapter from a closure returning [`Outcome`]. See [`handler_fn`].
pub struct HandlerFn<F> {
    f: F,
}

/// Adapt an async closure into a [`JobHandler`].
///
/// ```ignore
/// consumer.process(handler_fn(|job: Job<ReactionNotificationJobData>| async move {
///     match notify(&job.data).await {
///         Ok(()) => Outcome::Success,
///         Err(e) => Outcome::failure(e.to_string()),
///     }
/// }))?
/// ```
pub fn handler_fn<F>(f: F) -> HandlerFn<F> {
    HandlerFn { f }
}

#[async_trait::async_trait]
impl<P, F, Fut> JobHandler<P> for HandlerFn<F>
where
    P: JobPayload,
    F: Fn(Job<P>) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Outcome> + Send + 'static,
{
    async fn handle(&self, job: Job<P>) -> Outcome {
        (self.f)(job).await
    }
}

/// Adapter from a fallible closure. See [`try_handler_fn`].
pub struct TryHandlerFn<F> {
    f: F,
}

/// Adapt an async closure returning `anyhow::Result<()>`; errors become
/// handler-level failures with their full context chain.
pub fn try_handler_fn<F>(f: F) -> TryHandlerFn<F> {
    TryHandlerFn { f }
}

#[async_trait::async_trait]
impl<P, F, Fut> JobHandler<P> for TryHandlerFn<F>
where
    P: JobPayload,
    F: Fn(Job<P>) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = anyhow::Result<()>> + Send + 'static,
{
    async fn handle(&self, job: Job<P>) -> Outcome {
        match (self.f)(job).await {
            Ok(()) => Outcome::Success,
            Err(error) => Outcome::Failure(FailureReason::from(error)),
        }
    }
}

/// Per-queue worker tuning.
#[derive(Debug, Clone)]
pub struct WorkerOptions {
    /// Maximum simultaneously in-flight handler invocations for this queue.
    pub concurrency: usize,
    /// Per-attempt time budget. Mirrors the backend's visibility timeout;
    /// exceeding it converts the attempt to [`FailureReason::Timeout`]
    /// without waiting for backend reclaim. `None` disables the local check.
    pub timeout: Option<Duration>,
    /// How long to sleep when a claim finds the queue empty.
    pub poll_interval: Duration,
}

impl Default for WorkerOptions {
    fn default() -> Self {
        Self {
            concurrency: 4,
            timeout: None,
            poll_interval: Duration::from_millis(500),
        }
    }
}

type ErasedHandler = Arc<dyn Fn(ClaimedJob) -> BoxFuture<'static, Outcome> + Send + Sync>;

struct WorkerSpec {
    options: WorkerOptions,
    handler: ErasedHandler,
}

/// Builder for a process's consumer side: one handler per queue, then
/// [`start`](Consumer::start).
pub struct Consumer {
    registry: Arc<QueueRegistry>,
    workers: HashMap<QueueName, WorkerSpec>,
}

impl Consumer {
    /// Create a consumer over the given registry.
    pub fn new(registry: Arc<QueueRegistry>) -> Self {
        Self {
            registry,
            workers: HashMap::new(),
        }
    }

    /// Register a handler for the payload's queue with default options.
    pub fn process<P, H>(self, handler: H) -> Result<Self, ConsumerError>
    where
        P: JobPayload,
        H: JobHandler<P>,
    {
        self.process_with(handler, WorkerOptions::default())
    }

    /// Register a handler for the payload's queue.
    ///
    /// # Errors
    ///
    /// - [`ConsumerError::UnknownQueue`] when this registry never registered
    ///   the queue.
    /// - [`ConsumerError::HandlerAlreadyRegistered`] on a second handler for
    ///   the same queue.
    pub fn process_with<P, H>(
        mut self,
        handler: H,
        options: WorkerOptions,
    ) -> Result<Self, ConsumerError>
    where
        P: JobPayload,
        H: JobHandler<P>,
    {
        let queue = P::QUEUE;
        if self.registry.entry(queue).is_none() {
            return Err(ConsumerError::UnknownQueue {
                name: queue.as_str(),
            });
        }
        if self.workers.contains_key(&queue) {
            return Err(ConsumerError::HandlerAlreadyRegistered {
                name: queue.as_str(),
            });
        }

        let handler = Arc::new(handler);
        let erased: ErasedHandler = Arc::new(move |claimed: ClaimedJob| {
            let handler = Arc::clone(&handler);
            async move {
                let ClaimedJob {
                    id,
                    queue,
                    payload,
                    attempt,
                    created_at,
                } = claimed;
                let data: P = match serde_json::from_value(payload) {
                    Ok(data) => data,
                    Err(error) => {
                        return Outcome::Failure(FailureReason::InvalidPayload(
                            error.to_string(),
                        ))
                    }
                };
                handler
                    .handle(Job {
                        id,
                        queue,
                        data,
                        created_at,
                        attempt,
                    })
                    .await
            }
            .boxed()
        });

        self.workers.insert(
            queue,
            WorkerSpec {
                options,
                handler: erased,
            },
        );
        Ok(self)
    }

    /// Spawn one worker loop per registered handler.
    pub fn start(self) -> ConsumerHandle {
        let Consumer { registry, workers } = self;
        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        let mut tasks = Vec::with_capacity(workers.len());

        for (queue, spec) in workers {
            // Presence was checked at process() time; the registry is frozen.
            let Some(entry) = registry.entry(queue) else {
                continue;
            };
            let handle = entry.handle.clone();
            let lifecycle = registry.lifecycle().clone();
            let shutdown = shutdown_rx.clone();
            info!(queue = %queue, concurrency = spec.options.concurrency, "starting worker");
            tasks.push(tokio::spawn(run_worker(
                queue, handle, lifecycle, spec, shutdown,
            )));
        }

        ConsumerHandle {
            shutdown: shutdown_tx,
            tasks,
        }
    }
}

/// Handle to a running consumer. Dropping it without calling
/// [`shutdown`](ConsumerHandle::shutdown) stops the worker loops without
/// draining in-flight handlers.
pub struct ConsumerHandle {
    shutdown: watch::Sender<bool>,
    tasks: Vec<JoinHandle<()>>,
}

impl ConsumerHandle {
    /// Number of running worker loops.
    pub fn worker_count(&self) -> usize {
        self.tasks.len()
    }

    /// Signal shutdown and wait for every worker loop to drain its
    /// in-flight handlers.
    pub async fn shutdown(self) {
        let _ = self.shutdown.send(true);
        for task in self.tasks {
            let _ = task.await;
        }
        info!("consumer stopped");
    }
}

async fn run_worker(
    queue: QueueName,
    handle: QueueHandle,
    lifecycle: LifecycleTap,
    spec: WorkerSpec,
    mut shutdown: watch::Receiver<bool>,
) {
    let WorkerSpec { options, handler } = spec;
    let semaphore = Arc::new(Semaphore::new(options.concurrency));
    let mut inflight = JoinSet::new();

    loop {
        if *shutdown.borrow() {
            break;
        }

        // Hold a permit before claiming so claims never outpace capacity.
        let permit = tokio::select! {
            _ = shutdown.changed() => break,
            permit = Arc::clone(&semaphore).acquire_owned() => match permit {
                Ok(permit) => permit,
                Err(_) => break,
            },
        };

        match handle.claim().await {
            Ok(Some(claimed)) => {
                lifecycle.emit(claimed.id.clone(), queue, JobState::Active);
                debug!(queue = %queue, job_id = %claimed.id, attempt = claimed.attempt, "claimed job");

                let handle = handle.clone();
                let lifecycle = lifecycle.clone();
                let handler = Arc::clone(&handler);
                let timeout = options.timeout;
                inflight.spawn(async move {
                    let _permit = permit;
                    settle_one(queue, handle, lifecycle, handler, timeout, claimed).await;
                });
            }
            Ok(None) => {
                drop(permit);
                tokio::select! {
                    _ = shutdown.changed() => break,
                    _ = tokio::time::sleep(options.poll_interval) => {}
                }
            }
            Err(error) => {
                drop(permit);
                warn!(queue = %queue, error = %error, "claim failed, backing off");
                tokio::select! {
                    _ = shutdown.changed() => break,
                    _ = tokio::time::sleep(options.poll_interval) => {}
                }
            }
        }

        while inflight.try_join_next().is_some() {}
    }

    // Drain in-flight handlers before reporting the loop stopped.
    while inflight.join_next().await.is_some() {}
    info!(queue = %queue, "worker stopped");
}

async fn settle_one(
    queue: QueueName,
    handle: QueueHandle,
    lifecycle: LifecycleTap,
    handler: ErasedHandler,
    timeout: Option<Duration>,
    claimed: ClaimedJob,
) {
    let id = claimed.id.clone();
    let attempt = claimed.attempt;

    // AssertUnwindSafe is required because the erased handler is not
    // UnwindSafe; the worker loop must survive handler panics.
    let work = AssertUnwindSafe((handler.as_ref())(claimed)).catch_unwind();
    let outcome = match timeout {
        Some(limit) => match tokio::time::timeout(limit, work).await {
            Ok(result) => unwind_outcome(result),
            Err(_) => Outcome::Failure(FailureReason::Timeout),
        },
        None => unwind_outcome(work.await),
    };

    match outcome {
        Outcome::Success => match handle.ack(&id).await {
            Ok(()) => {
                lifecycle.emit(id.clone(), queue, JobState::Completed);
                info!(queue = %queue, job_id = %id, "job completed");
            }
            Err(error) => {
                error!(queue = %queue, job_id = %id, error = %error, "ack failed, job may be redelivered");
            }
        },
        Outcome::Failure(reason) => {
            warn!(queue = %queue, job_id = %id, attempt, reason = %reason, "job failed");
            lifecycle.emit(id.clone(), queue, JobState::Failed { attempt });
            match handle.nack(&id, &reason).await {
                Ok(state) => {
                    lifecycle.emit(id.clone(), queue, state);
                    if state == JobState::Dead {
                        error!(queue = %queue, job_id = %id, attempt, "job dead-lettered");
                    }
                }
                Err(error) => {
                    error!(queue = %queue, job_id = %id, error = %error, "nack failed, job may be redelivered");
                }
            }
        }
    }
}

fn unwind_outcome(result: Result<Outcome, Box<dyn Any + Send>>) -> Outcome {
    match result {
        Ok(outcome) => outcome,
        Err(panic) => Outcome::Failure(FailureReason::Panicked(panic_message(&panic))),
    }
}

fn panic_message(panic: &Box<dyn Any + Send>) -> String {
    if let Some(s) = panic.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use serde_json::json;

    use super::*;
    use crate::payload::CommunityNotificationJobData;
    use crate::producer::Producer;
    use crate::testing::{BackendOptions, InMemoryBackend};

    const QUEUE: QueueName = QueueName::SendCommunityNotification;

    fn fast_options(concurrency: usize) -> WorkerOptions {
        WorkerOptions {
            concurrency,
            timeout: None,
            poll_interval: Duration::from_millis(10),
        }
    }

    fn setup(backend: Arc<InMemoryBackend>) -> (Arc<QueueRegistry>, Producer) {
        let registry = Arc::new(
            QueueRegistry::builder(backend)
                .register_all()
                .unwrap()
                .build(),
        );
        let producer = Producer::new(Arc::clone(&registry));
        (registry, producer)
    }

    fn sample_payload() -> CommunityNotificationJobData {
        CommunityNotificationJobData {
            community_id: "co1".into(),
            user_id: "u1".into(),
        }
    }

    async fn wait_until(mut condition: impl FnMut() -> bool) {
        let deadline = tokio::time::Instant::now() + Duration::from_secs(5);
        while !condition() {
            assert!(
                tokio::time::Instant::now() < deadline,
                "condition not reached within deadline"
            );
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_successful_job_is_acked_once() {
        let backend = Arc::new(InMemoryBackend::new());
        let (registry, producer) = setup(backend.clone());

        let invocations = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&invocations);

        let handle = producer.enqueue(sample_payload()).await.unwrap();

        let consumer = Consumer::new(registry)
            .process_with(
                handler_fn(move |job: Job<CommunityNotificationJobData>| {
                    let counter = Arc::clone(&counter);
                    async move {
                        assert_eq!(job.data.user_id, "u1");
                        assert!(!job.is_retry());
                        counter.fetch_add(1, Ordering::SeqCst);
                        Outcome::Success
                    }
                }),
                fast_options(2),
            )
            .unwrap()
            .start();

        wait_until(|| backend.completed(QUEUE).contains(&handle.id)).await;
        consumer.shutdown().await;

        assert_eq!(invocations.load(Ordering::SeqCst), 1);
        assert!(backend.dead_letters(QUEUE).is_empty());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_failing_job_retries_then_dead_letters() {
        let backend = Arc::new(InMemoryBackend::with_options(BackendOptions {
            max_attempts: 3,
        }));
        let (registry, producer) = setup(backend.clone());

        let invocations = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&invocations);

        let handle = producer.enqueue(sample_payload()).await.unwrap();
        let failed_id = handle.id.clone();

        let consumer = Consumer::new(registry)
            .process_with(
                handler_fn(move |job: Job<CommunityNotificationJobData>| {
                    let counter = Arc::clone(&counter);
                    async move {
                        counter.fetch_add(1, Ordering::SeqCst);
                        assert_eq!(
                            job.attempt as usize,
                            counter.load(Ordering::SeqCst),
                            "attempt numbers must follow invocation order"
                        );
                        Outcome::failure("smtp refused")
                    }
                }),
                fast_options(1),
            )
            .unwrap()
            .start();

        wait_until(|| !backend.dead_letters(QUEUE).is_empty()).await;

        // Allow a few extra poll cycles: a dead job must never run again.
        tokio::time::sleep(Duration::from_millis(100)).await;
        consumer.shutdown().await;

        assert_eq!(invocations.load(Ordering::SeqCst), 3);
        let dead = backend.dead_letters(QUEUE);
        assert_eq!(dead.len(), 1);
        assert_eq!(dead[0].id, failed_id);
        assert_eq!(dead[0].attempts, 3);
        assert!(dead[0].reason.contains("smtp refused"));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_undecodable_payload_dead_letters_without_handler() {
        let backend = Arc::new(InMemoryBackend::new());
        let (registry, _) = setup(backend.clone());

        // Corrupt stored payload: submitted directly, bypassing validation.
        use crate::backend::QueueBackend;
        backend
            .submit(QUEUE, json!({ "communityId": 42 }))
            .await
            .unwrap();

        let invocations = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&invocations);

        let consumer = Consumer::new(registry)
            .process_with(
                handler_fn(move |_job: Job<CommunityNotificationJobData>| {
                    let counter = Arc::clone(&counter);
                    async move {
                        counter.fetch_add(1, Ordering::SeqCst);
                        Outcome::Success
                    }
                }),
                fast_options(1),
            )
            .unwrap()
            .start();

        wait_until(|| !backend.dead_letters(QUEUE).is_empty()).await;
        consumer.shutdown().await;

        assert_eq!(invocations.load(Ordering::SeqCst), 0);
        let dead = backend.dead_letters(QUEUE);
        assert_eq!(dead.len(), 1);
        assert!(dead[0].reason.contains("no longer decodes"));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_slow_handler_times_out() {
        let backend = Arc::new(InMemoryBackend::with_options(BackendOptions {
            max_attempts: 1,
        }));
        let (registry, producer) = setup(backend.clone());

        producer.enqueue(sample_payload()).await.unwrap();

        let options = WorkerOptions {
            concurrency: 1,
            timeout: Some(Duration::from_millis(20)),
            poll_interval: Duration::from_millis(10),
        };
        let consumer = Consumer::new(registry)
            .process_with(
                handler_fn(|_job: Job<CommunityNotificationJobData>| async move {
                    tokio::time::sleep(Duration::from_secs(30)).await;
                    Outcome::Success
                }),
                options,
            )
            .unwrap()
            .start();

        wait_until(|| !backend.dead_letters(QUEUE).is_empty()).await;
        consumer.shutdown().await;

        let dead = backend.dead_letters(QUEUE);
        assert!(dead[0].reason.contains("timed out"));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_panicking_handler_is_converted_to_failure() {
        let backend = Arc::new(InMemoryBackend::with_options(BackendOptions {
            max_attempts: 1,
        }));
        let (registry, producer) = setup(backend.clone());

        producer.enqueue(sample_payload()).await.unwrap();

        let consumer = Consumer::new(registry)
            .process_with(
                handler_fn(|_job: Job<CommunityNotificationJobData>| async move {
                    panic!("handler exploded")
                }),
                fast_options(1),
            )
            .unwrap()
            .start();

        wait_until(|| !backend.dead_letters(QUEUE).is_empty()).await;
        consumer.shutdown().await;

        let dead = backend.dead_letters(QUEUE);
        assert!(dead[0].reason.contains("handler exploded"));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_try_handler_fn_maps_results() {
        let backend = Arc::new(InMemoryBackend::with_options(BackendOptions {
            max_attempts: 1,
        }));
        let (registry, producer) = setup(backend.clone());

        producer.enqueue(sample_payload()).await.unwrap();

        let consumer = Consumer::new(registry)
            .process_with(
                try_handler_fn(|_job: Job<CommunityNotificationJobData>| async move {
                    Err(anyhow::anyhow!("downstream 503").context("sending notification"))
                }),
                fast_options(1),
            )
            .unwrap()
            .start();

        wait_until(|| !backend.dead_letters(QUEUE).is_empty()).await;
        consumer.shutdown().await;

        let dead = backend.dead_letters(QUEUE);
        assert!(dead[0].reason.contains("sending notification"));
        assert!(dead[0].reason.contains("downstream 503"));
    }

    #[tokio::test]
    async fn test_duplicate_handler_rejected() {
        let backend = Arc::new(InMemoryBackend::new());
        let (registry, _) = setup(backend);

        let noop =
            |_job: Job<CommunityNotificationJobData>| async move { Outcome::Success };
        let result = Consumer::new(registry)
            .process(handler_fn(noop))
            .unwrap()
            .process(handler_fn(noop));

        assert!(matches!(
            result,
            Err(ConsumerError::HandlerAlreadyRegistered { .. })
        ));
    }

    #[tokio::test]
    async fn test_handler_for_unregistered_queue_rejected() {
        let backend: Arc<dyn crate::backend::QueueBackend> = Arc::new(InMemoryBackend::new());
        let registry = Arc::new(
            QueueRegistry::builder(backend)
                .register(QueueName::SendThreadNotification)
                .unwrap()
                .build(),
        );

        let result = Consumer::new(registry).process(handler_fn(
            |_job: Job<CommunityNotificationJobData>| async move { Outcome::Success },
        ));

        assert!(matches!(result, Err(ConsumerError::UnknownQueue { .. })));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_shutdown_with_idle_workers() {
        let backend = Arc::new(InMemoryBackend::new());
        let (registry, _) = setup(backend);

        let consumer = Consumer::new(registry)
            .process_with(
                handler_fn(|_job: Job<CommunityNotificationJobData>| async move {
                    Outcome::Success
                }),
                fast_options(2),
            )
            .unwrap()
            .start();

        assert_eq!(consumer.worker_count(), 1);
        consumer.shutdown().await;
    }
}
