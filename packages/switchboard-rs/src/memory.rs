//! In-memory reference backend.
//!
//! Implements the full [`QueueBackend`] contract - claim/ack/nack
//! transitions, attempt budget, dead-letter retention - without persistence
//! or networking. Suitable for local development and tests; a durable
//! deployment swaps in a broker-backed implementation of the same trait.

use std::collections::VecDeque;

use chrono::{DateTime, Utc};
use dashmap::DashMap;
use serde_json::Value;

use crate::backend::{BackendError, QueueBackend};
use crate::job::{ClaimedJob, FailureReason, JobId, JobState};
use crate::queue::QueueName;

/// Backend-side policy knobs.
#[derive(Debug, Clone, Copy)]
pub struct BackendOptions {
    /// Total delivery attempts before a retryable failure dead-letters.
    /// The first delivery counts as attempt 1.
    pub max_attempts: u32,
}

impl Default for BackendOptions {
    fn default() -> Self {
        Self { max_attempts: 3 }
    }
}

/// A job that exhausted its retry budget or failed permanently.
///
/// Dead letters are retained for operator inspection, never silently
/// dropped.
#[derive(Debug, Clone)]
pub struct DeadLetter {
    /// The failed job's id.
    pub id: JobId,
    /// Its payload, unchanged since submission.
    pub payload: Value,
    /// How many delivery attempts were made.
    pub attempts: u32,
    /// The final failure reason.
    pub reason: String,
    /// When the job was dead-lettered.
    pub dead_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
struct StoredJob {
    id: JobId,
    payload: Value,
    attempt: u32,
    created_at: DateTime<Utc>,
}

#[derive(Debug, Default)]
struct QueueState {
    waiting: VecDeque<StoredJob>,
    active: Vec<StoredJob>,
    completed: Vec<JobId>,
    dead: Vec<DeadLetter>,
}

/// In-memory [`QueueBackend`] with per-process state.
#[derive(Debug, Default)]
pub struct InMemoryBackend {
    queues: DashMap<QueueName, QueueState>,
    options: BackendOptions,
}

impl InMemoryBackend {
    /// Backend with default options.
    pub fn new() -> Self {
        Self::with_options(BackendOptions::default())
    }

    /// Backend with an explicit attempt budget.
    pub fn with_options(options: BackendOptions) -> Self {
        Self {
            queues: DashMap::new(),
            options,
        }
    }

    /// Jobs waiting to be claimed.
    pub fn waiting_count(&self, queue: QueueName) -> usize {
        self.queues.get(&queue).map_or(0, |q| q.waiting.len())
    }

    /// Jobs currently claimed by workers.
    pub fn active_count(&self, queue: QueueName) -> usize {
        self.queues.get(&queue).map_or(0, |q| q.active.len())
    }

    /// Ids of successfully settled jobs, in completion order.
    pub fn completed(&self, queue: QueueName) -> Vec<JobId> {
        self.queues
            .get(&queue)
            .map_or_else(Vec::new, |q| q.completed.clone())
    }

    /// The queue's dead letters, oldest first.
    pub fn dead_letters(&self, queue: QueueName) -> Vec<DeadLetter> {
        self.queues
            .get(&queue)
            .map_or_else(Vec::new, |q| q.dead.clone())
    }
}

#[async_trait::async_trait]
impl QueueBackend for InMemoryBackend {
    async fn submit(&self, queue: QueueName, data: Value) -> Result<JobId, BackendError> {
        let id = JobId::new();
        let job = StoredJob {
            id: id.clone(),
            payload: data,
            attempt: 0,
            created_at: Utc::now(),
        };
        self.queues.entry(queue).or_default().waiting.push_back(job);
        Ok(id)
    }

    async fn claim(&self, queue: QueueName) -> Result<Option<ClaimedJob>, BackendError> {
        let mut state = match self.queues.get_mut(&queue) {
            Some(state) => state,
            None => return Ok(None),
        };
        let Some(mut job) = state.waiting.pop_front() else {
            return Ok(None);
        };
        job.attempt += 1;
        let claimed = ClaimedJob {
            id: job.id.clone(),
            queue,
            payload: job.payload.clone(),
            attempt: job.attempt,
            created_at: job.created_at,
        };
        state.active.push(job);
        Ok(Some(claimed))
    }

    async fn ack(&self, queue: QueueName, id: &JobId) -> Result<(), BackendError> {
        let mut state = self
            .queues
            .get_mut(&queue)
            .ok_or_else(|| BackendError::UnknownJob { id: id.clone() })?;
        let position = state
            .active
            .iter()
            .position(|job| &job.id == id)
            .ok_or_else(|| BackendError::UnknownJob { id: id.clone() })?;
        let job = state.active.swap_remove(position);
        state.completed.push(job.id);
        Ok(())
    }

    async fn nack(
        &self,
        queue: QueueName,
        id: &JobId,
        reason: &FailureReason,
    ) -> Result<JobState, BackendError> {
        let mut state = self
            .queues
            .get_mut(&queue)
            .ok_or_else(|| BackendError::UnknownJob { id: id.clone() })?;
        let position = state
            .active
            .iter()
            .position(|job| &job.id == id)
            .ok_or_else(|| BackendError::UnknownJob { id: id.clone() })?;
        let job = state.active.swap_remove(position);

        if reason.is_retryable() && job.attempt < self.options.max_attempts {
            state.waiting.push_back(job);
            Ok(JobState::Retrying)
        } else {
            state.dead.push(DeadLetter {
                id: job.id,
                payload: job.payload,
                attempts: job.attempt,
                reason: reason.to_string(),
                dead_at: Utc::now(),
            });
            Ok(JobState::Dead)
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    const QUEUE: QueueName = QueueName::ProcessReputationEvent;

    #[tokio::test]
    async fn test_submit_then_claim() {
        let backend = InMemoryBackend::new();
        let id = backend.submit(QUEUE, json!({ "n": 1 })).await.unwrap();
        assert_eq!(backend.waiting_count(QUEUE), 1);

        let claimed = backend.claim(QUEUE).await.unwrap().unwrap();
        assert_eq!(claimed.id, id);
        assert_eq!(claimed.attempt, 1);
        assert_eq!(backend.waiting_count(QUEUE), 0);
        assert_eq!(backend.active_count(QUEUE), 1);
    }

    #[tokio::test]
    async fn test_claim_empty_queue() {
        let backend = InMemoryBackend::new();
        assert!(backend.claim(QUEUE).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_claims_preserve_submission_order_when_serial() {
        let backend = InMemoryBackend::new();
        let first = backend.submit(QUEUE, json!({ "n": 1 })).await.unwrap();
        let second = backend.submit(QUEUE, json!({ "n": 2 })).await.unwrap();

        assert_eq!(backend.claim(QUEUE).await.unwrap().unwrap().id, first);
        assert_eq!(backend.claim(QUEUE).await.unwrap().unwrap().id, second);
    }

    #[tokio::test]
    async fn test_ack_settles_job() {
        let backend = InMemoryBackend::new();
        let id = backend.submit(QUEUE, json!({})).await.unwrap();
        backend.claim(QUEUE).await.unwrap().unwrap();

        backend.ack(QUEUE, &id).await.unwrap();

        assert_eq!(backend.active_count(QUEUE), 0);
        assert_eq!(backend.completed(QUEUE), vec![id]);
    }

    #[tokio::test]
    async fn test_ack_unknown_job() {
        let backend = InMemoryBackend::new();
        backend.submit(QUEUE, json!({})).await.unwrap();
        backend.claim(QUEUE).await.unwrap();

        let bogus = JobId::new();
        let result = backend.ack(QUEUE, &bogus).await;
        assert!(matches!(result, Err(BackendError::UnknownJob { .. })));
    }

    #[tokio::test]
    async fn test_retryable_nack_requeues_until_budget() {
        let backend = InMemoryBackend::with_options(BackendOptions { max_attempts: 2 });
        let id = backend.submit(QUEUE, json!({})).await.unwrap();

        let first = backend.claim(QUEUE).await.unwrap().unwrap();
        assert_eq!(first.attempt, 1);
        let state = backend
            .nack(QUEUE, &id, &FailureReason::Handler("boom".into()))
            .await
            .unwrap();
        assert_eq!(state, JobState::Retrying);

        let second = backend.claim(QUEUE).await.unwrap().unwrap();
        assert_eq!(second.attempt, 2);
        let state = backend
            .nack(QUEUE, &id, &FailureReason::Handler("boom".into()))
            .await
            .unwrap();
        assert_eq!(state, JobState::Dead);

        let dead = backend.dead_letters(QUEUE);
        assert_eq!(dead.len(), 1);
        assert_eq!(dead[0].attempts, 2);
        assert!(backend.claim(QUEUE).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_non_retryable_nack_dead_letters_immediately() {
        let backend = InMemoryBackend::new();
        let id = backend.submit(QUEUE, json!({})).await.unwrap();
        backend.claim(QUEUE).await.unwrap().unwrap();

        let state = backend
            .nack(
                QUEUE,
                &id,
                &FailureReason::InvalidPayload("bad field".into()),
            )
            .await
            .unwrap();

        assert_eq!(state, JobState::Dead);
        let dead = backend.dead_letters(QUEUE);
        assert_eq!(dead.len(), 1);
        assert_eq!(dead[0].attempts, 1);
        assert!(dead[0].reason.contains("bad field"));
    }

    #[tokio::test]
    async fn test_dead_letter_keeps_payload() {
        let backend = InMemoryBackend::with_options(BackendOptions { max_attempts: 1 });
        let payload = json!({ "userId": "u1" });
        let id = backend.submit(QUEUE, payload.clone()).await.unwrap();
        backend.claim(QUEUE).await.unwrap().unwrap();
        backend
            .nack(QUEUE, &id, &FailureReason::Timeout)
            .await
            .unwrap();

        assert_eq!(backend.dead_letters(QUEUE)[0].payload, payload);
    }

    #[tokio::test]
    async fn test_queues_are_isolated() {
        let backend = InMemoryBackend::new();
        backend.submit(QUEUE, json!({})).await.unwrap();

        assert_eq!(backend.waiting_count(QueueName::SendThreadNotification), 0);
        assert!(backend
            .claim(QueueName::SendThreadNotification)
            .await
            .unwrap()
            .is_none());
    }
}
