//! # Relationship Manager
//!
//! Owns one toggle queue per relationship entity. A queue is created the
//! first time an entity is toggled and reused for the rest of the session,
//! so rapid taps on the same button always land in the same queue.

use super::api::RelationshipClient;
use super::cache::RelationshipCache;
use super::runners::record_toggle_runner;
use super::types::{EntityKey, RecordUri, RelationshipKind, Subject};
use crate::client::toggle::{ToggleHandle, ToggleMutationQueue};
use crate::shared::config::ConfigError;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};
use tokio::runtime::Handle;

type RecordQueue = ToggleMutationQueue<Option<RecordUri>>;

/// Coordinates optimistic relationship toggles
#[derive(Debug)]
pub struct RelationshipManager {
    client: Arc<RelationshipClient>,
    cache: Arc<RelationshipCache>,
    queues: Mutex<HashMap<EntityKey, RecordQueue>>,
    runtime: Handle,
}

impl RelationshipManager {
    /// Create a manager on the current tokio runtime
    pub fn new(
        client: Arc<RelationshipClient>,
        cache: Arc<RelationshipCache>,
    ) -> Result<Self, ConfigError> {
        let runtime = Handle::try_current().map_err(|_| ConfigError::MissingValue("runtime"))?;
        Ok(Self::with_runtime(client, cache, runtime))
    }

    pub fn with_runtime(
        client: Arc<RelationshipClient>,
        cache: Arc<RelationshipCache>,
        runtime: Handle,
    ) -> Self {
        Self {
            client,
            cache,
            queues: Mutex::new(HashMap::new()),
            runtime,
        }
    }

    pub fn cache(&self) -> &Arc<RelationshipCache> {
        &self.cache
    }

    /// Optimistically set a relationship and queue the server mutation
    ///
    /// The pending value is written before the request is queued. If the
    /// request lands after a drain took its last task but before that drain
    /// commits, the commit clears the pending value and `is_active` shows
    /// the older confirmed state until the follow-up cycle commits.
    pub fn toggle(
        &self,
        kind: RelationshipKind,
        subject: Subject,
        desired: bool,
    ) -> Result<ToggleHandle<Option<RecordUri>>, ConfigError> {
        let key = EntityKey::new(kind, &subject);
        let queue = self.queue_for(&key, kind, subject)?;

        self.cache.apply_pending(key.clone(), desired);
        tracing::debug!("[RELATIONSHIP] Toggle requested: {} -> {}", key, desired);
        Ok(queue.queue_toggle(desired))
    }

    /// Value the UI should display for an entity
    pub fn is_active(&self, kind: RelationshipKind, subject: &Subject) -> bool {
        self.cache.is_active(&EntityKey::new(kind, subject))
    }

    /// Store state refetched from the server
    ///
    /// An existing queue picks it up at the start of its next drain.
    pub fn refresh(&self, kind: RelationshipKind, subject: &Subject, confirmed: Option<RecordUri>) {
        let key = EntityKey::new(kind, subject);
        if let Some(queue) = self.lock_queues().get(&key) {
            queue.set_confirmed_state(confirmed.clone());
        }
        self.cache.seed(key, confirmed);
    }

    /// Drop the queue for an entity unless a drain is running
    ///
    /// Returns true when a queue was removed. Cached state is kept, so a
    /// later toggle builds a fresh queue from the confirmed value.
    pub fn forget(&self, kind: RelationshipKind, subject: &Subject) -> bool {
        let key = EntityKey::new(kind, subject);
        let mut queues = self.lock_queues();
        match queues.get(&key) {
            Some(queue) if !queue.is_draining() => {
                queues.remove(&key);
                tracing::debug!("[RELATIONSHIP] Dropped idle queue: {}", key);
                true
            }
            _ => false,
        }
    }

    /// Number of entities that have a queue
    pub fn queue_count(&self) -> usize {
        self.lock_queues().len()
    }

    /// Number of queues with a drain in progress
    pub fn draining_count(&self) -> usize {
        self.lock_queues().values().filter(|queue| queue.is_draining()).count()
    }

    fn lock_queues(&self) -> std::sync::MutexGuard<'_, HashMap<EntityKey, RecordQueue>> {
        self.queues.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn queue_for(
        &self,
        key: &EntityKey,
        kind: RelationshipKind,
        subject: Subject,
    ) -> Result<RecordQueue, ConfigError> {
        let mut queues = self.lock_queues();
        if let Some(queue) = queues.get(key) {
            return Ok(queue.clone());
        }

        let cache = Arc::clone(&self.cache);
        let commit_key = key.clone();
        let queue = ToggleMutationQueue::builder()
            .label(key.to_string())
            .initial_state(self.cache.confirmed(key))
            .run_mutation(record_toggle_runner(Arc::clone(&self.client), kind, subject))
            .on_success(move |confirmed: &Option<RecordUri>| {
                tracing::debug!("[RELATIONSHIP] Committing {}: {:?}", commit_key, confirmed);
                cache.commit(&commit_key, confirmed.clone());
            })
            .runtime(self.runtime.clone())
            .build()?;

        queues.insert(key.clone(), queue.clone());
        Ok(queue)
    }
}
