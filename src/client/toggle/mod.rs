//! # Toggle Mutation Queue
//!
//! Serializes optimistic boolean mutations (follow, like, mute, block,
//! repost) against the server so the UI can fire them as fast as the user
//! taps without ever racing itself.
//!
//! ## Architecture
//!
//! - `task.rs`: one desired value plus the callers waiting on it
//! - `state.rs`: the one-entry slot, drain flag and confirmed snapshot
//! - `runner.rs`: the caller-supplied network mutation
//! - `processor.rs`: the drain loop
//!
//! ## Guarantees
//!
//! - At most one mutation is in flight per queue.
//! - Each mutation receives the state confirmed by the one before it.
//! - A pending request is overwritten by a newer one; a request equal to the
//!   one just processed is skipped without touching the network.
//! - A failed mutation only fails its own request; the drain continues.
//! - `on_success` fires once per drain cycle with the final confirmed state.
//! - Every handle settles: skipped requests resolve with the current confirmed
//!   state, overwritten requests share the outcome of their replacement.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use xfsocial::client::toggle::ToggleMutationQueue;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let queue = ToggleMutationQueue::builder()
//!     .label("follow:did:plc:alice")
//!     .initial_state(None::<String>)
//!     .run_mutation(|_previous: Option<String>, follow: bool| async move {
//!         Ok::<_, std::io::Error>(follow.then(|| "at://did:plc:me/app.bsky.graph.follow/1".to_string()))
//!     })
//!     .on_success(|uri: &Option<String>| println!("following: {:?}", uri))
//!     .build()?;
//!
//! let confirmed = queue.queue_toggle(true).await?;
//! # Ok(())
//! # }
//! ```

pub mod runner;
pub mod state;
pub mod task;
mod processor;

pub use runner::{MutationFuture, MutationRunner};
pub use state::QueueStats;
pub use task::ToggleHandle;

use crate::shared::config::ConfigError;
use processor::{QueueCore, SuccessCallback};
use state::QueueState;
use std::sync::{Arc, Mutex};
use task::ToggleTask;
use tokio::runtime::Handle;

/// Coalescing queue for one toggleable entity
///
/// Cloning yields another handle to the same queue.
pub struct ToggleMutationQueue<S> {
    core: Arc<QueueCore<S>>,
    runtime: Handle,
}

impl<S> Clone for ToggleMutationQueue<S> {
    fn clone(&self) -> Self {
        Self {
            core: Arc::clone(&self.core),
            runtime: self.runtime.clone(),
        }
    }
}

impl<S> std::fmt::Debug for ToggleMutationQueue<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ToggleMutationQueue")
            .field("label", &self.core.label)
            .field("draining", &self.core.lock_state().is_draining())
            .finish()
    }
}

impl<S> ToggleMutationQueue<S>
where
    S: Clone + Send + 'static,
{
    /// Create a builder
    pub fn builder() -> ToggleMutationQueueBuilder<S> {
        ToggleMutationQueueBuilder::default()
    }

    /// Request that the entity end up in `desired` state
    ///
    /// Never blocks and never fails here; the outcome arrives through the
    /// returned handle.
    pub fn queue_toggle(&self, desired: bool) -> ToggleHandle<S> {
        let (task, handle) = ToggleTask::new(desired);
        let start_drain = self.core.lock_state().enqueue(task);

        if start_drain {
            tracing::debug!("[TOGGLE] Starting drain: queue={}, desired={}", self.core.label, desired);
            let core = Arc::clone(&self.core);
            self.runtime.spawn(core.drain());
        } else {
            tracing::debug!("[TOGGLE] Queued behind active drain: queue={}, desired={}", self.core.label, desired);
        }
        handle
    }

    /// Current confirmed snapshot
    ///
    /// Updated at the end of every drain cycle, so it lags while a drain is running.
    pub fn confirmed_state(&self) -> S {
        self.core.lock_state().snapshot().clone()
    }

    /// Replace the confirmed snapshot, e.g. after refetching from the server
    ///
    /// Read at the start of the next drain cycle. A drain already running
    /// overwrites it with its own final state.
    pub fn set_confirmed_state(&self, state: S) {
        self.core.lock_state().set_snapshot(state);
    }
}

impl<S> ToggleMutationQueue<S> {
    /// Label used in log output
    pub fn label(&self) -> &str {
        &self.core.label
    }

    /// Whether a drain loop is currently running
    pub fn is_draining(&self) -> bool {
        self.core.lock_state().is_draining()
    }

    /// Desired value of the task being processed, if any
    pub fn active_desired(&self) -> Option<bool> {
        self.core.lock_state().active_desired()
    }

    /// Desired value waiting in the slot, if any
    pub fn queued_desired(&self) -> Option<bool> {
        self.core.lock_state().queued_desired()
    }

    /// Counters for this queue since it was built
    pub fn stats(&self) -> QueueStats {
        self.core.lock_state().stats
    }
}

/// Builder for [`ToggleMutationQueue`]
pub struct ToggleMutationQueueBuilder<S> {
    label: Option<String>,
    initial_state: Option<S>,
    runner: Option<Box<dyn MutationRunner<S>>>,
    on_success: Option<SuccessCallback<S>>,
    runtime: Option<Handle>,
}

impl<S> Default for ToggleMutationQueueBuilder<S> {
    fn default() -> Self {
        Self {
            label: None,
            initial_state: None,
            runner: None,
            on_success: None,
            runtime: None,
        }
    }
}

impl<S> ToggleMutationQueueBuilder<S>
where
    S: Clone + Send + 'static,
{
    /// Name the entity in log output
    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Confirmed state the first drain starts from
    pub fn initial_state(mut self, state: S) -> Self {
        self.initial_state = Some(state);
        self
    }

    /// The network mutation
    pub fn run_mutation(mut self, runner: impl MutationRunner<S>) -> Self {
        self.runner = Some(Box::new(runner));
        self
    }

    /// Called once per drain cycle with the final confirmed state
    pub fn on_success(mut self, callback: impl Fn(&S) + Send + Sync + 'static) -> Self {
        self.on_success = Some(Box::new(callback));
        self
    }

    /// Runtime that runs drain loops, defaults to the current one
    pub fn runtime(mut self, runtime: Handle) -> Self {
        self.runtime = Some(runtime);
        self
    }

    /// Build the queue
    pub fn build(self) -> Result<ToggleMutationQueue<S>, ConfigError> {
        let initial_state = self
            .initial_state
            .ok_or(ConfigError::MissingValue("initial_state"))?;
        let runner = self.runner.ok_or(ConfigError::MissingValue("run_mutation"))?;
        let runtime = match self.runtime {
            Some(runtime) => runtime,
            None => Handle::try_current().map_err(|_| ConfigError::MissingValue("runtime"))?,
        };

        let core = QueueCore {
            label: self.label.unwrap_or_else(|| "toggle".to_string()),
            state: Mutex::new(QueueState::new(initial_state)),
            runner,
            on_success: self.on_success,
        };

        Ok(ToggleMutationQueue {
            core: Arc::new(core),
            runtime,
        })
    }
}
