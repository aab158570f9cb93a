//! # Queue Processor
//!
//! Drains one queue's slot, running at most one mutation at a time.
//!
//! A drain cycle reads the confirmed snapshot once, then repeatedly pops the
//! slot. A task that wants the same value as the task before it is skipped
//! and resolved with the current confirmed state; any other task is handed
//! to the runner, and its result becomes the input of the next mutation.
//! When the slot is empty the cycle commits the final state as the new
//! snapshot and fires `on_success` once.
//!
//! The loop only exits after observing an empty slot under the mutex, so a
//! request that arrives while `on_success` runs starts a fresh cycle on the
//! same loop instead of being lost or racing a second loop.

use super::runner::MutationRunner;
use super::state::QueueState;
use crate::shared::error::ToggleError;
use std::future::Future;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tracing::Instrument;

pub(crate) type SuccessCallback<S> = Box<dyn Fn(&S) + Send + Sync>;

/// Shared core of one toggle queue
pub(crate) struct QueueCore<S> {
    pub(crate) label: String,
    pub(crate) state: Mutex<QueueState<S>>,
    pub(crate) runner: Box<dyn MutationRunner<S>>,
    pub(crate) on_success: Option<SuccessCallback<S>>,
}

impl<S> QueueCore<S> {
    pub(crate) fn lock_state(&self) -> MutexGuard<'_, QueueState<S>> {
        // The state is never left half-updated, so a poisoned lock is still usable.
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<S> QueueCore<S>
where
    S: Clone + Send + 'static,
{
    /// Run drain cycles until the slot stays empty
    ///
    /// The abandon guard is armed before the future is returned, so dropping
    /// the future unpolled still resets the queue.
    pub(crate) fn drain(self: Arc<Self>) -> impl Future<Output = ()> + Send + 'static {
        let span = tracing::debug_span!("toggle_drain", queue = %self.label);
        let mut guard = AbandonOnDrop {
            core: Arc::clone(&self),
            armed: true,
        };

        async move {
            loop {
                let confirmed = self.run_cycle().await;

                if let Some(on_success) = &self.on_success {
                    on_success(&confirmed);
                }

                if self.lock_state().try_go_idle() {
                    tracing::debug!("[TOGGLE] Queue idle");
                    break;
                }
                tracing::debug!("[TOGGLE] Request arrived during completion, starting another cycle");
            }
            guard.disarm();
        }
        .instrument(span)
    }

    async fn run_cycle(&self) -> S {
        let mut confirmed = self.lock_state().begin_cycle();
        let mut previous: Option<bool> = None;

        loop {
            let next = self.lock_state().take_next();
            let Some(task) = next else {
                break;
            };
            let desired = task.desired();

            if previous == Some(desired) {
                tracing::debug!("[TOGGLE] Coalescing redundant request: desired={}", desired);
                self.lock_state().stats.coalesced += 1;
                task.settle(Ok(confirmed.clone()));
                continue;
            }
            previous = Some(desired);

            tracing::debug!(
                "[TOGGLE] Running mutation: desired={}, waiters={}",
                desired,
                task.waiter_count()
            );
            match self.runner.run(confirmed.clone(), desired).await {
                Ok(state) => {
                    confirmed = state;
                    self.lock_state().stats.mutations_applied += 1;
                    task.settle(Ok(confirmed.clone()));
                }
                Err(err) => {
                    tracing::warn!("[TOGGLE] Mutation failed: desired={}, error={}", desired, err);
                    self.lock_state().stats.mutations_failed += 1;
                    task.settle(Err(ToggleError::mutation(err)));
                }
            }
        }

        self.lock_state().finish_cycle(&confirmed);
        confirmed
    }
}

/// Returns the queue to idle if the drain future is dropped mid-cycle
///
/// This happens when the runtime shuts down, when the drain is spawned onto a
/// runtime that is already gone, or when the runner panics. Without it the
/// queue would stay marked as draining and never start again.
struct AbandonOnDrop<S> {
    core: Arc<QueueCore<S>>,
    armed: bool,
}

impl<S> AbandonOnDrop<S> {
    fn disarm(&mut self) {
        self.armed = false;
    }
}

impl<S> Drop for AbandonOnDrop<S> {
    fn drop(&mut self) {
        if !self.armed {
            return;
        }
        let residual = self.core.lock_state().abandon();
        tracing::warn!(
            "[TOGGLE] Drain stopped before finishing: queue={}, dropped_pending={}",
            self.core.label,
            residual.is_some()
        );
    }
}
