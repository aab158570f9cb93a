//! # Queue State
//!
//! The mutable part of one toggle queue: a one-entry slot for the next
//! request, the drain flag, the confirmed-state snapshot the next drain
//! starts from, and counters.
//!
//! Every method runs under the queue's mutex and never awaits.

use super::task::ToggleTask;
use serde::Serialize;

/// Counters describing what a queue has done so far
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct QueueStats {
    /// Completed drain cycles (equals the number of `on_success` calls)
    pub drains: u64,
    /// Runner calls that succeeded
    pub mutations_applied: u64,
    /// Runner calls that failed
    pub mutations_failed: u64,
    /// Tasks skipped because the previous task wanted the same value
    pub coalesced: u64,
    /// Tasks overwritten in the slot before they started
    pub superseded: u64,
    /// Drains torn down before finishing
    pub abandoned: u64,
}

#[derive(Debug)]
pub(crate) struct QueueState<S> {
    draining: bool,
    active: Option<bool>,
    queued: Option<ToggleTask<S>>,
    snapshot: S,
    pub(crate) stats: QueueStats,
}

impl<S> QueueState<S> {
    /// Pop the queued task into the active position
    pub(crate) fn take_next(&mut self) -> Option<ToggleTask<S>> {
        let task = self.queued.take()?;
        self.active = Some(task.desired());
        Some(task)
    }

    /// Go idle if nothing arrived while the completion callback ran
    pub(crate) fn try_go_idle(&mut self) -> bool {
        if self.queued.is_some() {
            return false;
        }
        self.draining = false;
        self.active = None;
        true
    }

    /// Reset after the drain loop stopped without finishing
    ///
    /// The residual task is dropped, which resolves its handles to
    /// `ToggleError::Abandoned`.
    pub(crate) fn abandon(&mut self) -> Option<ToggleTask<S>> {
        self.stats.abandoned += 1;
        self.draining = false;
        self.active = None;
        self.queued.take()
    }

    pub(crate) fn is_draining(&self) -> bool {
        self.draining
    }

    pub(crate) fn active_desired(&self) -> Option<bool> {
        self.active
    }

    pub(crate) fn queued_desired(&self) -> Option<bool> {
        self.queued.as_ref().map(ToggleTask::desired)
    }

    pub(crate) fn snapshot(&self) -> &S {
        &self.snapshot
    }
}

impl<S: Clone> QueueState<S> {
    pub(crate) fn new(snapshot: S) -> Self {
        Self {
            draining: false,
            active: None,
            queued: None,
            snapshot,
            stats: QueueStats::default(),
        }
    }

    /// Put a task in the slot, returning true when the caller must start a drain
    pub(crate) fn enqueue(&mut self, mut task: ToggleTask<S>) -> bool {
        if let Some(superseded) = self.queued.take() {
            self.stats.superseded += 1;
            task.absorb(superseded);
        }
        self.queued = Some(task);
        if self.draining {
            false
        } else {
            self.draining = true;
            true
        }
    }

    /// Snapshot the confirmed state at the start of a drain cycle
    pub(crate) fn begin_cycle(&self) -> S {
        self.snapshot.clone()
    }

    /// Record the final state of a drain cycle as the next snapshot
    pub(crate) fn finish_cycle(&mut self, confirmed: &S) {
        self.snapshot = confirmed.clone();
        self.stats.drains += 1;
    }

    pub(crate) fn set_snapshot(&mut self, snapshot: S) {
        self.snapshot = snapshot;
    }
}
