//! # Toggle Tasks
//!
//! A task is one desired toggle value plus the callers waiting to hear how
//! it ended. Each caller holds a [`ToggleHandle`] backed by a oneshot
//! channel; the task keeps the sending halves.

use crate::shared::error::ToggleError;
use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};
use tokio::sync::oneshot;

type Settlement<S> = Result<S, ToggleError>;

/// One queued toggle request
#[derive(Debug)]
pub(crate) struct ToggleTask<S> {
    desired: bool,
    waiters: Vec<oneshot::Sender<Settlement<S>>>,
}

impl<S> ToggleTask<S> {
    pub(crate) fn desired(&self) -> bool {
        self.desired
    }

    pub(crate) fn waiter_count(&self) -> usize {
        self.waiters.len()
    }
}

impl<S: Clone> ToggleTask<S> {
    /// Create a task and the handle for the caller that requested it
    pub(crate) fn new(desired: bool) -> (Self, ToggleHandle<S>) {
        let (tx, rx) = oneshot::channel();
        let task = Self {
            desired,
            waiters: vec![tx],
        };
        (task, ToggleHandle { rx })
    }

    /// Take over the waiters of a task this one replaced in the slot
    pub(crate) fn absorb(&mut self, superseded: ToggleTask<S>) {
        self.waiters.extend(superseded.waiters);
    }

    /// Deliver the outcome to every waiter, returning how many were still listening
    pub(crate) fn settle(self, outcome: Settlement<S>) -> usize {
        let mut delivered = 0;
        for waiter in self.waiters {
            if waiter.send(outcome.clone()).is_ok() {
                delivered += 1;
            }
        }
        delivered
    }
}

/// Future returned by `queue_toggle`, resolving once the request settles
///
/// Resolves to the confirmed state after the request (or the request that
/// superseded it) was applied, or to the error that ended it.
#[derive(Debug)]
#[must_use = "dropping the handle discards the outcome, the toggle is still applied"]
pub struct ToggleHandle<S> {
    rx: oneshot::Receiver<Settlement<S>>,
}

impl<S> Future for ToggleHandle<S> {
    type Output = Settlement<S>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        Pin::new(&mut self.rx)
            .poll(cx)
            .map(|received| received.unwrap_or(Err(ToggleError::Abandoned)))
    }
}
