//! # Mutation Runner
//!
//! The seam between the queue and the network. A runner receives the last
//! confirmed state and the desired toggle value, performs the remote
//! mutation, and returns the new confirmed state.
//!
//! Any `Fn(S, bool) -> impl Future<Output = Result<S, E>>` closure is a
//! runner, so most callers never name this trait.

use crate::shared::error::MutationError;
use futures_util::future::BoxFuture;
use std::future::Future;

/// Future produced by a mutation runner
pub type MutationFuture<S> = BoxFuture<'static, Result<S, MutationError>>;

/// Performs one remote toggle mutation
pub trait MutationRunner<S>: Send + Sync + 'static {
    /// Apply `desired` on top of the confirmed `previous` state
    fn run(&self, previous: S, desired: bool) -> MutationFuture<S>;
}

impl<S, F, Fut, E> MutationRunner<S> for F
where
    S: Send + 'static,
    F: Fn(S, bool) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<S, E>> + Send + 'static,
    E: Into<MutationError>,
{
    fn run(&self, previous: S, desired: bool) -> MutationFuture<S> {
        let fut = self(previous, desired);
        Box::pin(async move { fut.await.map_err(Into::into) })
    }
}
