//! Shared Error Types
//!
//! Errors surfaced by the toggle mutation queue to the callers that awaited
//! a toggle request.
//!
//! # Error Categories
//!
//! - `Mutation` - the mutation runner failed for that specific request
//! - `Abandoned` - the queue was torn down before the request settled
//!
//! # Usage
//!
//! ```rust
//! use xfsocial::shared::error::ToggleError;
//!
//! let error = ToggleError::mutation("follow record rejected");
//! assert!(error.to_string().contains("follow record rejected"));
//! ```
//!
//! # Thread Safety
//!
//! `ToggleError` is `Clone + Send + Sync`: every caller whose request was
//! folded into the same task receives its own copy of the outcome.
use std::error::Error as StdError;
use std::sync::Arc;
use thiserror::Error;

/// Boxed error produced by a mutation runner
pub type MutationError = Box<dyn StdError + Send + Sync + 'static>;

/// Errors delivered through a toggle handle
#[derive(Debug, Error, Clone)]
pub enum ToggleError {
    /// The mutation runner returned an error for this request
    #[error("Mutation failed: {message}")]
    Mutation {
        /// Human-readable error message
        message: String,
        /// The runner's original error
        source: Arc<dyn StdError + Send + Sync + 'static>,
    },

    /// The queue stopped before the request was settled
    #[error("Toggle request abandoned before it settled")]
    Abandoned,
}

impl ToggleError {
    /// Create a mutation error from anything the runner can fail with
    pub fn mutation(err: impl Into<MutationError>) -> Self {
        let source: Arc<dyn StdError + Send + Sync + 'static> = Arc::from(err.into());
        Self::Mutation {
            message: source.to_string(),
            source,
        }
    }

    /// Whether the error came from the remote mutation itself
    pub fn is_mutation(&self) -> bool {
        matches!(self, Self::Mutation { .. })
    }
}
