//! XFSocial - Client Mutation Coordination
//!
//! XFSocial holds the client-side coordination layer of a social-networking
//! app: the part that turns rapid button taps (follow, like, mute, block,
//! repost) into an orderly sequence of server mutations and reconciles the
//! server's answers back into client state.
//!
//! # Module Structure
//!
//! - **`shared`** - Types shared across the client
//!   - Error types delivered to toggle callers
//!   - Application configuration
//!
//! - **`client`** - Mutation coordination
//!   - `toggle`: the generic toggle mutation queue
//!   - `relationship`: relationship records over XRPC, cache and manager
//!
//! # Toggle Mutation Queue
//!
//! Each toggleable entity owns a [`client::toggle::ToggleMutationQueue`].
//! It keeps at most one mutation in flight, overwrites a pending request
//! with a newer one, skips requests that repeat the previous one, chains the
//! confirmed state from one mutation into the next, and fires a completion
//! callback once the queue drains.
//!
//! # Thread Safety
//!
//! Queues may be shared across threads. Their state sits behind a mutex that
//! is never held across an `.await`; drain loops run on a tokio runtime.
//!
//! # Error Handling
//!
//! - `shared::error::ToggleError` for toggle outcomes
//! - `shared::config::ConfigError` for construction and configuration
//! - `client::relationship::ClientError` for XRPC failures

/// Shared types and data structures
pub mod shared;

/// Client-side mutation coordination
pub mod client;
