//! Client Module
//!
//! Client-side coordination of remote mutations.
//!
//! - **`toggle`** - coalescing queue serializing boolean mutations per entity
//! - **`relationship`** - follow/block/like/repost/mute toggles on top of it

pub mod relationship;
pub mod toggle;

pub use relationship::{RelationshipCache, RelationshipClient, RelationshipKind, RelationshipManager, Subject};
pub use toggle::{MutationRunner, QueueStats, ToggleHandle, ToggleMutationQueue};
