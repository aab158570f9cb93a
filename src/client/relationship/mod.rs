//! # Relationships
//!
//! Follow, block, like, repost and mute toggles built on the toggle
//! mutation queue.
//!
//! - `types.rs`: relationship kinds, subjects and record URIs
//! - `api.rs`: XRPC client performing the record mutations
//! - `runners.rs`: queue runners wrapping the client
//! - `cache.rs`: confirmed and optimistic state for the UI
//! - `manager.rs`: one queue per entity, wired to the cache
//!
//! ## Usage
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use xfsocial::client::relationship::{RelationshipCache, RelationshipClient, RelationshipKind, RelationshipManager, Subject};
//! use xfsocial::shared::AppConfig;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = AppConfig::builder()
//!     .server_url("https://pds.example.com")
//!     .repo_did("did:plc:alice")
//!     .access_token("token")
//!     .build()?;
//! let client = Arc::new(RelationshipClient::new(config));
//! let manager = RelationshipManager::new(client, Arc::new(RelationshipCache::new()))?;
//!
//! let bob = Subject::actor("did:plc:bob");
//! let handle = manager.toggle(RelationshipKind::Follow, bob.clone(), true)?;
//! assert!(manager.is_active(RelationshipKind::Follow, &bob));
//! let follow_uri = handle.await?;
//! # Ok(())
//! # }
//! ```

pub mod api;
pub mod cache;
pub mod manager;
pub mod runners;
pub mod types;

pub use api::{ClientError, RelationshipClient};
pub use cache::{CacheEntry, RelationshipCache};
pub use manager::RelationshipManager;
pub use runners::{mute_toggle_runner, record_toggle_runner};
pub use types::{EntityKey, RecordUri, RelationshipKind, Subject};
