//! # Relationship Cache
//!
//! Client-side view of relationship state. Each entity carries the
//! server-confirmed record URI plus an optional optimistic value shown
//! while a toggle is still draining.
//!
//! The toggle queue's completion callback commits into this cache, so the
//! lock is a `std::sync::RwLock`: callbacks are synchronous and the critical
//! sections never await.

use super::types::{EntityKey, RecordUri};
use std::collections::HashMap;
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

/// Cached state of one relationship
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CacheEntry {
    /// Record URI confirmed by the server, `None` when the relationship is off
    pub confirmed: Option<RecordUri>,
    /// Value the user asked for that the server has not confirmed yet
    pub pending: Option<bool>,
}

impl CacheEntry {
    /// What the UI should display
    pub fn is_active(&self) -> bool {
        self.pending.unwrap_or(self.confirmed.is_some())
    }
}

/// Shared relationship cache
#[derive(Debug, Default)]
pub struct RelationshipCache {
    entries: RwLock<HashMap<EntityKey, CacheEntry>>,
}

impl RelationshipCache {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> RwLockReadGuard<'_, HashMap<EntityKey, CacheEntry>> {
        self.entries.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, HashMap<EntityKey, CacheEntry>> {
        self.entries.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Store state fetched from the server (e.g. a profile's viewer state)
    pub fn seed(&self, key: EntityKey, confirmed: Option<RecordUri>) {
        self.write().entry(key).or_default().confirmed = confirmed;
    }

    /// Record an optimistic value
    pub fn apply_pending(&self, key: EntityKey, desired: bool) {
        self.write().entry(key).or_default().pending = Some(desired);
    }

    /// Store the server-confirmed state and drop the optimistic value
    pub fn commit(&self, key: &EntityKey, confirmed: Option<RecordUri>) {
        let mut entries = self.write();
        let entry = entries.entry(key.clone()).or_default();
        entry.confirmed = confirmed;
        entry.pending = None;
    }

    pub fn get(&self, key: &EntityKey) -> Option<CacheEntry> {
        self.read().get(key).cloned()
    }

    pub fn confirmed(&self, key: &EntityKey) -> Option<RecordUri> {
        self.read().get(key).and_then(|entry| entry.confirmed.clone())
    }

    /// Value the UI should display, `false` for unknown entities
    pub fn is_active(&self, key: &EntityKey) -> bool {
        self.read().get(key).map(CacheEntry::is_active).unwrap_or(false)
    }

    /// Number of entities with an unconfirmed optimistic value
    pub fn count_pending(&self) -> usize {
        self.read().values().filter(|entry| entry.pending.is_some()).count()
    }

    pub fn clear(&self) {
        self.write().clear();
    }
}
