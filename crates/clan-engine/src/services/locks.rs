//! Per-member lock registry
//!
//! A member's record is exclusively owned by whoever holds its lock: a
//! refresh worker for the duration of an update, the eviction pass for a
//! delete. This is what keeps eviction from racing an in-flight update.

use std::sync::Arc;

use dashmap::DashMap;
use tokio::sync::Mutex;

use clan_core::value_objects::ChatUserId;

#[derive(Default)]
pub struct MemberLockMap {
    locks: DashMap<ChatUserId, Arc<Mutex<()>>>,
}

impl MemberLockMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Lock handle for one member, created on first use
    pub fn lock_for(&self, id: ChatUserId) -> Arc<Mutex<()>> {
        self.locks
            .entry(id)
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone()
    }

    /// Drop the handle after an eviction so the map does not grow forever
    pub fn forget(&self, id: ChatUserId) {
        self.locks.remove(&id);
    }
}
