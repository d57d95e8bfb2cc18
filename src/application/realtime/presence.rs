//! Presence Tracker
//!
//! Set of users currently marked online. Presence is driven by explicit
//! client signals (`USER_ONLINE` / `USER_OFFLINE`) plus a fallback when a
//! user's last connection closes; it is not derived from the registry.

use std::collections::BTreeSet;

use parking_lot::RwLock;

use crate::domain::UserId;

#[derive(Default)]
pub struct PresenceTracker {
    online: RwLock<BTreeSet<UserId>>,
}

impl PresenceTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark a user online and return the updated snapshot.
    pub fn mark_online(&self, user_id: &UserId) -> Vec<UserId> {
        let mut online = self.online.write();
        online.insert(user_id.clone());
        online.iter().cloned().collect()
    }

    /// Mark a user offline and return the updated snapshot.
    pub fn mark_offline(&self, user_id: &UserId) -> Vec<UserId> {
        let mut online = self.online.write();
        online.remove(user_id);
        online.iter().cloned().collect()
    }

    pub fn is_online(&self, user_id: &UserId) -> bool {
        self.online.read().contains(user_id)
    }

    /// Online users, sorted by id.
    pub fn snapshot(&self) -> Vec<UserId> {
        self.online.read().iter().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.online.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.online.read().is_empty()
    }
}
