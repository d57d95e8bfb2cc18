//! Connection Registry
//!
//! Maps each user to the set of live connections they own. A user may be
//! connected from several devices at once; each connection belongs to exactly
//! one user.
//!
//! The registry says nothing about presence. Removing a user's last
//! connection only prunes the entry; online status is tracked separately by
//! [`PresenceTracker`](super::presence::PresenceTracker).

use std::collections::HashSet;
use std::sync::Arc;

use dashmap::DashMap;
use tokio::sync::mpsc;

use crate::domain::{ConnectionId, Identity, ServerEvent, UserId};

/// Outbound queue of one connection. Drained in order by the connection's
/// writer task.
pub type EventSender = mpsc::Sender<ServerEvent>;

/// A registered live connection.
#[derive(Debug)]
pub struct ConnectionHandle {
    pub connection_id: ConnectionId,
    pub identity: Identity,
    pub sender: EventSender,
}

/// Concurrent user → connections index.
#[derive(Default)]
pub struct ConnectionRegistry {
    /// Live connections by handle
    connections: DashMap<ConnectionId, Arc<ConnectionHandle>>,
    /// User ID to connection handles (one user can have many)
    user_connections: DashMap<UserId, HashSet<ConnectionId>>,
}

impl ConnectionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a connection under an identity.
    ///
    /// Returns false if the handle is already registered, in which case
    /// nothing changes.
    pub fn register(
        &self,
        identity: Identity,
        connection_id: ConnectionId,
        sender: EventSender,
    ) -> bool {
        let user_id = identity.user_id.clone();

        match self.connections.entry(connection_id) {
            dashmap::mapref::entry::Entry::Occupied(_) => return false,
            dashmap::mapref::entry::Entry::Vacant(slot) => {
                slot.insert(Arc::new(ConnectionHandle {
                    connection_id,
                    identity,
                    sender,
                }));
            }
        }

        self.user_connections
            .entry(user_id.clone())
            .or_default()
            .insert(connection_id);

        tracing::debug!(
            user_id = %user_id,
            connection_id = %connection_id,
            "Connection registered"
        );
        true
    }

    /// Remove a connection. Returns the removed handle, if it was registered.
    pub fn unregister(&self, connection_id: ConnectionId) -> Option<Arc<ConnectionHandle>> {
        let (_, handle) = self.connections.remove(&connection_id)?;
        let user_id = &handle.identity.user_id;

        if let Some(mut ids) = self.user_connections.get_mut(user_id) {
            ids.remove(&connection_id);
        }
        self.user_connections.remove_if(user_id, |_, ids| ids.is_empty());

        tracing::debug!(
            user_id = %user_id,
            connection_id = %connection_id,
            "Connection unregistered"
        );
        Some(handle)
    }

    /// Resolve users to their live connections.
    ///
    /// Users without connections contribute nothing. Duplicate users are
    /// resolved once.
    pub fn resolve<'a, I>(&self, users: I) -> Vec<Arc<ConnectionHandle>>
    where
        I: IntoIterator<Item = &'a UserId>,
    {
        let mut seen = HashSet::new();
        let mut ids = Vec::new();
        for user_id in users {
            if !seen.insert(user_id) {
                continue;
            }
            if let Some(set) = self.user_connections.get(user_id) {
                ids.extend(set.iter().copied());
            }
        }

        ids.into_iter()
            .filter_map(|id| self.connections.get(&id).map(|h| Arc::clone(h.value())))
            .collect()
    }

    /// Every live connection.
    pub fn all(&self) -> Vec<Arc<ConnectionHandle>> {
        self.connections
            .iter()
            .map(|entry| Arc::clone(entry.value()))
            .collect()
    }

    /// Connection handles owned by a user
    pub fn connections_of(&self, user_id: &UserId) -> HashSet<ConnectionId> {
        self.user_connections
            .get(user_id)
            .map(|set| set.clone())
            .unwrap_or_default()
    }

    /// Identity a connection was registered under
    pub fn identity_of(&self, connection_id: ConnectionId) -> Option<Identity> {
        self.connections
            .get(&connection_id)
            .map(|h| h.identity.clone())
    }

    /// Check if a user has at least one live connection
    pub fn is_connected(&self, user_id: &UserId) -> bool {
        self.user_connections
            .get(user_id)
            .map(|set| !set.is_empty())
            .unwrap_or(false)
    }

    pub fn connection_count(&self) -> usize {
        self.connections.len()
    }

    pub fn user_count(&self) -> usize {
        self.user_connections.len()
    }
}
