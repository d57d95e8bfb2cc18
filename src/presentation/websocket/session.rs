//! WebSocket Session Management
//!
//! Per-connection lifecycle: `Connecting → Authenticated → Active → Closed`.
//! `Closed` is terminal and reachable from every state.

use std::time::Instant;

use crate::application::realtime::GatewayError;
use crate::domain::{ConnectionId, Identity};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    Connecting,
    Authenticated,
    Active,
    Closed,
}

impl ConnectionState {
    pub fn as_str(&self) -> &'static str {
        match self {
            ConnectionState::Connecting => "connecting",
            ConnectionState::Authenticated => "authenticated",
            ConnectionState::Active => "active",
            ConnectionState::Closed => "closed",
        }
    }
}

/// WebSocket session state
#[derive(Debug)]
pub struct SessionState {
    pub connection_id: ConnectionId,
    identity: Option<Identity>,
    state: ConnectionState,
    pub opened_at: Instant,
}

impl SessionState {
    pub fn new() -> Self {
        Self {
            connection_id: ConnectionId::new(),
            identity: None,
            state: ConnectionState::Connecting,
            opened_at: Instant::now(),
        }
    }

    pub fn state(&self) -> ConnectionState {
        self.state
    }

    pub fn identity(&self) -> Option<&Identity> {
        self.identity.as_ref()
    }

    /// Attach the identity resolved by the session gate.
    pub fn authenticate(&mut self, identity: Identity) -> Result<(), GatewayError> {
        self.transition(ConnectionState::Connecting, ConnectionState::Authenticated)?;
        self.identity = Some(identity);
        Ok(())
    }

    /// Mark the session active once it is registered.
    pub fn activate(&mut self) -> Result<(), GatewayError> {
        self.transition(ConnectionState::Authenticated, ConnectionState::Active)
    }

    /// Move to `Closed`. Returns true only on the first call, so cleanup runs
    /// once.
    pub fn close(&mut self) -> bool {
        if self.state == ConnectionState::Closed {
            return false;
        }
        self.state = ConnectionState::Closed;
        true
    }

    fn transition(
        &mut self,
        from: ConnectionState,
        to: ConnectionState,
    ) -> Result<(), GatewayError> {
        if self.state != from {
            return Err(GatewayError::InvalidTransition {
                from: self.state.as_str(),
                to: to.as_str(),
            });
        }
        self.state = to;
        Ok(())
    }
}

impl Default for SessionState {
    fn default() -> Self {
        Self::new()
    }
}
