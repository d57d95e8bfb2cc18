//! WebSocket Gateway
//!
//! Service object shared by every connection task. Owns the connection
//! registry and presence tracker and wires them to the router, the session
//! gate and the ingest path. Constructed once at startup and injected through
//! `AppState`; tests build isolated instances.

use std::sync::Arc;

use crate::application::realtime::{
    ConnectionRegistry, DeliveryReport, EventRouter, EventSender, GatewayError, IdentityVerifier,
    IngestReceipt, MessageIngest, PresenceTracker, SendMessage, SessionGate,
};
use crate::domain::events::ChatPayload;
use crate::domain::{
    ChatId, ChatRepository, ConnectionId, Identity, MessageRepository, ServerEvent, UserId,
    UserRepository,
};
use crate::infrastructure::metrics;

use super::messages::ClientEvent;
use super::session::{ConnectionState, SessionState};

/// Tunables the gateway needs from settings.
#[derive(Debug, Clone, Copy)]
pub struct GatewayConfig {
    pub outbound_buffer: usize,
    pub max_content_length: usize,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            outbound_buffer: 256,
            max_content_length: 4000,
        }
    }
}

/// Identity and handle of the connection an event arrived on.
#[derive(Debug, Clone)]
pub struct ClientContext {
    pub connection_id: ConnectionId,
    pub identity: Identity,
}

/// Realtime gateway managing all connections
pub struct Gateway {
    registry: Arc<ConnectionRegistry>,
    presence: PresenceTracker,
    router: Arc<EventRouter>,
    gate: SessionGate,
    ingest: MessageIngest,
    users: Arc<dyn UserRepository>,
    config: GatewayConfig,
}

impl Gateway {
    pub fn new(
        verifier: Arc<dyn IdentityVerifier>,
        users: Arc<dyn UserRepository>,
        chats: Arc<dyn ChatRepository>,
        messages: Arc<dyn MessageRepository>,
        config: GatewayConfig,
    ) -> Self {
        let registry = Arc::new(ConnectionRegistry::new());
        let router = Arc::new(EventRouter::new(Arc::clone(&registry)));
        let ingest = MessageIngest::new(
            Arc::clone(&router),
            chats,
            messages,
            config.max_content_length,
        );

        Self {
            registry,
            presence: PresenceTracker::new(),
            router,
            gate: SessionGate::new(verifier),
            ingest,
            users,
            config,
        }
    }

    /// Capacity for a new connection's outbound queue
    pub fn outbound_buffer(&self) -> usize {
        self.config.outbound_buffer
    }

    /// Run the session gate for a connection attempt.
    pub async fn admit(&self, credential: Option<&str>) -> Result<Identity, GatewayError> {
        self.gate.admit(credential).await
    }

    /// Register an authenticated session and make it active.
    pub fn connect(
        &self,
        session: &mut SessionState,
        sender: EventSender,
    ) -> Result<ClientContext, GatewayError> {
        let identity = match (session.state(), session.identity()) {
            (ConnectionState::Authenticated, Some(identity)) => identity.clone(),
            (state, _) => {
                return Err(GatewayError::InvalidTransition {
                    from: state.as_str(),
                    to: ConnectionState::Active.as_str(),
                })
            }
        };

        let connection_id = session.connection_id;
        if !self.registry.register(identity.clone(), connection_id, sender) {
            return Err(GatewayError::InvalidTransition {
                from: session.state().as_str(),
                to: ConnectionState::Active.as_str(),
            });
        }
        session.activate()?;
        self.update_gauges();

        tracing::info!(
            user_id = %identity.user_id,
            connection_id = %connection_id,
            devices = self.registry.connections_of(&identity.user_id).len(),
            "User connected"
        );

        Ok(ClientContext {
            connection_id,
            identity,
        })
    }

    /// Tear down a connection.
    ///
    /// When this was the user's last connection the user is marked offline
    /// and the new snapshot goes to every remaining connection, since the
    /// audience is unknown at close time.
    pub fn disconnect(&self, connection_id: ConnectionId) -> Option<DeliveryReport> {
        let handle = self.registry.unregister(connection_id)?;
        let user_id = &handle.identity.user_id;

        let report = if self.registry.is_connected(user_id) {
            None
        } else {
            let snapshot = self.presence.mark_offline(user_id);
            Some(self.router.broadcast(&ServerEvent::OnlineUsers(snapshot)))
        };
        self.update_gauges();

        tracing::info!(
            user_id = %user_id,
            connection_id = %connection_id,
            "User disconnected"
        );
        report
    }

    /// Dispatch one event received from a client.
    pub async fn handle_event(
        &self,
        client: &ClientContext,
        event: ClientEvent,
    ) -> Result<(), GatewayError> {
        match event {
            ClientEvent::NewMessage(request) => {
                self.send_message(
                    &client.identity,
                    SendMessage {
                        chat_id: request.chat_id,
                        content: request.message,
                        attachments: Vec::new(),
                    },
                )
                .await?;
            }

            ClientEvent::StartTyping(request) => {
                let event = ServerEvent::StartTyping(ChatPayload {
                    chat_id: ChatId::new(request.chat_id),
                });
                self.router
                    .deliver_except(&event, &request.members, client.connection_id);
            }

            ClientEvent::StopTyping(request) => {
                let event = ServerEvent::StopTyping(ChatPayload {
                    chat_id: ChatId::new(request.chat_id),
                });
                self.router
                    .deliver_except(&event, &request.members, client.connection_id);
            }

            ClientEvent::UserOnline(request) => {
                if request.user_id.as_ref().is_some_and(|id| id != &client.identity.user_id) {
                    tracing::debug!(
                        connection_id = %client.connection_id,
                        "Ignoring userId in USER_ONLINE that does not match the connection"
                    );
                }
                self.set_online(&client.identity.user_id, &request.members);
            }

            ClientEvent::UserOffline(request) => {
                self.set_offline(&client.identity.user_id, &request.members);
            }
        }

        Ok(())
    }

    /// Mark a user online and send the full snapshot to `audience`.
    pub fn set_online(&self, user_id: &UserId, audience: &[UserId]) -> DeliveryReport {
        let snapshot = self.presence.mark_online(user_id);
        self.update_gauges();
        self.router.deliver(&ServerEvent::OnlineUsers(snapshot), audience)
    }

    /// Mark a user offline and send the full snapshot to `audience`.
    pub fn set_offline(&self, user_id: &UserId, audience: &[UserId]) -> DeliveryReport {
        let snapshot = self.presence.mark_offline(user_id);
        self.update_gauges();
        self.router.deliver(&ServerEvent::OnlineUsers(snapshot), audience)
    }

    /// Fan a message out to its chat, then store it.
    pub async fn send_message(
        &self,
        sender: &Identity,
        request: SendMessage,
    ) -> Result<IngestReceipt, GatewayError> {
        self.ingest.ingest(sender, request).await
    }

    /// Send a message on behalf of a user who may not be connected.
    pub async fn send_message_as(
        &self,
        sender_id: &UserId,
        request: SendMessage,
    ) -> Result<IngestReceipt, GatewayError> {
        let sender = self
            .users
            .find_by_id(sender_id)
            .await?
            .map(Identity::from)
            .ok_or_else(|| GatewayError::InvalidEvent(format!("Unknown sender {}", sender_id)))?;

        self.ingest.ingest(&sender, request).await
    }

    /// Server-initiated event to a set of users.
    pub fn emit(&self, event: &ServerEvent, users: &[UserId]) -> DeliveryReport {
        self.router.deliver(event, users)
    }

    pub fn online_users(&self) -> Vec<UserId> {
        self.presence.snapshot()
    }

    pub fn is_online(&self, user_id: &UserId) -> bool {
        self.presence.is_online(user_id)
    }

    pub fn connection_count(&self) -> usize {
        self.registry.connection_count()
    }

    pub fn registry(&self) -> &ConnectionRegistry {
        &self.registry
    }

    fn update_gauges(&self) {
        metrics::set_gateway_gauges(self.registry.connection_count(), self.presence.len());
    }
}
