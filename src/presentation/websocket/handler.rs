//! WebSocket Connection Handler
//!
//! Runs the session gate before upgrading, then drives one connection: a
//! reader loop dispatching client events and a writer task draining the
//! connection's outbound queue in order.

use std::sync::Arc;
use std::time::Duration;

use axum::{
    body::Bytes,
    extract::{
        ws::{Message, WebSocket},
        State, WebSocketUpgrade,
    },
    response::Response,
};
use axum_extra::{
    extract::cookie::CookieJar,
    headers::{authorization::Bearer, Authorization},
    typed_header::TypedHeaderRejection,
    TypedHeader,
};
use futures::{SinkExt, StreamExt};
use tokio::sync::mpsc;
use tokio::time::interval;

use super::gateway::{ClientContext, Gateway};
use super::messages::ClientEvent;
use super::session::SessionState;
use crate::domain::ServerEvent;
use crate::shared::error::AppError;
use crate::startup::AppState;

/// Cookie the account service stores the session token in
pub const AUTH_COOKIE: &str = "jwt";

/// WebSocket upgrade handler.
///
/// A connection attempt that fails the session gate is answered with an
/// error status and never upgraded. The `jwt` cookie wins; a bearer header is
/// only consulted without it, and a non-bearer `Authorization` header is
/// ignored.
pub async fn ws_handler(
    ws: WebSocketUpgrade,
    State(state): State<AppState>,
    jar: CookieJar,
    bearer: Result<TypedHeader<Authorization<Bearer>>, TypedHeaderRejection>,
) -> Result<Response, AppError> {
    let credential = jar
        .get(AUTH_COOKIE)
        .map(|cookie| cookie.value().to_string())
        .or_else(|| {
            bearer
                .ok()
                .map(|TypedHeader(Authorization(token))| token.token().to_string())
        });

    let mut session = SessionState::new();
    let identity = state
        .gateway
        .admit(credential.as_deref())
        .await
        .inspect_err(|e| {
            tracing::debug!(
                connection_id = %session.connection_id,
                error = %e,
                "Connection rejected"
            );
        })?;
    session.authenticate(identity)?;

    let max_message_size = state.settings.websocket.max_message_size;
    Ok(ws
        .max_message_size(max_message_size)
        .on_upgrade(move |socket| handle_socket(socket, state, session)))
}

/// Handle individual WebSocket connection
async fn handle_socket(socket: WebSocket, state: AppState, mut session: SessionState) {
    let gateway = Arc::clone(&state.gateway);
    let (mut sink, mut stream) = socket.split();
    let (tx, mut rx) = mpsc::channel::<ServerEvent>(gateway.outbound_buffer());

    let client = match gateway.connect(&mut session, tx) {
        Ok(client) => client,
        Err(e) => {
            tracing::error!(
                connection_id = %session.connection_id,
                error = %e,
                "Failed to register connection"
            );
            let _ = sink.close().await;
            return;
        }
    };
    let connection_id = client.connection_id;

    // Forward queued events to the socket, with keepalive pings
    let ping_every = Duration::from_secs(state.settings.websocket.ping_interval_secs);
    let mut writer = tokio::spawn(async move {
        let mut ping = interval(ping_every);
        ping.tick().await; // Skip first immediate tick

        loop {
            tokio::select! {
                event = rx.recv() => {
                    let Some(event) = event else { break };
                    let text = match serde_json::to_string(&event) {
                        Ok(t) => t,
                        Err(e) => {
                            tracing::error!("Failed to serialize event: {}", e);
                            continue;
                        }
                    };
                    if sink.send(Message::Text(text.into())).await.is_err() {
                        break;
                    }
                }
                _ = ping.tick() => {
                    if sink.send(Message::Ping(Bytes::new())).await.is_err() {
                        break;
                    }
                }
            }
        }
        let _ = sink.close().await;
    });

    // Main message loop
    loop {
        tokio::select! {
            msg = stream.next() => {
                match msg {
                    Some(Ok(Message::Text(text))) => {
                        dispatch(&gateway, &client, text.as_str()).await;
                    }
                    Some(Ok(Message::Close(_))) | None => {
                        tracing::debug!(connection_id = %connection_id, "Connection closed");
                        break;
                    }
                    Some(Ok(_)) => {
                        // Ping/pong is handled by axum; binary frames are not part of the protocol
                    }
                    Some(Err(e)) => {
                        tracing::debug!(connection_id = %connection_id, error = %e, "WebSocket error");
                        break;
                    }
                }
            }

            _ = &mut writer => {
                tracing::debug!(connection_id = %connection_id, "Writer stopped");
                break;
            }
        }
    }

    // Cleanup
    if session.close() {
        gateway.disconnect(connection_id);
        tracing::debug!(
            connection_id = %connection_id,
            duration_secs = session.opened_at.elapsed().as_secs(),
            "Session ended"
        );
    }
    writer.abort();
}

/// Parse and handle one text frame. Failures are logged and never end the
/// connection.
async fn dispatch(gateway: &Gateway, client: &ClientContext, text: &str) {
    let event = match serde_json::from_str::<ClientEvent>(text) {
        Ok(event) => event,
        Err(e) => {
            tracing::debug!(
                connection_id = %client.connection_id,
                error = %e,
                "Malformed client event"
            );
            return;
        }
    };

    let event_name = event.event_name();
    if let Err(e) = gateway.handle_event(client, event).await {
        tracing::warn!(
            connection_id = %client.connection_id,
            user_id = %client.identity.user_id,
            event = event_name,
            error = %e,
            "Error handling event"
        );
    }
}
