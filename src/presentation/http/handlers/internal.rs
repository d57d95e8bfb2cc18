//! Internal API Handlers
//!
//! Endpoints the chat service calls after REST operations (group created,
//! member added, friend request sent, attachments uploaded) so that the
//! affected users are notified over their live connections.

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::application::realtime::SendMessage;
use crate::domain::{Attachment, OutboundMessage, ServerEvent, UserId};
use crate::shared::error::AppError;
use crate::startup::AppState;

/// Push an event to a list of users
#[derive(Debug, Deserialize, Validate)]
pub struct EmitEventRequest {
    #[validate(length(min = 1, max = 10000))]
    pub users: Vec<UserId>,
    /// Event envelope, e.g. `{"event": "REFETCH_CHATS", "data": {}}`
    pub payload: ServerEvent,
}

/// Send a message on behalf of a user
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SendMessageRequest {
    pub sender_id: UserId,
    pub chat_id: String,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub attachments: Vec<Attachment>,
}

#[derive(Debug, Serialize)]
pub struct DeliveryResponse {
    pub success: bool,
    pub delivered: usize,
    pub failed: usize,
}

#[derive(Debug, Serialize)]
pub struct SendMessageResponse {
    pub success: bool,
    pub message: OutboundMessage,
    pub delivered: usize,
}

#[derive(Debug, Serialize)]
pub struct PresenceResponse {
    pub online_users: Vec<UserId>,
    pub connections: usize,
}

/// POST /internal/events
pub async fn emit_event(
    State(state): State<AppState>,
    Json(request): Json<EmitEventRequest>,
) -> Result<Json<DeliveryResponse>, AppError> {
    request.validate()?;

    if matches!(request.payload, ServerEvent::OnlineUsers(_)) {
        return Err(AppError::BadRequest(
            "ONLINE_USERS is managed by the gateway".into(),
        ));
    }

    let report = state.gateway.emit(&request.payload, &request.users);
    tracing::debug!(
        event = request.payload.event_name(),
        targets = request.users.len(),
        delivered = report.delivered,
        "Internal event emitted"
    );

    Ok(Json(DeliveryResponse {
        success: true,
        delivered: report.delivered,
        failed: report.failed,
    }))
}

/// POST /internal/messages
pub async fn send_message(
    State(state): State<AppState>,
    Json(request): Json<SendMessageRequest>,
) -> Result<Json<SendMessageResponse>, AppError> {
    let receipt = state
        .gateway
        .send_message_as(
            &request.sender_id,
            SendMessage {
                chat_id: request.chat_id,
                content: request.content,
                attachments: request.attachments,
            },
        )
        .await?;

    Ok(Json(SendMessageResponse {
        success: true,
        message: receipt.message,
        delivered: receipt.delivery.delivered,
    }))
}

/// GET /internal/presence
pub async fn presence(State(state): State<AppState>) -> Json<PresenceResponse> {
    Json(PresenceResponse {
        online_users: state.gateway.online_users(),
        connections: state.gateway.connection_count(),
    })
}
