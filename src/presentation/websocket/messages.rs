//! WebSocket Message Types
//!
//! Events a client may send. Every frame is a JSON envelope
//! `{"event": NAME, "data": PAYLOAD}`; outgoing frames use
//! [`ServerEvent`](crate::domain::ServerEvent) with the same envelope.

use serde::Deserialize;

use crate::domain::UserId;

/// Incoming client event
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "event", content = "data")]
pub enum ClientEvent {
    #[serde(rename = "NEW_MESSAGE")]
    NewMessage(NewMessageRequest),
    #[serde(rename = "START_TYPING")]
    StartTyping(TypingRequest),
    #[serde(rename = "STOP_TYPING")]
    StopTyping(TypingRequest),
    #[serde(rename = "USER_ONLINE")]
    UserOnline(PresenceRequest),
    #[serde(rename = "USER_OFFLINE")]
    UserOffline(PresenceRequest),
}

impl ClientEvent {
    pub fn event_name(&self) -> &'static str {
        use crate::domain::events::*;
        match self {
            ClientEvent::NewMessage(_) => NEW_MESSAGE,
            ClientEvent::StartTyping(_) => START_TYPING,
            ClientEvent::StopTyping(_) => STOP_TYPING,
            ClientEvent::UserOnline(_) => USER_ONLINE,
            ClientEvent::UserOffline(_) => USER_OFFLINE,
        }
    }
}

/// NEW_MESSAGE payload.
///
/// `members` is accepted for compatibility with older clients but the
/// audience always comes from the chat's stored membership.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewMessageRequest {
    pub chat_id: String,
    pub message: String,
    #[serde(default)]
    pub members: Vec<UserId>,
}

/// START_TYPING / STOP_TYPING payload
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TypingRequest {
    pub chat_id: String,
    #[serde(default)]
    pub members: Vec<UserId>,
}

/// USER_ONLINE / USER_OFFLINE payload.
///
/// `userId` is informational only; presence always applies to the
/// connection's own identity.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PresenceRequest {
    #[serde(default)]
    pub user_id: Option<UserId>,
    #[serde(default)]
    pub members: Vec<UserId>,
}
