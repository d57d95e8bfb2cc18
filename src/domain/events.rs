//! Server Events
//!
//! Events pushed from the gateway to live connections. The serialized form is
//! the wire envelope `{"event": NAME, "data": PAYLOAD}`; names and payload
//! shapes are shared with the web client and must not change.

use serde::{Deserialize, Serialize};

use super::entities::{ChatId, OutboundMessage, UserId};

pub const NEW_MESSAGE: &str = "NEW_MESSAGE";
pub const NEW_MESSAGE_ALERT: &str = "NEW_MESSAGE_ALERT";
pub const START_TYPING: &str = "START_TYPING";
pub const STOP_TYPING: &str = "STOP_TYPING";
pub const USER_ONLINE: &str = "USER_ONLINE";
pub const USER_OFFLINE: &str = "USER_OFFLINE";
pub const ONLINE_USERS: &str = "ONLINE_USERS";
pub const ALERT: &str = "ALERT";
pub const REFETCH_CHATS: &str = "REFETCH_CHATS";
pub const NEW_REQUEST: &str = "NEW_REQUEST";

/// Event delivered to a connection.
///
/// Freeform events (`ALERT`, `REFETCH_CHATS`, `NEW_REQUEST`) may be sent
/// without `data`; it deserializes to `null`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data", try_from = "EventEnvelope")]
pub enum ServerEvent {
    #[serde(rename = "NEW_MESSAGE")]
    NewMessage(NewMessagePayload),
    #[serde(rename = "NEW_MESSAGE_ALERT")]
    NewMessageAlert(ChatPayload),
    #[serde(rename = "START_TYPING")]
    StartTyping(ChatPayload),
    #[serde(rename = "STOP_TYPING")]
    StopTyping(ChatPayload),
    /// Full snapshot of online users, never a delta.
    #[serde(rename = "ONLINE_USERS")]
    OnlineUsers(Vec<UserId>),
    #[serde(rename = "ALERT")]
    Alert(serde_json::Value),
    #[serde(rename = "REFETCH_CHATS")]
    RefetchChats(serde_json::Value),
    #[serde(rename = "NEW_REQUEST")]
    NewRequest(serde_json::Value),
}

impl ServerEvent {
    /// Wire name of the event
    pub fn event_name(&self) -> &'static str {
        match self {
            ServerEvent::NewMessage(_) => NEW_MESSAGE,
            ServerEvent::NewMessageAlert(_) => NEW_MESSAGE_ALERT,
            ServerEvent::StartTyping(_) => START_TYPING,
            ServerEvent::StopTyping(_) => STOP_TYPING,
            ServerEvent::OnlineUsers(_) => ONLINE_USERS,
            ServerEvent::Alert(_) => ALERT,
            ServerEvent::RefetchChats(_) => REFETCH_CHATS,
            ServerEvent::NewRequest(_) => NEW_REQUEST,
        }
    }

    pub fn new_message(message: OutboundMessage) -> Self {
        ServerEvent::NewMessage(NewMessagePayload {
            chat_id: message.chat.clone(),
            message,
        })
    }

    pub fn new_message_alert(chat_id: ChatId) -> Self {
        ServerEvent::NewMessageAlert(ChatPayload { chat_id })
    }
}

#[derive(Deserialize)]
struct EventEnvelope {
    event: String,
    #[serde(default)]
    data: serde_json::Value,
}

impl TryFrom<EventEnvelope> for ServerEvent {
    type Error = serde_json::Error;

    fn try_from(envelope: EventEnvelope) -> Result<Self, Self::Error> {
        let EventEnvelope { event, data } = envelope;
        let event = match event.as_str() {
            NEW_MESSAGE => ServerEvent::NewMessage(serde_json::from_value(data)?),
            NEW_MESSAGE_ALERT => ServerEvent::NewMessageAlert(serde_json::from_value(data)?),
            START_TYPING => ServerEvent::StartTyping(serde_json::from_value(data)?),
            STOP_TYPING => ServerEvent::StopTyping(serde_json::from_value(data)?),
            ONLINE_USERS => ServerEvent::OnlineUsers(serde_json::from_value(data)?),
            ALERT => ServerEvent::Alert(data),
            REFETCH_CHATS => ServerEvent::RefetchChats(data),
            NEW_REQUEST => ServerEvent::NewRequest(data),
            other => {
                return Err(serde::de::Error::custom(format!(
                    "unknown event `{}`",
                    other
                )))
            }
        };
        Ok(event)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewMessagePayload {
    pub chat_id: ChatId,
    pub message: OutboundMessage,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatPayload {
    pub chat_id: ChatId,
}
