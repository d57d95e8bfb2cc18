//! Message entities and repository trait.
//!
//! Two shapes exist for every chat message:
//! - [`OutboundMessage`] is the ephemeral copy pushed to live connections the
//!   moment a message is ingested. Its id is temporary.
//! - [`NewMessageRecord`] is what gets written to the `messages` table.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use super::identity::{ChatId, Identity, UserId};
use crate::shared::error::AppError;

/// Reference to a file already uploaded to object storage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct Attachment {
    #[validate(length(min = 1))]
    pub public_id: String,
    #[validate(url)]
    pub url: String,
}

/// Sender block embedded in real-time messages.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageSender {
    #[serde(rename = "_id")]
    pub id: UserId,
    pub name: String,
}

impl From<&Identity> for MessageSender {
    fn from(identity: &Identity) -> Self {
        Self {
            id: identity.user_id.clone(),
            name: identity.name.clone(),
        }
    }
}

/// Message as broadcast to chat members before it is stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OutboundMessage {
    #[serde(rename = "_id")]
    pub id: Uuid,
    pub content: String,
    #[serde(default)]
    pub attachments: Vec<Attachment>,
    pub sender: MessageSender,
    pub chat: ChatId,
    pub created_at: DateTime<Utc>,
}

impl OutboundMessage {
    /// Build a message with a fresh temporary id and the current timestamp.
    pub fn new(
        sender: &Identity,
        chat: ChatId,
        content: String,
        attachments: Vec<Attachment>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            content,
            attachments,
            sender: MessageSender::from(sender),
            chat,
            created_at: Utc::now(),
        }
    }

    /// Durable record for this message. The temporary id is not carried over.
    pub fn to_record(&self) -> NewMessageRecord {
        NewMessageRecord {
            content: self.content.clone(),
            attachments: self.attachments.clone(),
            sender_id: self.sender.id.clone(),
            chat_id: self.chat.clone(),
        }
    }
}

/// Data required to store a message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewMessageRecord {
    pub content: String,
    pub attachments: Vec<Attachment>,
    pub sender_id: UserId,
    pub chat_id: ChatId,
}

/// Repository trait for message persistence.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MessageRepository: Send + Sync {
    /// Store a message and return its durable id.
    async fn create_message(&self, record: NewMessageRecord) -> Result<Uuid, AppError>;
}
