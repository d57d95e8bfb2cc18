//! Message Ingest Path
//!
//! Turns a send-message request into a real-time broadcast plus a durable
//! write. The broadcast happens first; the write runs in its own task and is
//! never awaited before delivery. A failed write is logged and counted but the
//! already delivered event stands.

use std::sync::Arc;

use tokio::task::JoinHandle;
use uuid::Uuid;
use validator::{Validate, ValidationError};

use super::error::GatewayError;
use super::router::{DeliveryReport, EventRouter};
use crate::domain::{
    Attachment, ChatId, ChatRepository, Identity, MessageRepository, OutboundMessage, ServerEvent,
};
use crate::infrastructure::metrics;

/// Upper bound on attachments in a single message.
pub const MAX_ATTACHMENTS: usize = 5;

/// Send-message request, as received from a connection or the internal API.
#[derive(Debug, Clone, Validate)]
#[validate(schema(function = "validate_body"))]
pub struct SendMessage {
    #[validate(length(min = 1, max = 64))]
    pub chat_id: String,
    pub content: String,
    #[validate(nested)]
    pub attachments: Vec<Attachment>,
}

fn validate_body(request: &SendMessage) -> Result<(), ValidationError> {
    if request.content.trim().is_empty() && request.attachments.is_empty() {
        return Err(ValidationError::new("empty_message"));
    }
    if request.attachments.len() > MAX_ATTACHMENTS {
        return Err(ValidationError::new("too_many_attachments"));
    }
    Ok(())
}

/// Result of an ingest call.
pub struct IngestReceipt {
    pub message: OutboundMessage,
    pub delivery: DeliveryReport,
    /// Background durable write. Dropping the handle detaches it.
    pub persisted: JoinHandle<Result<Uuid, GatewayError>>,
}

pub struct MessageIngest {
    router: Arc<EventRouter>,
    chats: Arc<dyn ChatRepository>,
    messages: Arc<dyn MessageRepository>,
    max_content_length: usize,
}

impl MessageIngest {
    pub fn new(
        router: Arc<EventRouter>,
        chats: Arc<dyn ChatRepository>,
        messages: Arc<dyn MessageRepository>,
        max_content_length: usize,
    ) -> Self {
        Self {
            router,
            chats,
            messages,
            max_content_length,
        }
    }

    /// Broadcast a message to the chat's members, then store it.
    ///
    /// The sender always comes from the authenticated identity, never from
    /// the request.
    pub async fn ingest(
        &self,
        sender: &Identity,
        request: SendMessage,
    ) -> Result<IngestReceipt, GatewayError> {
        request.validate()?;
        if request.content.chars().count() > self.max_content_length {
            return Err(GatewayError::InvalidEvent(format!(
                "content exceeds {} characters",
                self.max_content_length
            )));
        }

        let chat_id = ChatId::new(request.chat_id);
        let members = self
            .chats
            .get_chat_members(&chat_id)
            .await?
            .ok_or_else(|| GatewayError::ChatNotFound(chat_id.clone()))?;

        if !members.contains(&sender.user_id) {
            return Err(GatewayError::NotAMember {
                user_id: sender.user_id.clone(),
                chat_id,
            });
        }

        let message = OutboundMessage::new(
            sender,
            chat_id.clone(),
            request.content,
            request.attachments,
        );

        let delivery = self
            .router
            .deliver(&ServerEvent::new_message(message.clone()), &members);
        self.router
            .deliver(&ServerEvent::new_message_alert(chat_id), &members);

        tracing::debug!(
            message_id = %message.id,
            chat_id = %message.chat,
            sender_id = %sender.user_id,
            delivered = delivery.delivered,
            failed = delivery.failed,
            "Message fanned out"
        );

        let persisted = self.spawn_persist(&message);

        Ok(IngestReceipt {
            message,
            delivery,
            persisted,
        })
    }

    fn spawn_persist(&self, message: &OutboundMessage) -> JoinHandle<Result<Uuid, GatewayError>> {
        let messages = Arc::clone(&self.messages);
        let record = message.to_record();
        let temp_id = message.id;

        tokio::spawn(async move {
            let chat_id = record.chat_id.clone();
            match messages.create_message(record).await {
                Ok(id) => {
                    tracing::debug!(message_id = %id, temp_id = %temp_id, "Message stored");
                    Ok(id)
                }
                Err(e) => {
                    metrics::record_persistence_fault();
                    tracing::error!(
                        temp_id = %temp_id,
                        chat_id = %chat_id,
                        error = %e,
                        "Message delivered in real time but not stored"
                    );
                    Err(GatewayError::PersistenceFault(e.to_string()))
                }
            }
        })
    }
}
