//! Realtime gateway errors.

use crate::domain::{ChatId, ConnectionId, UserId};
use crate::shared::error::AppError;

/// Errors raised by the session gate, the ingest path and event dispatch.
#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    /// Missing, invalid or expired credential. No state is created.
    #[error("Authentication rejected: {0}")]
    AuthRejected(String),

    /// The identity verifier itself failed. Ends the connection attempt.
    #[error("Identity verification failed: {0}")]
    VerificationFailed(String),

    #[error("Chat not found: {0}")]
    ChatNotFound(ChatId),

    #[error("User {user_id} is not a member of chat {chat_id}")]
    NotAMember { user_id: UserId, chat_id: ChatId },

    #[error("Invalid event: {0}")]
    InvalidEvent(String),

    #[error("Delivery to connection {0} failed")]
    DeliveryFault(ConnectionId),

    /// Durable write failed after real-time delivery already happened.
    #[error("Message persistence failed: {0}")]
    PersistenceFault(String),

    #[error("Invalid connection state transition from {from} to {to}")]
    InvalidTransition {
        from: &'static str,
        to: &'static str,
    },

    #[error(transparent)]
    Repository(#[from] AppError),
}

impl From<validator::ValidationErrors> for GatewayError {
    fn from(errors: validator::ValidationErrors) -> Self {
        GatewayError::InvalidEvent(errors.to_string())
    }
}

impl From<GatewayError> for AppError {
    fn from(err: GatewayError) -> Self {
        match err {
            GatewayError::AuthRejected(_) => {
                AppError::Unauthorized("Please login to access".into())
            }
            GatewayError::ChatNotFound(chat_id) => {
                AppError::NotFound(format!("Chat {} not found", chat_id))
            }
            GatewayError::NotAMember { .. } => {
                AppError::Forbidden("You are not a member of this chat".into())
            }
            GatewayError::InvalidEvent(msg) => AppError::Validation(msg),
            GatewayError::Repository(e) => e,
            other => AppError::Internal(other.to_string()),
        }
    }
}
