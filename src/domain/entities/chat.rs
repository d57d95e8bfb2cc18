//! Chat membership repository trait.
//!
//! Membership is owned by the external chat service; the gateway only reads it
//! to compute fan-out targets.

use async_trait::async_trait;

use super::identity::{ChatId, UserId};
use crate::shared::error::AppError;

/// Repository trait for chat membership lookups.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ChatRepository: Send + Sync {
    /// Current members of a chat, or None if the chat does not exist.
    async fn get_chat_members(&self, chat_id: &ChatId) -> Result<Option<Vec<UserId>>, AppError>;
}
