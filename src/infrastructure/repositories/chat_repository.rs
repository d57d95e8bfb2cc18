//! Chat Repository Implementation
//!
//! Membership lookups against the `chats` and `chat_members` tables.

use async_trait::async_trait;
use sqlx::PgPool;

use crate::domain::{ChatId, ChatRepository, UserId};
use crate::shared::error::AppError;

/// PostgreSQL chat membership repository.
pub struct PgChatRepository {
    pool: PgPool,
}

impl PgChatRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ChatRepository for PgChatRepository {
    /// Members of a chat.
    ///
    /// A chat with no member rows still exists if it is present in `chats`,
    /// in which case an empty list is returned rather than None.
    async fn get_chat_members(&self, chat_id: &ChatId) -> Result<Option<Vec<UserId>>, AppError> {
        let members: Vec<String> = sqlx::query_scalar(
            r#"
            SELECT user_id
            FROM chat_members
            WHERE chat_id = $1
            "#,
        )
        .bind(chat_id.as_str())
        .fetch_all(&self.pool)
        .await?;

        if !members.is_empty() {
            return Ok(Some(members.into_iter().map(UserId::new).collect()));
        }

        let exists: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM chats WHERE id = $1)")
            .bind(chat_id.as_str())
            .fetch_one(&self.pool)
            .await?;

        Ok(exists.then(Vec::new))
    }
}
