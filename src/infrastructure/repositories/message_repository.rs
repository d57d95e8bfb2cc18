//! Message Repository Implementation
//!
//! Durable storage for chat messages. Attachments are stored inline as JSONB
//! references to objects already held by the object-storage service.

use async_trait::async_trait;
use sqlx::types::Json;
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::{MessageRepository, NewMessageRecord};
use crate::shared::error::AppError;

/// PostgreSQL message repository implementation.
pub struct PgMessageRepository {
    pool: PgPool,
}

impl PgMessageRepository {
    /// Creates a new PgMessageRepository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl MessageRepository for PgMessageRepository {
    /// Insert a message. Ids are UUIDv7 so they sort by creation time.
    async fn create_message(&self, record: NewMessageRecord) -> Result<Uuid, AppError> {
        let id: Uuid = sqlx::query_scalar(
            r#"
            INSERT INTO messages (id, chat_id, sender_id, content, attachments)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id
            "#,
        )
        .bind(Uuid::now_v7())
        .bind(record.chat_id.as_str())
        .bind(record.sender_id.as_str())
        .bind(&record.content)
        .bind(Json(&record.attachments))
        .fetch_one(&self.pool)
        .await?;

        Ok(id)
    }
}
