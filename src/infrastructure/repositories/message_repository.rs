use super::traits::MessageStore;
use crate::domain::Message;
use crate::error::{AppError, AppResult};
use async_trait::async_trait;
use chrono::Utc;
use sqlx::PgPool;
use uuid::Uuid;

const MESSAGE_COLUMNS: &str = "id, conversation_id, sender_id, body, kind, attachment_url, \
     status, is_read, delivered_at, read_at, created_at, updated_at";

pub struct MessageRepositoryImpl {
    pool: PgPool,
}

impl MessageRepositoryImpl {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl MessageStore for MessageRepositoryImpl {
    async fn create(&self, message: &Message) -> AppResult<Message> {
        let created = sqlx::query_as::<_, Message>(&format!(
            "INSERT INTO messages \
             (id, conversation_id, sender_id, body, kind, attachment_url, status, is_read, \
              created_at, updated_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $9) \
             RETURNING {MESSAGE_COLUMNS}"
        ))
        .bind(message.id)
        .bind(message.conversation_id)
        .bind(message.sender_id)
        .bind(&message.body)
        .bind(message.kind)
        .bind(&message.attachment_url)
        .bind(message.status)
        .bind(message.is_read)
        .bind(message.created_at)
        .fetch_one(&self.pool)
        .await?;
        Ok(created)
    }

    async fn list_by_conversation(
        &self,
        conversation_id: Uuid,
        limit: i64,
        offset: i64,
    ) -> AppResult<(Vec<Message>, i64)> {
        let messages = sqlx::query_as::<_, Message>(&format!(
            "SELECT {MESSAGE_COLUMNS} FROM messages \
             WHERE conversation_id = $1 \
             ORDER BY created_at DESC \
             LIMIT $2 OFFSET $3"
        ))
        .bind(conversation_id)
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        let total = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM messages WHERE conversation_id = $1",
        )
        .bind(conversation_id)
        .fetch_one(&self.pool)
        .await?;

        Ok((messages, total))
    }

    async fn mark_read(&self, conversation_id: Uuid, reader_id: Uuid) -> AppResult<u64> {
        let now = Utc::now();
        let result = sqlx::query(
            "UPDATE messages \
             SET is_read = TRUE, status = 'read', read_at = $3, updated_at = $3 \
             WHERE conversation_id = $1 AND sender_id <> $2 AND is_read = FALSE",
        )
        .bind(conversation_id)
        .bind(reader_id)
        .bind(now)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected())
    }

    async fn count_unread(&self, conversation_id: Uuid, user_id: Uuid) -> AppResult<i64> {
        let count = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM messages \
             WHERE conversation_id = $1 AND sender_id <> $2 AND is_read = FALSE",
        )
        .bind(conversation_id)
        .bind(user_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(count)
    }

    async fn delete(&self, id: Uuid, requester_id: Uuid) -> AppResult<bool> {
        let sender: Option<Uuid> =
            sqlx::query_scalar("SELECT sender_id FROM messages WHERE id = $1")
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;

        let Some(sender_id) = sender else {
            return Ok(false);
        };

        if sender_id != requester_id {
            return Err(AppError::Forbidden(
                "Only the sender can delete a message".to_string(),
            ));
        }

        let result = sqlx::query("DELETE FROM messages WHERE id = $1 AND sender_id = $2")
            .bind(id)
            .bind(requester_id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
