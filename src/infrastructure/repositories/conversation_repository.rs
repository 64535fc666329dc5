use super::traits::ConversationStore;
use crate::domain::Conversation;
use crate::error::{AppError, AppResult};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

const CONVERSATION_COLUMNS: &str = "id, participant_a, participant_b, last_message_preview, \
     last_message_at, unread_count_a, unread_count_b, created_at, updated_at";

pub struct ConversationRepositoryImpl {
    pool: PgPool,
}

impl ConversationRepositoryImpl {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ConversationStore for ConversationRepositoryImpl {
    async fn create_or_find(&self, user_a: Uuid, user_b: Uuid) -> AppResult<Conversation> {
        let (a, b) = Conversation::normalize_pair(user_a, user_b);

        // The unique pair constraint resolves the race between concurrent
        // creators: whoever loses the insert re-fetches the winner's row.
        let inserted = sqlx::query_as::<_, Conversation>(&format!(
            "INSERT INTO conversations (participant_a, participant_b) \
             VALUES ($1, $2) \
             ON CONFLICT (participant_a, participant_b) DO NOTHING \
             RETURNING {CONVERSATION_COLUMNS}"
        ))
        .bind(a)
        .bind(b)
        .fetch_optional(&self.pool)
        .await?;

        if let Some(conversation) = inserted {
            return Ok(conversation);
        }

        let existing = sqlx::query_as::<_, Conversation>(&format!(
            "SELECT {CONVERSATION_COLUMNS} FROM conversations \
             WHERE participant_a = $1 AND participant_b = $2"
        ))
        .bind(a)
        .bind(b)
        .fetch_optional(&self.pool)
        .await?;

        existing.ok_or_else(|| {
            AppError::InternalError(anyhow::anyhow!(
                "conversation vanished between conflicting insert and re-fetch"
            ))
        })
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Conversation>> {
        let conversation = sqlx::query_as::<_, Conversation>(&format!(
            "SELECT {CONVERSATION_COLUMNS} FROM conversations WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(conversation)
    }

    async fn find_by_user(
        &self,
        user_id: Uuid,
        limit: i64,
        offset: i64,
    ) -> AppResult<Vec<Conversation>> {
        let conversations = sqlx::query_as::<_, Conversation>(&format!(
            "SELECT {CONVERSATION_COLUMNS} FROM conversations \
             WHERE participant_a = $1 OR participant_b = $1 \
             ORDER BY last_message_at DESC NULLS LAST, created_at DESC \
             LIMIT $2 OFFSET $3"
        ))
        .bind(user_id)
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;
        Ok(conversations)
    }

    async fn update_preview(&self, id: Uuid, preview: &str, at: DateTime<Utc>) -> AppResult<()> {
        sqlx::query(
            "UPDATE conversations \
             SET last_message_preview = $2, last_message_at = $3, updated_at = NOW() \
             WHERE id = $1",
        )
        .bind(id)
        .bind(preview)
        .bind(at)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn increment_unread(&self, id: Uuid, for_user: Uuid) -> AppResult<()> {
        // Single atomic increment; concurrent sends must never lose updates.
        sqlx::query(
            "UPDATE conversations SET \
             unread_count_a = unread_count_a + CASE WHEN participant_a = $2 THEN 1 ELSE 0 END, \
             unread_count_b = unread_count_b + CASE WHEN participant_b = $2 THEN 1 ELSE 0 END, \
             updated_at = NOW() \
             WHERE id = $1",
        )
        .bind(id)
        .bind(for_user)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn reset_unread(&self, id: Uuid, user_id: Uuid) -> AppResult<()> {
        sqlx::query(
            "UPDATE conversations SET \
             unread_count_a = CASE WHEN participant_a = $2 THEN 0 ELSE unread_count_a END, \
             unread_count_b = CASE WHEN participant_b = $2 THEN 0 ELSE unread_count_b END, \
             updated_at = NOW() \
             WHERE id = $1",
        )
        .bind(id)
        .bind(user_id)
        .execute(&self.pool)
        .await?;
        Ok(())
    }
}
