use super::traits::UserDirectory;
use crate::domain::UserSummary;
use crate::error::AppResult;
use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

pub struct UserDirectoryImpl {
    pool: PgPool,
}

impl UserDirectoryImpl {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserDirectory for UserDirectoryImpl {
    async fn find_summary(&self, id: Uuid) -> AppResult<Option<UserSummary>> {
        let summary = sqlx::query_as::<_, UserSummary>(
            "SELECT id, display_name, avatar_url FROM profiles WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(summary)
    }

    async fn find_summaries(&self, ids: &[Uuid]) -> AppResult<Vec<UserSummary>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let summaries = sqlx::query_as::<_, UserSummary>(
            "SELECT id, display_name, avatar_url FROM profiles WHERE id = ANY($1)",
        )
        .bind(ids)
        .fetch_all(&self.pool)
        .await?;
        Ok(summaries)
    }
}
