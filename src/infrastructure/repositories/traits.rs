use crate::domain::{Conversation, Message, UserSummary};
use crate::error::AppResult;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

/// Persistence contract for conversation records.
///
/// Implementations must make `create_or_find` safe under concurrent calls
/// with the same pair (at most one row per unordered pair) and must perform
/// the unread counter mutations as single atomic statements, never as
/// application-level read-modify-write.
#[async_trait]
pub trait ConversationStore: Send + Sync {
    async fn create_or_find(&self, user_a: Uuid, user_b: Uuid) -> AppResult<Conversation>;
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Conversation>>;
    async fn find_by_user(
        &self,
        user_id: Uuid,
        limit: i64,
        offset: i64,
    ) -> AppResult<Vec<Conversation>>;
    async fn update_preview(
        &self,
        id: Uuid,
        preview: &str,
        at: DateTime<Utc>,
    ) -> AppResult<()>;
    async fn increment_unread(&self, id: Uuid, for_user: Uuid) -> AppResult<()>;
    async fn reset_unread(&self, id: Uuid, user_id: Uuid) -> AppResult<()>;
}

/// Persistence contract for message records.
#[async_trait]
pub trait MessageStore: Send + Sync {
    async fn create(&self, message: &Message) -> AppResult<Message>;
    /// Newest-first page plus the total message count for the conversation.
    async fn list_by_conversation(
        &self,
        conversation_id: Uuid,
        limit: i64,
        offset: i64,
    ) -> AppResult<(Vec<Message>, i64)>;
    /// Transitions every unread message not sent by `reader_id` to read.
    /// Idempotent; returns the number of messages transitioned.
    async fn mark_read(&self, conversation_id: Uuid, reader_id: Uuid) -> AppResult<u64>;
    async fn count_unread(&self, conversation_id: Uuid, user_id: Uuid) -> AppResult<i64>;
    /// Sender-only delete. `Ok(false)` when the message does not exist,
    /// `Forbidden` when the requester is not the sender.
    async fn delete(&self, id: Uuid, requester_id: Uuid) -> AppResult<bool>;
}

/// Read-only lookup into the marketplace user directory.
#[async_trait]
pub trait UserDirectory: Send + Sync {
    async fn find_summary(&self, id: Uuid) -> AppResult<Option<UserSummary>>;
    async fn find_summaries(&self, ids: &[Uuid]) -> AppResult<Vec<UserSummary>>;
}
