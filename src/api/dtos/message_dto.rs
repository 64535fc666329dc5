use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use super::common::Pagination;
use crate::domain::{Message, MessageKind, MessageStatus, UserSummary};

#[derive(Debug, Deserialize)]
pub struct CreateConversationRequest {
    pub recipient_id: Uuid,
}

#[derive(Debug, Deserialize, Validate)]
pub struct SendMessageRequest {
    #[serde(default)]
    #[validate(length(max = 5000, message = "Message body must be at most 5000 characters"))]
    pub body: String,
    #[serde(default = "default_kind")]
    pub kind: MessageKind,
    #[serde(default)]
    pub attachment_url: Option<String>,
}

fn default_kind() -> MessageKind {
    MessageKind::Text
}

#[derive(Debug, Clone, Serialize)]
pub struct ParticipantResponse {
    pub user_id: Uuid,
    pub display_name: String,
    pub avatar_url: Option<String>,
}

impl From<UserSummary> for ParticipantResponse {
    fn from(summary: UserSummary) -> Self {
        Self {
            user_id: summary.id,
            display_name: summary.display_name,
            avatar_url: summary.avatar_url,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ConversationResponse {
    pub id: Uuid,
    pub counterpart: Option<ParticipantResponse>,
    pub last_message_preview: Option<String>,
    pub last_message_at: Option<DateTime<Utc>>,
    /// The caller's side of the unread bookkeeping, already resolved.
    pub unread_count: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
pub struct MessageResponse {
    pub id: Uuid,
    pub conversation_id: Uuid,
    pub sender_id: Uuid,
    pub body: String,
    pub kind: MessageKind,
    pub attachment_url: Option<String>,
    pub status: MessageStatus,
    pub is_read: bool,
    pub delivered_at: Option<DateTime<Utc>>,
    pub read_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl From<Message> for MessageResponse {
    fn from(message: Message) -> Self {
        Self {
            id: message.id,
            conversation_id: message.conversation_id,
            sender_id: message.sender_id,
            body: message.body,
            kind: message.kind,
            attachment_url: message.attachment_url,
            status: message.status,
            is_read: message.is_read,
            delivered_at: message.delivered_at,
            read_at: message.read_at,
            created_at: message.created_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct MessageListResponse {
    pub messages: Vec<MessageResponse>,
    pub pagination: Pagination,
}

#[derive(Debug, Serialize)]
pub struct MarkReadResponse {
    pub conversation_id: Uuid,
    /// Number of messages transitioned by this call; zero on repeats.
    pub marked_read: u64,
}
