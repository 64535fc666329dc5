use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "message_kind", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum MessageKind {
    Text,
    Image,
    File,
    System,
}

/// Delivery state of a message. Transitions are monotonic:
/// `Sent -> Delivered -> Read`, never backwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "message_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum MessageStatus {
    Sent,
    Delivered,
    Read,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Message {
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
    pub updated_at: DateTime<Utc>,
}

impl Message {
    /// Short text snapshot stored on the conversation for fast listing.
    /// Non-text messages collapse to a bracketed kind tag.
    pub fn preview(&self) -> String {
        match self.kind {
            MessageKind::Text => self.body.clone(),
            MessageKind::Image => "[image]".to_string(),
            MessageKind::File => "[file]".to_string(),
            MessageKind::System => "[system]".to_string(),
        }
    }
}
