use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// A one-to-one conversation between exactly two marketplace users.
///
/// The participant pair is stored normalized (`participant_a < participant_b`)
/// so that a single row exists per unordered pair regardless of who initiated
/// the conversation.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Conversation {
    pub id: Uuid,
    pub participant_a: Uuid,
    pub participant_b: Uuid,
    pub last_message_preview: Option<String>,
    pub last_message_at: Option<DateTime<Utc>>,
    pub unread_count_a: i32,
    pub unread_count_b: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Conversation {
    /// Orders a participant pair into its canonical `(a, b)` form with `a < b`.
    pub fn normalize_pair(first: Uuid, second: Uuid) -> (Uuid, Uuid) {
        if first < second {
            (first, second)
        } else {
            (second, first)
        }
    }

    pub fn is_participant(&self, user_id: Uuid) -> bool {
        self.participant_a == user_id || self.participant_b == user_id
    }

    /// The other participant, if `user_id` is part of this conversation.
    pub fn counterpart_of(&self, user_id: Uuid) -> Option<Uuid> {
        if user_id == self.participant_a {
            Some(self.participant_b)
        } else if user_id == self.participant_b {
            Some(self.participant_a)
        } else {
            None
        }
    }

    /// The unread counter belonging to `user_id`'s side of the conversation.
    pub fn unread_for(&self, user_id: Uuid) -> i32 {
        if user_id == self.participant_a {
            self.unread_count_a
        } else if user_id == self.participant_b {
            self.unread_count_b
        } else {
            0
        }
    }
}
