use chrono::{DateTime, Utc};
use messaging_backend::domain::{
    Conversation, Message, MessageKind, MessageStatus, UserSummary,
};
use uuid::Uuid;

pub fn conversation_between(first: Uuid, second: Uuid) -> Conversation {
    let (participant_a, participant_b) = Conversation::normalize_pair(first, second);
    let now = Utc::now();
    Conversation {
        id: Uuid::new_v4(),
        participant_a,
        participant_b,
        last_message_preview: None,
        last_message_at: None,
        unread_count_a: 0,
        unread_count_b: 0,
        created_at: now,
        updated_at: now,
    }
}

pub fn text_message(conversation_id: Uuid, sender_id: Uuid, body: &str) -> Message {
    text_message_at(conversation_id, sender_id, body, Utc::now())
}

pub fn text_message_at(
    conversation_id: Uuid,
    sender_id: Uuid,
    body: &str,
    created_at: DateTime<Utc>,
) -> Message {
    Message {
        id: Uuid::new_v4(),
        conversation_id,
        sender_id,
        body: body.to_string(),
        kind: MessageKind::Text,
        attachment_url: None,
        status: MessageStatus::Sent,
        is_read: false,
        delivered_at: None,
        read_at: None,
        created_at,
        updated_at: created_at,
    }
}

pub fn user_summary(id: Uuid, display_name: &str) -> UserSummary {
    UserSummary {
        id,
        display_name: display_name.to_string(),
        avatar_url: None,
    }
}
