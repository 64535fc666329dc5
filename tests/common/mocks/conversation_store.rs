use async_trait::async_trait;
use chrono::{DateTime, Utc};
use messaging_backend::domain::Conversation;
use messaging_backend::error::{AppError, AppResult};
use messaging_backend::infrastructure::repositories::ConversationStore;
use std::sync::Mutex;
use uuid::Uuid;

#[derive(Default)]
pub struct MockConversationStore {
    pub conversations: Mutex<Vec<Conversation>>,
}

impl MockConversationStore {
    pub fn add_conversation(&self, conversation: Conversation) {
        self.conversations
            .lock()
            .expect("conversations mutex poisoned")
            .push(conversation);
    }

    pub fn get(&self, id: Uuid) -> Option<Conversation> {
        self.conversations
            .lock()
            .expect("conversations mutex poisoned")
            .iter()
            .find(|conversation| conversation.id == id)
            .cloned()
    }
}

#[async_trait]
impl ConversationStore for MockConversationStore {
    async fn create_or_find(&self, user_a: Uuid, user_b: Uuid) -> AppResult<Conversation> {
        let (participant_a, participant_b) = Conversation::normalize_pair(user_a, user_b);
        let mut conversations = self
            .conversations
            .lock()
            .expect("conversations mutex poisoned");

        if let Some(existing) = conversations
            .iter()
            .find(|c| c.participant_a == participant_a && c.participant_b == participant_b)
        {
            return Ok(existing.clone());
        }

        let now = Utc::now();
        let conversation = Conversation {
            id: Uuid::new_v4(),
            participant_a,
            participant_b,
            last_message_preview: None,
            last_message_at: None,
            unread_count_a: 0,
            unread_count_b: 0,
            created_at: now,
            updated_at: now,
        };
        conversations.push(conversation.clone());
        Ok(conversation)
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Conversation>> {
        Ok(self.get(id))
    }

    async fn find_by_user(
        &self,
        user_id: Uuid,
        limit: i64,
        offset: i64,
    ) -> AppResult<Vec<Conversation>> {
        let mut matching: Vec<Conversation> = self
            .conversations
            .lock()
            .expect("conversations mutex poisoned")
            .iter()
            .filter(|c| c.participant_a == user_id || c.participant_b == user_id)
            .cloned()
            .collect();

        matching.sort_by(|a, b| {
            b.last_message_at
                .unwrap_or(b.created_at)
                .cmp(&a.last_message_at.unwrap_or(a.created_at))
        });

        let offset = offset.max(0) as usize;
        let limit = limit.max(0) as usize;
        Ok(matching.into_iter().skip(offset).take(limit).collect())
    }

    async fn update_preview(&self, id: Uuid, preview: &str, at: DateTime<Utc>) -> AppResult<()> {
        let mut conversations = self
            .conversations
            .lock()
            .expect("conversations mutex poisoned");
        let conversation = conversations
            .iter_mut()
            .find(|c| c.id == id)
            .ok_or_else(|| AppError::NotFound("conversation not found".to_string()))?;

        conversation.last_message_preview = Some(preview.to_string());
        conversation.last_message_at = Some(at);
        conversation.updated_at = at;
        Ok(())
    }

    async fn increment_unread(&self, id: Uuid, for_user: Uuid) -> AppResult<()> {
        let mut conversations = self
            .conversations
            .lock()
            .expect("conversations mutex poisoned");
        let conversation = conversations
            .iter_mut()
            .find(|c| c.id == id)
            .ok_or_else(|| AppError::NotFound("conversation not found".to_string()))?;

        if conversation.participant_a == for_user {
            conversation.unread_count_a += 1;
        } else if conversation.participant_b == for_user {
            conversation.unread_count_b += 1;
        }
        Ok(())
    }

    async fn reset_unread(&self, id: Uuid, user_id: Uuid) -> AppResult<()> {
        let mut conversations = self
            .conversations
            .lock()
            .expect("conversations mutex poisoned");
        let conversation = conversations
            .iter_mut()
            .find(|c| c.id == id)
            .ok_or_else(|| AppError::NotFound("conversation not found".to_string()))?;

        if conversation.participant_a == user_id {
            conversation.unread_count_a = 0;
        } else if conversation.participant_b == user_id {
            conversation.unread_count_b = 0;
        }
        Ok(())
    }
}
