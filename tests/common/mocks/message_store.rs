use async_trait::async_trait;
use chrono::Utc;
use messaging_backend::domain::{Message, MessageStatus};
use messaging_backend::error::{AppError, AppResult};
use messaging_backend::infrastructure::repositories::MessageStore;
use std::sync::Mutex;
use uuid::Uuid;

#[derive(Default)]
pub struct MockMessageStore {
    pub messages: Mutex<Vec<Message>>,
}

impl MockMessageStore {
    pub fn add_message(&self, message: Message) {
        self.messages
            .lock()
            .expect("messages mutex poisoned")
            .push(message);
    }

    pub fn get(&self, id: Uuid) -> Option<Message> {
        self.messages
            .lock()
            .expect("messages mutex poisoned")
            .iter()
            .find(|message| message.id == id)
            .cloned()
    }
}

#[async_trait]
impl MessageStore for MockMessageStore {
    async fn create(&self, message: &Message) -> AppResult<Message> {
        self.messages
            .lock()
            .expect("messages mutex poisoned")
            .push(message.clone());
        Ok(message.clone())
    }

    async fn list_by_conversation(
        &self,
        conversation_id: Uuid,
        limit: i64,
        offset: i64,
    ) -> AppResult<(Vec<Message>, i64)> {
        let mut matching: Vec<Message> = self
            .messages
            .lock()
            .expect("messages mutex poisoned")
            .iter()
            .filter(|m| m.conversation_id == conversation_id)
            .cloned()
            .collect();

        let total = matching.len() as i64;
        matching.sort_unstable_by(|a, b| b.created_at.cmp(&a.created_at));
        let offset = offset.max(0) as usize;
        let limit = limit.max(0) as usize;

        Ok((matching.into_iter().skip(offset).take(limit).collect(), total))
    }

    async fn mark_read(&self, conversation_id: Uuid, reader_id: Uuid) -> AppResult<u64> {
        let now = Utc::now();
        let mut marked = 0;
        let mut messages = self.messages.lock().expect("messages mutex poisoned");
        for message in messages.iter_mut() {
            if message.conversation_id == conversation_id
                && message.sender_id != reader_id
                && !message.is_read
            {
                message.is_read = true;
                message.status = MessageStatus::Read;
                message.read_at = Some(now);
                message.updated_at = now;
                marked += 1;
            }
        }
        Ok(marked)
    }

    async fn count_unread(&self, conversation_id: Uuid, user_id: Uuid) -> AppResult<i64> {
        Ok(self
            .messages
            .lock()
            .expect("messages mutex poisoned")
            .iter()
            .filter(|m| {
                m.conversation_id == conversation_id && m.sender_id != user_id && !m.is_read
            })
            .count() as i64)
    }

    async fn delete(&self, id: Uuid, requester_id: Uuid) -> AppResult<bool> {
        let mut messages = self.messages.lock().expect("messages mutex poisoned");
        let Some(position) = messages.iter().position(|m| m.id == id) else {
            return Ok(false);
        };

        if messages[position].sender_id != requester_id {
            return Err(AppError::Forbidden(
                "Only the sender can delete a message".to_string(),
            ));
        }

        messages.remove(position);
        Ok(true)
    }
}
