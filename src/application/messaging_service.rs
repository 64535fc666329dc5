use std::collections::HashMap;
use std::sync::Arc;

use chrono::Utc;
use tracing::{info, warn};
use uuid::Uuid;
use validator::Validate;

use crate::api::dtos::{
    ConversationResponse, CreateConversationRequest, MarkReadResponse, MessageListResponse,
    MessageResponse, Pagination, ParticipantResponse, SendMessageRequest,
};
use crate::domain::{Conversation, Message, MessageKind, MessageStatus, UserSummary};
use crate::error::{AppError, AppResult};
use crate::infrastructure::gateways::{NotificationGateway, PresenceGateway};
use crate::infrastructure::repositories::{ConversationStore, MessageStore, UserDirectory};

/// Coordination core of the messaging subsystem.
///
/// Every mutation validates conversation existence and participancy first;
/// realtime and notification side effects run after the durable writes and
/// are never allowed to fail the request.
#[derive(Clone)]
pub struct MessagingService {
    conversations: Arc<dyn ConversationStore>,
    messages: Arc<dyn MessageStore>,
    directory: Arc<dyn UserDirectory>,
    presence: Arc<dyn PresenceGateway>,
    notifier: Arc<dyn NotificationGateway>,
}

impl MessagingService {
    pub fn new(
        conversations: Arc<dyn ConversationStore>,
        messages: Arc<dyn MessageStore>,
        directory: Arc<dyn UserDirectory>,
        presence: Arc<dyn PresenceGateway>,
        notifier: Arc<dyn NotificationGateway>,
    ) -> Self {
        Self {
            conversations,
            messages,
            directory,
            presence,
            notifier,
        }
    }

    pub async fn create_or_find_conversation(
        &self,
        user_id: Uuid,
        request: CreateConversationRequest,
    ) -> AppResult<ConversationResponse> {
        if request.recipient_id == user_id {
            return Err(AppError::BadRequest(
                "cannot start a conversation with yourself".to_string(),
            ));
        }

        let counterpart = self
            .directory
            .find_summary(request.recipient_id)
            .await?
            .ok_or_else(|| AppError::NotFound("recipient not found".to_string()))?;

        let conversation = self
            .conversations
            .create_or_find(user_id, request.recipient_id)
            .await?;

        Ok(conversation_response(conversation, user_id, Some(counterpart)))
    }

    pub async fn list_conversations(
        &self,
        user_id: Uuid,
        limit: i64,
        offset: i64,
    ) -> AppResult<Vec<ConversationResponse>> {
        let conversations = self
            .conversations
            .find_by_user(user_id, limit, offset)
            .await?;

        let counterpart_ids: Vec<Uuid> = conversations
            .iter()
            .filter_map(|conversation| conversation.counterpart_of(user_id))
            .collect();
        let mut summaries: HashMap<Uuid, UserSummary> = self
            .directory
            .find_summaries(&counterpart_ids)
            .await?
            .into_iter()
            .map(|summary| (summary.id, summary))
            .collect();

        Ok(conversations
            .into_iter()
            .map(|conversation| {
                let counterpart = conversation
                    .counterpart_of(user_id)
                    .and_then(|id| summaries.remove(&id));
                conversation_response(conversation, user_id, counterpart)
            })
            .collect())
    }

    pub async fn get_conversation(
        &self,
        user_id: Uuid,
        conversation_id: Uuid,
    ) -> AppResult<ConversationResponse> {
        let conversation = self.load_for_participant(user_id, conversation_id).await?;
        let counterpart = match conversation.counterpart_of(user_id) {
            Some(id) => self.directory.find_summary(id).await?,
            None => None,
        };
        Ok(conversation_response(conversation, user_id, counterpart))
    }

    pub async fn list_messages(
        &self,
        user_id: Uuid,
        conversation_id: Uuid,
        page: i64,
        limit: i64,
    ) -> AppResult<MessageListResponse> {
        self.load_for_participant(user_id, conversation_id).await?;

        let page = page.max(1);
        let offset = (page - 1) * limit;
        let (messages, total) = self
            .messages
            .list_by_conversation(conversation_id, limit, offset)
            .await?;

        Ok(MessageListResponse {
            messages: messages.into_iter().map(MessageResponse::from).collect(),
            pagination: Pagination::new(page, limit, total),
        })
    }

    pub async fn send_message(
        &self,
        sender_id: Uuid,
        conversation_id: Uuid,
        request: SendMessageRequest,
    ) -> AppResult<MessageResponse> {
        request.validate()?;

        let conversation = self.load_for_participant(sender_id, conversation_id).await?;

        if request.kind == MessageKind::Text && request.body.trim().is_empty() {
            return Err(AppError::validation_error(
                "message body is required for text messages",
            ));
        }

        let now = Utc::now();
        let message = Message {
            id: Uuid::new_v4(),
            conversation_id,
            sender_id,
            body: request.body,
            kind: request.kind,
            attachment_url: request.attachment_url,
            status: MessageStatus::Sent,
            is_read: false,
            delivered_at: None,
            read_at: None,
            created_at: now,
            updated_at: now,
        };

        let created = self.messages.create(&message).await?;

        self.conversations
            .update_preview(conversation_id, &created.preview(), created.created_at)
            .await?;

        // Resolve the counterpart exactly once; the same id feeds the unread
        // increment and the delivery branch below.
        let recipient_id = conversation.counterpart_of(sender_id).ok_or_else(|| {
            AppError::InternalError(anyhow::anyhow!(
                "sender passed participancy check but has no counterpart"
            ))
        })?;
        self.conversations
            .increment_unread(conversation_id, recipient_id)
            .await?;

        info!(
            message_id = %created.id,
            conversation_id = %conversation_id,
            sender_id = %sender_id,
            "message stored"
        );

        // Best-effort delivery: the message is durable at this point and a
        // realtime or notification failure must not fail the send.
        if self.presence.is_online(recipient_id).await {
            self.presence.push_message(recipient_id, &created).await;
        } else if let Err(error) = self
            .notifier
            .notify_new_message(recipient_id, sender_id, &created)
            .await
        {
            warn!(
                recipient_id = %recipient_id,
                message_id = %created.id,
                error = %error,
                "offline notification delivery failed"
            );
        }

        Ok(created.into())
    }

    pub async fn mark_conversation_read(
        &self,
        reader_id: Uuid,
        conversation_id: Uuid,
    ) -> AppResult<MarkReadResponse> {
        let conversation = self.load_for_participant(reader_id, conversation_id).await?;

        let marked_read = self.messages.mark_read(conversation_id, reader_id).await?;
        self.conversations
            .reset_unread(conversation_id, reader_id)
            .await?;

        if marked_read > 0 {
            if let Some(counterpart_id) = conversation.counterpart_of(reader_id) {
                if self.presence.is_online(counterpart_id).await {
                    self.presence
                        .push_read_receipt(counterpart_id, conversation_id, reader_id)
                        .await;
                }
            }
        }

        Ok(MarkReadResponse {
            conversation_id,
            marked_read,
        })
    }

    pub async fn delete_message(&self, requester_id: Uuid, message_id: Uuid) -> AppResult<bool> {
        self.messages.delete(message_id, requester_id).await
    }

    /// Both participant ids, gated on the caller being one of them. Used by
    /// the realtime layer for non-persisted fan-out (typing indicators).
    pub async fn participant_ids(
        &self,
        user_id: Uuid,
        conversation_id: Uuid,
    ) -> AppResult<Vec<Uuid>> {
        let conversation = self.load_for_participant(user_id, conversation_id).await?;
        Ok(vec![conversation.participant_a, conversation.participant_b])
    }

    async fn load_for_participant(
        &self,
        user_id: Uuid,
        conversation_id: Uuid,
    ) -> AppResult<Conversation> {
        let conversation = self
            .conversations
            .find_by_id(conversation_id)
            .await?
            .ok_or_else(|| AppError::NotFound("conversation not found".to_string()))?;

        if !conversation.is_participant(user_id) {
            return Err(AppError::not_participant());
        }

        Ok(conversation)
    }
}

fn conversation_response(
    conversation: Conversation,
    viewer_id: Uuid,
    counterpart: Option<UserSummary>,
) -> ConversationResponse {
    let unread_count = conversation.unread_for(viewer_id);
    ConversationResponse {
        id: conversation.id,
        counterpart: counterpart.map(ParticipantResponse::from),
        last_message_preview: conversation.last_message_preview,
        last_message_at: conversation.last_message_at,
        unread_count,
        created_at: conversation.created_at,
        updated_at: conversation.updated_at,
    }
}
