use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde_json::json;
use thiserror::Error;
use tracing::debug;
use uuid::Uuid;

use crate::config::NotificationConfig;
use crate::domain::Message;

#[derive(Debug, Error)]
pub enum DeliveryError {
    #[error("notification transport error: {0}")]
    Transport(String),

    #[error("notification endpoint rejected the alert: status {0}")]
    Rejected(u16),
}

/// Out-of-band alert channel for recipients without an active realtime
/// connection. Failures are reported as `DeliveryError` and it is the
/// caller's contract to log and swallow them: a stored message never becomes
/// a failed send because the alert did not go out.
#[async_trait]
pub trait NotificationGateway: Send + Sync {
    async fn notify_new_message(
        &self,
        recipient_id: Uuid,
        sender_id: Uuid,
        message: &Message,
    ) -> Result<(), DeliveryError>;
}

/// Posts alert payloads to the notification webhook (the mail/push relay is
/// a separate service behind that URL). The request carries a client-level
/// timeout so a slow relay cannot hold the send path hostage.
pub struct WebhookNotificationGateway {
    client: Client,
    webhook_url: String,
}

impl WebhookNotificationGateway {
    pub fn new(config: &NotificationConfig, webhook_url: String) -> Result<Self, DeliveryError> {
        let client = Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .build()
            .map_err(|err| DeliveryError::Transport(err.to_string()))?;

        Ok(Self {
            client,
            webhook_url,
        })
    }
}

#[async_trait]
impl NotificationGateway for WebhookNotificationGateway {
    async fn notify_new_message(
        &self,
        recipient_id: Uuid,
        sender_id: Uuid,
        message: &Message,
    ) -> Result<(), DeliveryError> {
        let payload = json!({
            "event": "message.new",
            "recipient_id": recipient_id,
            "sender_id": sender_id,
            "conversation_id": message.conversation_id,
            "message_id": message.id,
            "preview": message.preview(),
            "sent_at": message.created_at,
        });

        let response = self
            .client
            .post(&self.webhook_url)
            .json(&payload)
            .send()
            .await
            .map_err(|err| DeliveryError::Transport(err.to_string()))?;

        if !response.status().is_success() {
            return Err(DeliveryError::Rejected(response.status().as_u16()));
        }

        debug!(
            recipient_id = %recipient_id,
            message_id = %message.id,
            "offline notification dispatched"
        );
        Ok(())
    }
}

/// Explicit no-op used when no webhook is configured; never a nullable field.
pub struct NoopNotificationGateway;

#[async_trait]
impl NotificationGateway for NoopNotificationGateway {
    async fn notify_new_message(
        &self,
        _recipient_id: Uuid,
        _sender_id: Uuid,
        _message: &Message,
    ) -> Result<(), DeliveryError> {
        Ok(())
    }
}
