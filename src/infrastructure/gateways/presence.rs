use crate::domain::Message;
use async_trait::async_trait;
use uuid::Uuid;

/// Realtime delivery to currently connected users. Pushes are best-effort:
/// implementations must not surface transport failures to callers.
#[async_trait]
pub trait PresenceGateway: Send + Sync {
    async fn is_online(&self, user_id: Uuid) -> bool;
    async fn push_message(&self, recipient_id: Uuid, message: &Message);
    async fn push_read_receipt(&self, recipient_id: Uuid, conversation_id: Uuid, reader_id: Uuid);
}

/// Explicit stand-in for deployments without a realtime channel. Everyone is
/// offline, so every send falls through to the notification gateway.
pub struct NoopPresenceGateway;

#[async_trait]
impl PresenceGateway for NoopPresenceGateway {
    async fn is_online(&self, _user_id: Uuid) -> bool {
        false
    }

    async fn push_message(&self, _recipient_id: Uuid, _message: &Message) {}

    async fn push_read_receipt(
        &self,
        _recipient_id: Uuid,
        _conversation_id: Uuid,
        _reader_id: Uuid,
    ) {
    }
}
