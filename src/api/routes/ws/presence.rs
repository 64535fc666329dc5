use async_trait::async_trait;
use chrono::Utc;
use serde_json::json;
use uuid::Uuid;

use crate::api::dtos::MessageResponse;
use crate::domain::Message;
use crate::infrastructure::gateways::PresenceGateway;

use super::WsConnectionHub;

/// Presence backed by the websocket hub: a user is online while they hold an
/// open session, and pushes go out as server envelopes on that session.
#[derive(Clone)]
pub struct WsPresenceGateway {
    hub: WsConnectionHub,
}

impl WsPresenceGateway {
    pub fn new(hub: WsConnectionHub) -> Self {
        Self { hub }
    }
}

#[async_trait]
impl PresenceGateway for WsPresenceGateway {
    async fn is_online(&self, user_id: Uuid) -> bool {
        self.hub.is_connected(user_id)
    }

    async fn push_message(&self, recipient_id: Uuid, message: &Message) {
        let event = json!({
            "type": "message",
            "payload": MessageResponse::from(message.clone()),
        });
        self.hub.send_to_user(recipient_id, &event.to_string());
    }

    async fn push_read_receipt(&self, recipient_id: Uuid, conversation_id: Uuid, reader_id: Uuid) {
        let event = json!({
            "type": "read",
            "payload": {
                "conversation_id": conversation_id,
                "user_id": reader_id,
                "read_at": Utc::now(),
            }
        });
        self.hub.send_to_user(recipient_id, &event.to_string());
    }
}
