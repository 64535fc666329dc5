use serde_json::{json, Value};
use uuid::Uuid;

use crate::api::dtos::SendMessageRequest;
use crate::application::MessagingService;
use crate::domain::MessageKind;
use crate::error::{AppError, AppResult};
use crate::observability::AppMetrics;

use super::messages::{
    parse_read_payload, parse_send_message_payload, parse_typing_payload, parse_ws_envelope,
};
use super::WsConnectionHub;

pub(super) async fn handle_text_message(
    session: &mut actix_ws::Session,
    messaging_service: &std::sync::Arc<MessagingService>,
    hub: &WsConnectionHub,
    metrics: &AppMetrics,
    user_id: Uuid,
    text: String,
) -> AppResult<()> {
    let envelope = parse_ws_envelope(&text)?;

    match envelope.message_type.as_str() {
        "ping" => {
            let payload = json!({ "type": "pong" });
            session
                .text(payload.to_string())
                .await
                .map_err(|_| AppError::InternalError(anyhow::anyhow!("failed to send pong")))?;
        }
        "message" => {
            handle_send(messaging_service, hub, metrics, user_id, envelope.payload).await?;
        }
        "typing" => {
            handle_typing(messaging_service, hub, user_id, envelope.payload).await?;
        }
        "read" => {
            handle_read(messaging_service, hub, user_id, envelope.payload).await?;
        }
        _ => {
            let payload = json!({ "type": "error", "payload": { "code": "UNSUPPORTED_TYPE" } });
            session.text(payload.to_string()).await.map_err(|_| {
                AppError::InternalError(anyhow::anyhow!("failed to send error event"))
            })?;
        }
    }

    Ok(())
}

/// Persists the message, then echoes it to the sender's own sessions.
///
/// The counterpart is delivered exactly once, by the presence gateway inside
/// `send_message`; the hub write here must not target them again.
pub(super) async fn handle_send(
    messaging_service: &std::sync::Arc<MessagingService>,
    hub: &WsConnectionHub,
    metrics: &AppMetrics,
    user_id: Uuid,
    payload: Option<Value>,
) -> AppResult<()> {
    let parsed = parse_send_message_payload(payload)?;

    let saved = messaging_service
        .send_message(
            user_id,
            parsed.conversation_id,
            SendMessageRequest {
                body: parsed.body,
                kind: parsed.kind.unwrap_or(MessageKind::Text),
                attachment_url: parsed.attachment_url,
            },
        )
        .await?;
    metrics.record_message_sent();

    let echo = json!({ "type": "message", "payload": saved });
    hub.send_to_user(user_id, &echo.to_string());
    Ok(())
}

/// Typing indicators are not persisted, so the hub fan-out to both
/// participants is the only delivery path.
pub(super) async fn handle_typing(
    messaging_service: &std::sync::Arc<MessagingService>,
    hub: &WsConnectionHub,
    user_id: Uuid,
    payload: Option<Value>,
) -> AppResult<()> {
    let parsed = parse_typing_payload(payload)?;
    let participants = messaging_service
        .participant_ids(user_id, parsed.conversation_id)
        .await?;
    let event = json!({
        "type": "typing",
        "payload": {
            "conversation_id": parsed.conversation_id,
            "user_id": user_id,
            "is_typing": parsed.is_typing.unwrap_or(true),
        }
    });
    hub.broadcast_to_users(&participants, &event.to_string());
    Ok(())
}

/// Marks the conversation read and confirms to the reader's own sessions.
/// The counterpart's read receipt is pushed by `mark_conversation_read`.
pub(super) async fn handle_read(
    messaging_service: &std::sync::Arc<MessagingService>,
    hub: &WsConnectionHub,
    user_id: Uuid,
    payload: Option<Value>,
) -> AppResult<()> {
    let parsed = parse_read_payload(payload)?;
    let result = messaging_service
        .mark_conversation_read(user_id, parsed.conversation_id)
        .await?;
    let confirmation = json!({ "type": "read", "payload": result });
    hub.send_to_user(user_id, &confirmation.to_string());
    Ok(())
}
