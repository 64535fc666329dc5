use std::time::Duration;

use actix_web::{web, HttpRequest, HttpResponse};
use futures_util::StreamExt;
use serde_json::json;
use tokio::sync::mpsc;
use uuid::Uuid;

use crate::api::routes::{user_id_from_header, AppState};
use crate::error::{AppError, AppResult};

mod handlers;
mod hub;
mod messages;
mod presence;
#[cfg(test)]
mod tests;

use self::handlers::handle_text_message;
#[cfg(test)]
use self::messages::{
    parse_read_payload, parse_send_message_payload, parse_typing_payload, parse_ws_envelope,
};

pub use self::hub::WsConnectionHub;
pub use self::messages::{WsClientEnvelope, WsReadPayload, WsSendMessagePayload, WsTypingPayload};
pub use self::presence::WsPresenceGateway;

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/ws", web::get().to(ws_upgrade));
}

async fn ws_upgrade(
    request: HttpRequest,
    payload: web::Payload,
    state: web::Data<AppState>,
) -> AppResult<HttpResponse> {
    if state.app_environment == "production" && !is_secure_ws_request(&request) {
        return Err(AppError::BadRequest(
            "wss is required in production".to_string(),
        ));
    }

    let user_id = user_id_from_header(&request)?;

    let (response, session, stream) = actix_ws::handle(&request, payload)
        .map_err(|_| AppError::BadRequest("invalid websocket upgrade".to_string()))?;

    let messaging_service = state.messaging_service.clone();
    let hub = state.ws_hub.clone();
    let outbound_rx = hub.register(user_id);
    let metrics = state.metrics.clone();
    metrics.ws_connected();
    actix_web::rt::spawn(async move {
        let _ = ws_loop(
            session,
            stream,
            outbound_rx,
            messaging_service,
            hub.clone(),
            metrics.clone(),
            user_id,
        )
        .await;
        hub.prune_user(user_id);
        metrics.ws_disconnected();
    });

    Ok(response)
}

fn is_secure_ws_request(request: &HttpRequest) -> bool {
    if request.connection_info().scheme() == "https" {
        return true;
    }

    request
        .headers()
        .get("x-forwarded-proto")
        .and_then(|value| value.to_str().ok())
        .is_some_and(|proto| proto.eq_ignore_ascii_case("https"))
}

async fn ws_loop(
    mut session: actix_ws::Session,
    mut stream: actix_ws::MessageStream,
    mut outbound_rx: mpsc::UnboundedReceiver<String>,
    messaging_service: std::sync::Arc<crate::application::MessagingService>,
    hub: WsConnectionHub,
    metrics: std::sync::Arc<crate::observability::AppMetrics>,
    user_id: Uuid,
) -> AppResult<()> {
    let heartbeat_interval = Duration::from_secs(30);
    let heartbeat_timeout = Duration::from_secs(90);
    let mut heartbeat = tokio::time::interval(heartbeat_interval);
    let mut last_seen = tokio::time::Instant::now();

    loop {
        tokio::select! {
            _ = heartbeat.tick() => {
                if last_seen.elapsed() > heartbeat_timeout {
                    let _ = session.close(None).await;
                    break;
                }
                if session.ping(b"ping").await.is_err() {
                    break;
                }
            }
            maybe_message = stream.next() => {
                let Some(Ok(message)) = maybe_message else {
                    break;
                };

                match message {
                    actix_ws::Message::Ping(bytes) => {
                        last_seen = tokio::time::Instant::now();
                        if session.pong(&bytes).await.is_err() {
                            break;
                        }
                    }
                    actix_ws::Message::Pong(_) => {
                        last_seen = tokio::time::Instant::now();
                    }
                    actix_ws::Message::Text(text) => {
                        last_seen = tokio::time::Instant::now();
                        if let Err(error) =
                            handle_text_message(
                                &mut session,
                                &messaging_service,
                                &hub,
                                &metrics,
                                user_id,
                                text.to_string(),
                            )
                                .await
                        {
                            match error {
                                AppError::BadRequest(_) => {
                                    let payload =
                                        json!({ "type": "error", "payload": { "code": "BAD_MESSAGE" } });
                                    if session.text(payload.to_string()).await.is_err() {
                                        break;
                                    }
                                }
                                _ => break,
                            }
                        }
                    }
                    actix_ws::Message::Close(reason) => {
                        let _ = session.close(reason).await;
                        break;
                    }
                    actix_ws::Message::Binary(_) => {
                        let payload = json!({ "type": "error", "payload": { "code": "UNSUPPORTED_BINARY" } });
                        if session.text(payload.to_string()).await.is_err() {
                            break;
                        }
                    }
                    _ => {}
                }
            }
            maybe_outbound = outbound_rx.recv() => {
                let Some(payload) = maybe_outbound else {
                    break;
                };
                if session.text(payload).await.is_err() {
                    break;
                }
            }
        }
    }

    Ok(())
}
