use actix_web::{web, HttpRequest, HttpResponse};
use serde::Deserialize;
use uuid::Uuid;

use crate::api::dtos::{CreateConversationRequest, SendMessageRequest};
use crate::api::routes::{user_id_from_header, AppState};
use crate::error::AppResult;

const DEFAULT_PAGE_SIZE: i64 = 20;
const MAX_PAGE_SIZE: i64 = 100;

#[derive(Debug, Deserialize)]
struct PageQuery {
    page: Option<i64>,
    limit: Option<i64>,
}

impl PageQuery {
    fn page(&self) -> i64 {
        self.page.unwrap_or(1).max(1)
    }

    fn limit(&self) -> i64 {
        self.limit
            .unwrap_or(DEFAULT_PAGE_SIZE)
            .clamp(1, MAX_PAGE_SIZE)
    }
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/conversations")
            .route("", web::get().to(list_conversations))
            .route("", web::post().to(create_conversation))
            .route("/{id}", web::get().to(get_conversation))
            .route("/{id}/messages", web::get().to(list_messages))
            .route("/{id}/messages", web::post().to(send_message))
            .route("/{id}/read", web::post().to(mark_read)),
    )
    .route("/messages/{id}", web::delete().to(delete_message));
}

async fn list_conversations(
    state: web::Data<AppState>,
    request: HttpRequest,
    query: web::Query<PageQuery>,
) -> AppResult<HttpResponse> {
    let user_id = user_id_from_header(&request)?;
    let limit = query.limit();
    let offset = (query.page() - 1) * limit;
    let result = state
        .messaging_service
        .list_conversations(user_id, limit, offset)
        .await?;
    Ok(HttpResponse::Ok().json(result))
}

async fn create_conversation(
    state: web::Data<AppState>,
    request: HttpRequest,
    payload: web::Json<CreateConversationRequest>,
) -> AppResult<HttpResponse> {
    let user_id = user_id_from_header(&request)?;
    let result = state
        .messaging_service
        .create_or_find_conversation(user_id, payload.into_inner())
        .await?;
    Ok(HttpResponse::Created().json(result))
}

async fn get_conversation(
    state: web::Data<AppState>,
    request: HttpRequest,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    let user_id = user_id_from_header(&request)?;
    let result = state
        .messaging_service
        .get_conversation(user_id, path.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(result))
}

async fn list_messages(
    state: web::Data<AppState>,
    request: HttpRequest,
    path: web::Path<Uuid>,
    query: web::Query<PageQuery>,
) -> AppResult<HttpResponse> {
    let user_id = user_id_from_header(&request)?;
    let result = state
        .messaging_service
        .list_messages(user_id, path.into_inner(), query.page(), query.limit())
        .await?;
    Ok(HttpResponse::Ok().json(result))
}

async fn send_message(
    state: web::Data<AppState>,
    request: HttpRequest,
    path: web::Path<Uuid>,
    payload: web::Json<SendMessageRequest>,
) -> AppResult<HttpResponse> {
    let user_id = user_id_from_header(&request)?;
    let result = state
        .messaging_service
        .send_message(user_id, path.into_inner(), payload.into_inner())
        .await?;
    state.metrics.record_message_sent();
    Ok(HttpResponse::Created().json(result))
}

async fn mark_read(
    state: web::Data<AppState>,
    request: HttpRequest,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    let user_id = user_id_from_header(&request)?;
    let result = state
        .messaging_service
        .mark_conversation_read(user_id, path.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(result))
}

async fn delete_message(
    state: web::Data<AppState>,
    request: HttpRequest,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    let user_id = user_id_from_header(&request)?;
    let deleted = state
        .messaging_service
        .delete_message(user_id, path.into_inner())
        .await?;
    if deleted {
        Ok(HttpResponse::NoContent().finish())
    } else {
        Ok(HttpResponse::NotFound().finish())
    }
}
