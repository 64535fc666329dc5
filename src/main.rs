use std::sync::Arc;
use std::time::Instant;

use actix_web::dev::Service as _;
use actix_web::{middleware::Logger, web, App, HttpServer};
use messaging_backend::api::routes::{self, AppState};
use messaging_backend::application::MessagingService;
use messaging_backend::config::AppConfig;
use messaging_backend::infrastructure::db::{migrations::run_migrations, pool::create_pool};
use messaging_backend::infrastructure::gateways::{
    NoopNotificationGateway, NotificationGateway, WebhookNotificationGateway,
};
use messaging_backend::infrastructure::repositories::{
    ConversationRepositoryImpl, MessageRepositoryImpl, UserDirectoryImpl,
};
use messaging_backend::observability::error_tracking::capture_unexpected_5xx;
use messaging_backend::observability::AppMetrics;
use messaging_backend::security::{cors_middleware, security_headers};
use tracing::info;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};
use uuid::Uuid;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenvy::dotenv().ok();

    let config = AppConfig::from_env().expect("failed to load application configuration");

    tracing_subscriber::registry()
        .with(EnvFilter::new(config.logging.level.clone()))
        .with(
            fmt::layer()
                .json()
                .with_current_span(true)
                .with_span_list(true),
        )
        .init();

    let pool = create_pool(&config.database)
        .await
        .expect("failed to create database pool");

    run_migrations(&pool)
        .await
        .expect("database migrations failed");

    let conversation_repo = Arc::new(ConversationRepositoryImpl::new(pool.clone()));
    let message_repo = Arc::new(MessageRepositoryImpl::new(pool.clone()));
    let user_directory = Arc::new(UserDirectoryImpl::new(pool.clone()));

    let ws_hub = routes::ws::WsConnectionHub::default();
    let presence = Arc::new(routes::ws::WsPresenceGateway::new(ws_hub.clone()));

    let notifier: Arc<dyn NotificationGateway> = match config
        .notification
        .webhook_url
        .as_deref()
        .filter(|_| config.notification.enabled)
    {
        Some(webhook_url) => Arc::new(
            WebhookNotificationGateway::new(&config.notification, webhook_url.to_string())
                .expect("failed to build notification webhook client"),
        ),
        None => Arc::new(NoopNotificationGateway),
    };

    let state = AppState {
        messaging_service: Arc::new(MessagingService::new(
            conversation_repo,
            message_repo,
            user_directory,
            presence,
            notifier,
        )),
        security: config.security.clone(),
        app_environment: config.app.environment.clone(),
        metrics: Arc::new(AppMetrics::default()),
        db_pool: pool.clone(),
        ws_hub,
    };

    let bind_host = config.app.host.clone();
    let bind_port = config.app.port;
    let security_config = config.security.clone();
    let metrics = state.metrics.clone();

    info!(host = %bind_host, port = bind_port, "starting messaging backend");

    HttpServer::new(move || {
        let metrics = metrics.clone();
        App::new()
            .wrap(Logger::default())
            .wrap_fn(move |req, srv| {
                let request_id = Uuid::new_v4().to_string();
                let path = req.path().to_string();
                let method = req.method().to_string();
                let metrics = metrics.clone();
                let start = Instant::now();

                let fut = srv.call(req);
                async move {
                    match fut.await {
                        Ok(mut response) => {
                            response.headers_mut().insert(
                                actix_web::http::header::HeaderName::from_static("x-request-id"),
                                actix_web::http::header::HeaderValue::from_str(&request_id)
                                    .unwrap_or_else(|_| {
                                        actix_web::http::header::HeaderValue::from_static(
                                            "invalid-request-id",
                                        )
                                    }),
                            );

                            let status = response.status().as_u16();
                            let latency_ms = start.elapsed().as_millis() as u64;
                            metrics.record_request(status, latency_ms);

                            info!(
                                request_id = %request_id,
                                method = %method,
                                path = %path,
                                status = status,
                                latency_ms = latency_ms,
                                "request completed"
                            );

                            if status >= 500 {
                                let _ = capture_unexpected_5xx(&path, &method, status, &request_id);
                            }
                            Ok(response)
                        }
                        Err(error) => Err(error),
                    }
                }
            })
            .wrap(cors_middleware(&security_config))
            .wrap(security_headers())
            .app_data(web::Data::new(state.clone()))
            .configure(routes::configure)
    })
    .bind((bind_host, bind_port))?
    .run()
    .await
}
