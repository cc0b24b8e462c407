//! services/api/src/bin/api.rs

use api_lib::{
    adapters::{HttpLeadNotifier, HttpPageContentSource, JsonFileAdapter},
    config::Config,
    error::ApiError,
    web::{
        create_contact_handler, create_newsletter_handler, delete_contact_handler,
        delete_newsletter_handler, get_chat_sessions_handler, list_contact_handler,
        list_newsletter_handler, page_handler, post_chat_message_handler, rest::ApiDoc,
        state::AppState, update_contact_status_handler,
    },
};
use axum::{
    http::{
        header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE},
        HeaderValue, Method,
    },
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;
use tower_http::cors::CorsLayer;

#[tokio::main]
async fn main() -> Result<(), ApiError> {
    // --- 1. Load Configuration & Set Up Logging ---
    let config = Arc::new(Config::from_env()?);
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(config.log_level.to_string()))
        .with(tracing_subscriber::fmt::layer())
        .init();
    info!("Configuration loaded. Starting server...");

    // --- 2. Initialize the File-Backed Record Store ---
    info!("Using data directory {}", config.data_dir.display());
    let store = Arc::new(JsonFileAdapter::new(&config.data_dir));

    // --- 3. Initialize the Outbound HTTP Adapters ---
    let http_client = reqwest::Client::new();
    let notifier = Arc::new(HttpLeadNotifier::new(
        http_client.clone(),
        config.notify_url.clone(),
    ));
    let content_source = Arc::new(HttpPageContentSource::new(
        http_client,
        config.cms_base_url.clone(),
    ));

    // --- 4. Build the Shared AppState ---
    let app_state = AppState {
        contact_store: store.clone(),
        newsletter_store: store.clone(),
        chat_store: store,
        notifier,
        content_source,
        config: config.clone(),
    };

    let cors_origin = config
        .cors_origin
        .parse::<HeaderValue>()
        .map_err(|_| ApiError::Internal(format!("Invalid CORS_ORIGIN '{}'", config.cors_origin)))?;
    let cors = CorsLayer::new()
        .allow_origin(cors_origin)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([AUTHORIZATION, CONTENT_TYPE, ACCEPT]);

    // --- 5. Create the Web Router ---
    let api_router = Router::new()
        .route(
            "/api/contact",
            post(create_contact_handler)
                .get(list_contact_handler)
                .patch(update_contact_status_handler)
                .delete(delete_contact_handler),
        )
        .route(
            "/api/newsletter",
            post(create_newsletter_handler)
                .get(list_newsletter_handler)
                .delete(delete_newsletter_handler),
        )
        .route(
            "/api/chat/message",
            post(post_chat_message_handler).get(get_chat_sessions_handler),
        )
        .route("/pages/{*path}", get(page_handler))
        .route("/health", get(|| async { "ok" }))
        .layer(cors)
        .with_state(app_state);

    // Merge the API router with the Swagger UI router for a complete application.
    let app = Router::new()
        .merge(api_router)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()));

    // --- 6. Start the Server ---
    info!("Starting server on {}", config.bind_address);
    info!(
        "Swagger UI available at http://{}/swagger-ui",
        config.bind_address
    );
    let listener = tokio::net::TcpListener::bind(&config.bind_address).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
