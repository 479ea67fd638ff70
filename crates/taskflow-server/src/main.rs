#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

mod api;
mod config;

use api::state::AppState;
use api::{categories::*, chat::*, todos::*};
use axum::{
    Json, Router,
    http::{Method, header},
    routing::{delete, get, post},
};
use config::ServerConfig;
use std::sync::Arc;
use taskflow_ai::{ChatClient, OllamaClient};
use taskflow_storage::{Storage, paths, seed};
use tower_http::cors::CorsLayer;

#[derive(serde::Serialize)]
struct Health {
    status: String,
    timestamp: String,
}

async fn health() -> Json<Health> {
    Json(Health {
        status: "ok".to_string(),
        timestamp: chrono::Utc::now().to_rfc3339(),
    })
}

#[tokio::main]
async fn main() {
    // Initialize tracing logger
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,taskflow_server=debug".into()),
        )
        .with_target(false)
        .init();

    tracing::info!("Starting TaskFlow server");

    let server_config = ServerConfig::from_env();

    let db_path =
        paths::ensure_database_path_string().expect("Failed to determine TaskFlow database path");
    let storage = Arc::new(Storage::new(&db_path).expect("Failed to initialize storage"));

    if let Err(e) = seed::ensure_seed_data(&storage) {
        tracing::warn!(error = %e, "Failed to initialize seed data");
    }

    let chat: Arc<dyn ChatClient> = Arc::new(OllamaClient::from_env());
    tracing::info!(model = chat.model(), "Chat client configured");

    let state = AppState::new(storage, chat);

    // Configure CORS
    let cors = CorsLayer::new()
        .allow_origin(tower_http::cors::Any)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION]);

    let app = Router::new()
        .route("/api/health", get(health))
        // Todo management (RESTful)
        .route("/api/todos", get(list_todos).post(create_todo))
        .route("/api/todos/completed/clear", delete(clear_completed))
        .route(
            "/api/todos/{id}",
            get(get_todo).put(update_todo).delete(delete_todo),
        )
        // Category management
        .route(
            "/api/categories",
            get(list_categories).post(create_category),
        )
        .route(
            "/api/categories/{id}",
            get(get_category).delete(delete_category),
        )
        // Chat endpoints
        .route("/api/chat", post(send_chat))
        .route("/api/chat/stream", post(stream_chat))
        .route("/api/chat/models", get(list_models))
        .layer(cors)
        .with_state(state);

    let listener = tokio::net::TcpListener::bind(server_config.bind_addr())
        .await
        .expect("Failed to bind server port");

    tracing::info!("TaskFlow running on http://localhost:{}", server_config.port);

    axum::serve(listener, app)
        .await
        .expect("Failed to start server");
}
