use std::sync::Arc;

use axum::{
    extract::State,
    http::{HeaderValue, Method, StatusCode},
    middleware::from_fn_with_state,
    response::{IntoResponse, Json},
    routing::{get, post},
    Router,
};
use serde_json::{json, Value};
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    trace::TraceLayer,
};

use crate::auth::TokenKeys;
use crate::config::AppConfig;
use crate::database::{JsonFileStore, TodoRepository, UserRepository};
use crate::handlers::{protected::todo, public::auth};
use crate::middleware::jwt_auth_middleware;

/// Everything a handler needs, built once from configuration
#[derive(Clone, Debug)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub tokens: Arc<TokenKeys>,
    pub todos: TodoRepository,
    pub users: UserRepository,
}

impl AppState {
    pub fn new(config: AppConfig) -> Self {
        let tokens = TokenKeys::from_config(&config.security);
        let todos = TodoRepository::new(JsonFileStore::new(config.storage.todos_file.clone()));
        let users = UserRepository::new(JsonFileStore::new(config.storage.users_file.clone()));

        Self {
            config: Arc::new(config),
            tokens: Arc::new(tokens),
            todos,
            users,
        }
    }
}

pub fn app(state: AppState) -> Router {
    let cors = cors_layer(&state.config);

    Router::new()
        // Public
        .route("/", get(root))
        .route("/health", get(health))
        .merge(auth_public_routes())
        // Protected
        .merge(todo_routes(state.clone()))
        // Global middleware
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn auth_public_routes() -> Router<AppState> {
    Router::new()
        .route("/register", post(auth::register))
        .route("/login", post(auth::login))
}

fn todo_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route(
            "/todo",
            get(todo::collection_get).post(todo::collection_post),
        )
        .route(
            "/todo/:index",
            get(todo::record_get)
                .put(todo::record_put)
                .delete(todo::record_delete),
        )
        .route_layer(from_fn_with_state(state, jwt_auth_middleware))
}

fn cors_layer(config: &AppConfig) -> CorsLayer {
    let security = &config.security;
    if !security.enable_cors {
        return CorsLayer::new();
    }
    if security.cors_origins.is_empty() {
        return CorsLayer::permissive();
    }

    let origins: Vec<HeaderValue> = security
        .cors_origins
        .iter()
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!("Ignoring invalid CORS origin: {}", origin);
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([
            axum::http::header::AUTHORIZATION,
            axum::http::header::CONTENT_TYPE,
        ])
        .expose_headers([axum::http::header::AUTHORIZATION])
}

async fn root() -> Json<Value> {
    let version = env!("CARGO_PKG_VERSION");

    Json(json!({
        "success": true,
        "data": {
            "name": "Todo API (Rust)",
            "version": version,
            "endpoints": {
                "register": "POST /register (public)",
                "login": "POST /login (public)",
                "create": "POST /todo (protected)",
                "list": "GET /todo?finished=&deadline=&reverse= (protected)",
                "show": "GET /todo/:index (protected)",
                "update": "PUT /todo/:index (protected)",
                "delete": "DELETE /todo/:index (protected)",
            }
        }
    }))
}

async fn health(State(state): State<AppState>) -> impl IntoResponse {
    let now = chrono::Utc::now();
    let todos = state.todos.store().load().await;
    let users = state.users.store().load().await;

    match (todos, users) {
        (Ok(_), Ok(_)) => (
            StatusCode::OK,
            Json(json!({
                "success": true,
                "data": {
                    "status": "ok",
                    "timestamp": now,
                    "storage": "ok"
                }
            })),
        ),
        (todos, users) => {
            let errors: Vec<String> = [todos.err(), users.err()]
                .into_iter()
                .flatten()
                .map(|e| e.to_string())
                .collect();
            tracing::error!("Health check failed: {:?}", errors);
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({
                    "success": false,
                    "error": "storage unavailable",
                    "data": {
                        "status": "degraded",
                        "timestamp": now,
                        "storage_errors": errors
                    }
                })),
            )
        }
    }
}
