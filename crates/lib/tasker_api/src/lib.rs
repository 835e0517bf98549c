//! # tasker_api
//!
//! HTTP API library for Tasker.

pub mod config;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod services;

use std::sync::Arc;

use axum::Router;
use axum::routing::{delete, get, patch, post};
use sqlx::PgPool;
use tasker_core::store::{MemoryStore, PgStore, UserDirectory};
use tasker_core::tasks::TaskGuard;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::config::ApiConfig;
use crate::handlers::{auth, tasks};

/// Shared application state passed to all handlers.
#[derive(Clone)]
pub struct AppState {
    /// User directory (signup, login, refresh lookups).
    pub users: Arc<dyn UserDirectory>,
    /// Owner-scoped task access.
    pub tasks: TaskGuard,
    /// API configuration.
    pub config: ApiConfig,
}

impl AppState {
    /// State backed by PostgreSQL.
    pub fn postgres(pool: PgPool, config: ApiConfig) -> Self {
        services::auth::prime_login_timing();
        let store = Arc::new(PgStore::new(pool));
        Self {
            users: store.clone(),
            tasks: TaskGuard::new(store),
            config,
        }
    }

    /// State backed by in-process stores. Data lives as long as the process.
    pub fn in_memory(config: ApiConfig) -> Self {
        services::auth::prime_login_timing();
        let store = Arc::new(MemoryStore::new());
        Self {
            users: store.clone(),
            tasks: TaskGuard::new(store),
            config,
        }
    }
}

/// Run embedded database migrations.
///
/// Delegates to `tasker_core::migrate::migrate()` which owns the migration files.
pub async fn migrate(pool: &PgPool) -> Result<(), sqlx::migrate::MigrateError> {
    tasker_core::migrate::migrate(pool).await
}

/// Builds the Axum router with all routes and shared state.
pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // Public routes (no auth required)
    let public = Router::new()
        .route("/signup", post(auth::signup_handler))
        .route("/login", post(auth::login_handler))
        .route("/refresh", post(auth::refresh_handler));

    // Protected routes (require an access token)
    let protected = Router::new()
        .route(
            "/tasks",
            get(tasks::list_tasks_handler).post(tasks::create_task_handler),
        )
        .route(
            "/tasks/status/{completed}",
            get(tasks::list_tasks_by_status_handler),
        )
        .route("/tasks/{id}/toggle", patch(tasks::toggle_task_handler))
        .route("/tasks/{id}", delete(tasks::delete_task_handler))
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            middleware::auth::require_auth,
        ));

    Router::new()
        .merge(public)
        .merge(protected)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
