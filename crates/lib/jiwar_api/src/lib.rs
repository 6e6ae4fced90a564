//! # jiwar_api
//!
//! HTTP API library for Jiwar: the Telegram webhook dispatcher and the
//! magic-link claim endpoints the web client calls.

pub mod config;
pub mod error;
pub mod handlers;
pub mod messages;
pub mod services;

use std::sync::Arc;

use axum::Router;
use axum::routing::{get, post};
use sqlx::PgPool;
use tower_http::cors::{Any, CorsLayer};

use jiwar_core::provider::AccountProvider;
use jiwar_core::telegram::BotTransport;

use crate::config::ApiConfig;
use crate::handlers::{claim, health, webhook};

/// Shared application state passed to all handlers.
#[derive(Clone)]
pub struct AppState {
    /// PostgreSQL connection pool.
    pub pool: PgPool,
    /// API configuration.
    pub config: ApiConfig,
    /// Account-provider client (identity backend).
    pub provider: Arc<dyn AccountProvider>,
    /// Telegram bot transport.
    pub bot: Arc<dyn BotTransport>,
}

/// Run embedded database migrations.
///
/// Delegates to `jiwar_core::migrate::migrate()` which owns the migration files.
pub async fn migrate(pool: &PgPool) -> Result<(), sqlx::migrate::MigrateError> {
    jiwar_core::migrate::migrate(pool).await
}

/// Builds the Axum router with all routes and shared state.
pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/api/health", get(health::health_handler))
        .route("/api/telegram/webhook", post(webhook::telegram_webhook_handler))
        .route(
            "/api/telegram/signup",
            get(claim::verify_signup_handler).post(claim::complete_signup_handler),
        )
        .route("/api/telegram/login", post(claim::login_handler))
        .layer(cors)
        .with_state(state)
}
