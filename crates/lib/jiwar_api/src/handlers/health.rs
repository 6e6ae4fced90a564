//! Health endpoint.

use axum::Json;
use axum::extract::State;
use serde::Serialize;

use crate::AppState;
use crate::error::AppResult;

#[derive(Serialize)]
pub struct HealthResponse {
    pub version: String,
    pub db_connected: bool,
}

/// `GET /api/health` — verifies core lib and DB connection.
pub async fn health_handler(State(state): State<AppState>) -> AppResult<Json<HealthResponse>> {
    // Check PostgreSQL connectivity.
    let db_connected = sqlx::query("SELECT 1").execute(&state.pool).await.is_ok();

    Ok(Json(HealthResponse {
        version: jiwar_core::version().to_string(),
        db_connected,
    }))
}
