use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use crate::api::dtos::responses::HealthResponse;
use crate::state::AppState;
use std::sync::Arc;
use tracing::error;

pub async fn health_check(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let (status_code, status) = match state.db.ping().await {
        Ok(()) => (StatusCode::OK, "ok"),
        Err(e) => {
            error!("Health check failed: {}", e);
            (StatusCode::SERVICE_UNAVAILABLE, "degraded")
        }
    };

    (
        status_code,
        Json(HealthResponse {
            status: status.to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            database: state.db.backend().to_string(),
        }),
    )
}
