use axum::{extract::{State, Path}, response::IntoResponse, Json};
use crate::state::AppState;
use crate::api::dtos::requests::UpsertSessionRequest;
use crate::api::dtos::responses::{SessionDeletedResponse, SessionUpdatedResponse};
use crate::api::extractors::json::ValidJson;
use crate::domain::models::session::Session;
use crate::error::{AppError, SESSION_NOT_FOUND};
use std::sync::Arc;
use chrono::{DateTime, NaiveTime, Utc};
use tracing::info;

/// Public listing: sessions from the start of today (UTC) onwards, earliest first.
pub async fn list_upcoming_sessions(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, AppError> {
    let sessions = state.session_repo.list_upcoming(start_of_today()).await?;
    Ok(Json(sessions))
}

/// Admin listing: every session including past ones, latest first.
pub async fn list_all_sessions(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, AppError> {
    let sessions = state.session_repo.list_all().await?;
    Ok(Json(sessions))
}

pub async fn create_session(
    State(state): State<Arc<AppState>>,
    ValidJson(payload): ValidJson<UpsertSessionRequest>,
) -> Result<impl IntoResponse, AppError> {
    let input = payload.into_input()?;
    let session = Session::new(input);
    let created = state.session_repo.create(&session).await?;

    info!(session_id = %created.id, start_time = %created.start_time, "Created session {}", created.name);
    Ok(Json(created))
}

pub async fn update_session(
    State(state): State<Arc<AppState>>,
    Path(session_id): Path<String>,
    ValidJson(payload): ValidJson<UpsertSessionRequest>,
) -> Result<impl IntoResponse, AppError> {
    let input = payload.into_input()?;

    let mut session = state.session_repo.find_by_id(&session_id).await?
        .ok_or(AppError::NotFound(SESSION_NOT_FOUND.into()))?;
    session.replace_with(input);

    let updated = state.session_repo.update(&session).await?;
    info!("Updated session {}", session_id);
    Ok(Json(SessionUpdatedResponse {
        success: true,
        message: "Session updated successfully".into(),
        session: updated,
    }))
}

pub async fn delete_session(
    State(state): State<Arc<AppState>>,
    Path(session_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    state.session_repo.delete(&session_id).await?;
    info!("Deleted session {} and its bookings", session_id);
    Ok(Json(SessionDeletedResponse {
        success: true,
        message: "Session deleted successfully".into(),
    }))
}

fn start_of_today() -> DateTime<Utc> {
    Utc::now().date_naive().and_time(NaiveTime::MIN).and_utc()
}
