use axum::{extract::{State, Path}, response::IntoResponse, Json};
use crate::state::AppState;
use crate::api::dtos::requests::{CancelBookingRequest, CreateBookingRequest};
use crate::api::dtos::responses::{BookingCancelledResponse, BookingCreatedResponse, BookingRemovedResponse};
use crate::api::extractors::json::ValidJson;
use crate::domain::models::booking::Booking;
use crate::error::AppError;
use std::sync::Arc;
use tracing::{info, warn};

pub async fn create_booking(
    State(state): State<Arc<AppState>>,
    ValidJson(payload): ValidJson<CreateBookingRequest>,
) -> Result<impl IntoResponse, AppError> {
    book_seat(&state, payload, "public").await
}

/// Admin add: same capacity and duplicate rules as the public flow.
pub async fn add_booking(
    State(state): State<Arc<AppState>>,
    ValidJson(payload): ValidJson<CreateBookingRequest>,
) -> Result<impl IntoResponse, AppError> {
    book_seat(&state, payload, "admin").await
}

async fn book_seat(
    state: &AppState,
    payload: CreateBookingRequest,
    source: &'static str,
) -> Result<Json<BookingCreatedResponse>, AppError> {
    let fields = payload.into_fields()?;
    let booking = Booking::new(fields.session_id, &fields.player_name, &fields.player_email)?;

    match state.booking_repo.create(&booking).await {
        Ok(created) => {
            info!(source, "Booking confirmed: {} for session {}", created.id, created.session_id);
            Ok(Json(BookingCreatedResponse {
                success: true,
                booking: created,
            }))
        }
        Err(e @ (AppError::SessionFull | AppError::DuplicateBooking | AppError::NotFound(_))) => {
            warn!(source, session_id = %booking.session_id, "Booking rejected: {}", e);
            Err(e)
        }
        Err(e) => Err(e),
    }
}

pub async fn cancel_booking(
    State(state): State<Arc<AppState>>,
    ValidJson(payload): ValidJson<CancelBookingRequest>,
) -> Result<impl IntoResponse, AppError> {
    let (session_id, player_email) = payload.into_fields()?;

    let cancelled = state.booking_repo.cancel(&session_id, &player_email).await?;
    info!("Booking {} cancelled for session {}", cancelled.id, session_id);

    Ok(Json(BookingCancelledResponse {
        success: true,
        message: "Booking cancelled successfully".into(),
        cancelled_booking: cancelled,
    }))
}

pub async fn remove_booking(
    State(state): State<Arc<AppState>>,
    Path(booking_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let removed = state.booking_repo.delete(&booking_id).await?;
    info!("Admin removed booking {} from session {}", removed.id, removed.session_id);

    Ok(Json(BookingRemovedResponse {
        success: true,
        message: "Booking removed successfully".into(),
        removed_booking: removed,
    }))
}
