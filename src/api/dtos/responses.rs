use crate::domain::models::{booking::Booking, session::Session};
use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct BookingCreatedResponse {
    pub success: bool,
    pub booking: Booking,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct BookingCancelledResponse {
    pub success: bool,
    pub message: String,
    pub cancelled_booking: Booking,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct BookingRemovedResponse {
    pub success: bool,
    pub message: String,
    pub removed_booking: Booking,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct SessionUpdatedResponse {
    pub success: bool,
    pub message: String,
    pub session: Session,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct SessionDeletedResponse {
    pub success: bool,
    pub message: String,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub database: String,
}

/// The `{"error": ...}` body every failed request carries.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct ErrorResponse {
    pub error: String,
}
