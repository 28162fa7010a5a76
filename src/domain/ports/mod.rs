use crate::domain::models::{
    booking::Booking,
    session::{Session, SessionDetails},
};
use crate::error::AppError;
use async_trait::async_trait;
use chrono::{DateTime, Utc};

#[async_trait]
pub trait SessionRepository: Send + Sync {
    async fn create(&self, session: &Session) -> Result<Session, AppError>;
    async fn find_by_id(&self, id: &str) -> Result<Option<Session>, AppError>;
    /// Sessions starting at or after `from`, earliest first.
    async fn list_upcoming(&self, from: DateTime<Utc>) -> Result<Vec<SessionDetails>, AppError>;
    /// Every session, latest first.
    async fn list_all(&self) -> Result<Vec<SessionDetails>, AppError>;
    /// Fails with `Validation` if `max_players` would drop below the current booking count.
    async fn update(&self, session: &Session) -> Result<Session, AppError>;
    /// Bookings of the session go with it.
    async fn delete(&self, id: &str) -> Result<(), AppError>;
}

#[async_trait]
pub trait BookingRepository: Send + Sync {
    /// Inserts the booking unless the session is missing, full, or already booked by
    /// the same email. Safe under concurrent callers.
    async fn create(&self, booking: &Booking) -> Result<Booking, AppError>;
    async fn find_by_id(&self, id: &str) -> Result<Option<Booking>, AppError>;
    async fn list_by_session(&self, session_id: &str) -> Result<Vec<Booking>, AppError>;
    async fn count_by_session(&self, session_id: &str) -> Result<i64, AppError>;
    /// Deletes and returns the booking matching `(session_id, email)`.
    async fn cancel(&self, session_id: &str, player_email: &str) -> Result<Booking, AppError>;
    /// Deletes and returns the booking with this id.
    async fn delete(&self, id: &str) -> Result<Booking, AppError>;
}
