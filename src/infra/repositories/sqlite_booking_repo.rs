use crate::domain::{
    models::{booking::{normalize_email, Booking}, session::Session},
    ports::BookingRepository,
};
use crate::error::{AppError, BOOKING_NOT_FOUND, CANCEL_NOT_FOUND, SESSION_NOT_FOUND};
use async_trait::async_trait;
use sqlx::SqlitePool;

pub struct SqliteBookingRepo {
    pool: SqlitePool,
}

impl SqliteBookingRepo {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    async fn find_session(&self, session_id: &str) -> Result<Option<Session>, AppError> {
        sqlx::query_as::<_, Session>("SELECT * FROM sessions WHERE id = ?")
            .bind(session_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)
    }
}

#[async_trait]
impl BookingRepository for SqliteBookingRepo {
    async fn create(&self, booking: &Booking) -> Result<Booking, AppError> {
        let session = self.find_session(&booking.session_id).await?
            .ok_or(AppError::NotFound(SESSION_NOT_FOUND.into()))?;

        if self.count_by_session(&session.id).await? >= i64::from(session.max_players) {
            return Err(AppError::SessionFull);
        }

        let existing: Option<String> = sqlx::query_scalar("SELECT id FROM bookings WHERE session_id = ? AND player_email = ?")
            .bind(&booking.session_id)
            .bind(&booking.player_email)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)?;
        if existing.is_some() {
            return Err(AppError::DuplicateBooking);
        }

        // The checks above only produce friendly errors. This statement is the real guard:
        // SQLite holds the write lock from the count to the insert, and the UNIQUE index
        // rejects a concurrent duplicate.
        let inserted = sqlx::query_as::<_, Booking>(
            r#"INSERT INTO bookings (id, session_id, player_name, player_email, created_at)
               SELECT ?, ?, ?, ?, ?
               WHERE (SELECT COUNT(*) FROM bookings WHERE session_id = ?)
                   < (SELECT max_players FROM sessions WHERE id = ?)
               RETURNING *"#
        )
            .bind(&booking.id)
            .bind(&booking.session_id)
            .bind(&booking.player_name)
            .bind(&booking.player_email)
            .bind(booking.created_at)
            .bind(&booking.session_id)
            .bind(&booking.session_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::from_booking_insert)?;

        if let Some(created) = inserted {
            return Ok(created);
        }

        // Nothing inserted: either someone took the last seat or the session was deleted.
        if self.find_session(&booking.session_id).await?.is_none() {
            return Err(AppError::NotFound(SESSION_NOT_FOUND.into()));
        }
        Err(AppError::SessionFull)
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Booking>, AppError> {
        sqlx::query_as::<_, Booking>("SELECT * FROM bookings WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn list_by_session(&self, session_id: &str) -> Result<Vec<Booking>, AppError> {
        sqlx::query_as::<_, Booking>("SELECT * FROM bookings WHERE session_id = ? ORDER BY created_at ASC, id ASC")
            .bind(session_id)
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn count_by_session(&self, session_id: &str) -> Result<i64, AppError> {
        sqlx::query_scalar("SELECT COUNT(*) FROM bookings WHERE session_id = ?")
            .bind(session_id)
            .fetch_one(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn cancel(&self, session_id: &str, player_email: &str) -> Result<Booking, AppError> {
        sqlx::query_as::<_, Booking>("DELETE FROM bookings WHERE session_id = ? AND player_email = ? RETURNING *")
            .bind(session_id)
            .bind(normalize_email(player_email))
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)?
            .ok_or(AppError::NotFound(CANCEL_NOT_FOUND.into()))
    }

    async fn delete(&self, id: &str) -> Result<Booking, AppError> {
        sqlx::query_as::<_, Booking>("DELETE FROM bookings WHERE id = ? RETURNING *")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)?
            .ok_or(AppError::NotFound(BOOKING_NOT_FOUND.into()))
    }
}
