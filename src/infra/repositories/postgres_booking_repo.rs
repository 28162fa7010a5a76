use crate::domain::{
    models::{booking::{normalize_email, Booking}, session::Session},
    ports::BookingRepository,
};
use crate::error::{AppError, BOOKING_NOT_FOUND, CANCEL_NOT_FOUND, SESSION_NOT_FOUND};
use async_trait::async_trait;
use sqlx::PgPool;

pub struct PostgresBookingRepo {
    pool: PgPool,
}

impl PostgresBookingRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl BookingRepository for PostgresBookingRepo {
    async fn create(&self, booking: &Booking) -> Result<Booking, AppError> {
        let mut tx = self.pool.begin().await.map_err(AppError::Database)?;

        // Locking the session row serializes every booker of this session until commit,
        // so the count below cannot go stale before the insert.
        let session = sqlx::query_as::<_, Session>("SELECT * FROM sessions WHERE id = $1 FOR UPDATE")
            .bind(&booking.session_id)
            .fetch_optional(&mut *tx)
            .await
            .map_err(AppError::Database)?
            .ok_or(AppError::NotFound(SESSION_NOT_FOUND.into()))?;

        let bookings_count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM bookings WHERE session_id = $1")
            .bind(&session.id)
            .fetch_one(&mut *tx)
            .await
            .map_err(AppError::Database)?;
        if bookings_count >= i64::from(session.max_players) {
            return Err(AppError::SessionFull);
        }

        let already_booked: bool = sqlx::query_scalar(
            "SELECT EXISTS(SELECT 1 FROM bookings WHERE session_id = $1 AND player_email = $2)"
        )
            .bind(&booking.session_id)
            .bind(&booking.player_email)
            .fetch_one(&mut *tx)
            .await
            .map_err(AppError::Database)?;
        if already_booked {
            return Err(AppError::DuplicateBooking);
        }

        let created = sqlx::query_as::<_, Booking>(
            r#"INSERT INTO bookings (id, session_id, player_name, player_email, created_at)
               VALUES ($1, $2, $3, $4, $5)
               RETURNING *"#
        )
            .bind(&booking.id)
            .bind(&booking.session_id)
            .bind(&booking.player_name)
            .bind(&booking.player_email)
            .bind(booking.created_at)
            .fetch_one(&mut *tx)
            .await
            .map_err(AppError::from_booking_insert)?;

        tx.commit().await.map_err(AppError::from_booking_insert)?;
        Ok(created)
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Booking>, AppError> {
        sqlx::query_as::<_, Booking>("SELECT * FROM bookings WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn list_by_session(&self, session_id: &str) -> Result<Vec<Booking>, AppError> {
        sqlx::query_as::<_, Booking>("SELECT * FROM bookings WHERE session_id = $1 ORDER BY created_at ASC, id ASC")
            .bind(session_id)
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn count_by_session(&self, session_id: &str) -> Result<i64, AppError> {
        sqlx::query_scalar("SELECT COUNT(*) FROM bookings WHERE session_id = $1")
            .bind(session_id)
            .fetch_one(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn cancel(&self, session_id: &str, player_email: &str) -> Result<Booking, AppError> {
        sqlx::query_as::<_, Booking>("DELETE FROM bookings WHERE session_id = $1 AND player_email = $2 RETURNING *")
            .bind(session_id)
            .bind(normalize_email(player_email))
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)?
            .ok_or(AppError::NotFound(CANCEL_NOT_FOUND.into()))
    }

    async fn delete(&self, id: &str) -> Result<Booking, AppError> {
        sqlx::query_as::<_, Booking>("DELETE FROM bookings WHERE id = $1 RETURNING *")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)?
            .ok_or(AppError::NotFound(BOOKING_NOT_FOUND.into()))
    }
}
