use crate::domain::{
    models::{booking::Booking, session::{Session, SessionDetails}},
    ports::SessionRepository,
    services::session_listing::attach_bookings,
};
use crate::error::{AppError, SESSION_NOT_FOUND};
use async_trait::async_trait;
use sqlx::SqlitePool;
use chrono::{DateTime, Utc};

pub struct SqliteSessionRepo {
    pool: SqlitePool,
}

impl SqliteSessionRepo {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SessionRepository for SqliteSessionRepo {
    async fn create(&self, session: &Session) -> Result<Session, AppError> {
        sqlx::query_as::<_, Session>(
            r#"INSERT INTO sessions (id, name, start_time, end_time, arrive_by_time, cost_per_player, max_players, instructions, created_at)
               VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
               RETURNING *"#
        )
            .bind(&session.id)
            .bind(&session.name)
            .bind(session.start_time)
            .bind(session.end_time)
            .bind(session.arrive_by_time)
            .bind(session.cost_per_player)
            .bind(session.max_players)
            .bind(&session.instructions)
            .bind(session.created_at)
            .fetch_one(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Session>, AppError> {
        sqlx::query_as::<_, Session>("SELECT * FROM sessions WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn list_upcoming(&self, from: DateTime<Utc>) -> Result<Vec<SessionDetails>, AppError> {
        let mut tx = self.pool.begin().await.map_err(AppError::Database)?;

        let sessions = sqlx::query_as::<_, Session>(
            "SELECT * FROM sessions WHERE start_time >= ? ORDER BY start_time ASC"
        )
            .bind(from)
            .fetch_all(&mut *tx)
            .await
            .map_err(AppError::Database)?;

        let bookings = sqlx::query_as::<_, Booking>(
            r#"SELECT b.* FROM bookings b
               JOIN sessions s ON s.id = b.session_id
               WHERE s.start_time >= ?
               ORDER BY b.created_at ASC, b.id ASC"#
        )
            .bind(from)
            .fetch_all(&mut *tx)
            .await
            .map_err(AppError::Database)?;

        tx.commit().await.map_err(AppError::Database)?;
        Ok(attach_bookings(sessions, bookings))
    }

    async fn list_all(&self) -> Result<Vec<SessionDetails>, AppError> {
        let mut tx = self.pool.begin().await.map_err(AppError::Database)?;

        let sessions = sqlx::query_as::<_, Session>("SELECT * FROM sessions ORDER BY start_time DESC")
            .fetch_all(&mut *tx)
            .await
            .map_err(AppError::Database)?;

        let bookings = sqlx::query_as::<_, Booking>("SELECT * FROM bookings ORDER BY created_at ASC, id ASC")
            .fetch_all(&mut *tx)
            .await
            .map_err(AppError::Database)?;

        tx.commit().await.map_err(AppError::Database)?;
        Ok(attach_bookings(sessions, bookings))
    }

    async fn update(&self, session: &Session) -> Result<Session, AppError> {
        // One statement, so the capacity check and the write share SQLite's write lock.
        let updated = sqlx::query_as::<_, Session>(
            r#"UPDATE sessions
               SET name=?, start_time=?, end_time=?, arrive_by_time=?, cost_per_player=?, max_players=?, instructions=?
               WHERE id=? AND (SELECT COUNT(*) FROM bookings WHERE session_id = ?) <= ?
               RETURNING *"#
        )
            .bind(&session.name)
            .bind(session.start_time)
            .bind(session.end_time)
            .bind(session.arrive_by_time)
            .bind(session.cost_per_player)
            .bind(session.max_players)
            .bind(&session.instructions)
            .bind(&session.id)
            .bind(&session.id)
            .bind(session.max_players)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)?;

        if let Some(updated) = updated {
            return Ok(updated);
        }

        if self.find_by_id(&session.id).await?.is_none() {
            return Err(AppError::NotFound(SESSION_NOT_FOUND.into()));
        }

        let bookings_count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM bookings WHERE session_id = ?")
            .bind(&session.id)
            .fetch_one(&self.pool)
            .await
            .map_err(AppError::Database)?;

        Err(AppError::Validation(format!(
            "Cannot reduce capacity to {}. {} bookings already exist.",
            session.max_players, bookings_count
        )))
    }

    async fn delete(&self, id: &str) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM sessions WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(AppError::Database)?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(SESSION_NOT_FOUND.into()));
        }
        Ok(())
    }
}
