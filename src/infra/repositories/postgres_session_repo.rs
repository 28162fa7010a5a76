use crate::domain::{
    models::{booking::Booking, session::{Session, SessionDetails}},
    ports::SessionRepository,
    services::session_listing::attach_bookings,
};
use crate::error::{AppError, SESSION_NOT_FOUND};
use async_trait::async_trait;
use sqlx::PgPool;
use chrono::{DateTime, Utc};

pub struct PostgresSessionRepo {
    pool: PgPool,
}

impl PostgresSessionRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SessionRepository for PostgresSessionRepo {
    async fn create(&self, session: &Session) -> Result<Session, AppError> {
        sqlx::query_as::<_, Session>(
            r#"INSERT INTO sessions (id, name, start_time, end_time, arrive_by_time, cost_per_player, max_players, instructions, created_at)
               VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
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
        sqlx::query_as::<_, Session>("SELECT * FROM sessions WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn list_upcoming(&self, from: DateTime<Utc>) -> Result<Vec<SessionDetails>, AppError> {
        let mut tx = self.pool.begin().await.map_err(AppError::Database)?;
        sqlx::query("SET TRANSACTION ISOLATION LEVEL REPEATABLE READ, READ ONLY")
            .execute(&mut *tx)
            .await
            .map_err(AppError::Database)?;

        let sessions = sqlx::query_as::<_, Session>(
            "SELECT * FROM sessions WHERE start_time >= $1 ORDER BY start_time ASC"
        )
            .bind(from)
            .fetch_all(&mut *tx)
            .await
            .map_err(AppError::Database)?;

        let bookings = sqlx::query_as::<_, Booking>(
            r#"SELECT b.* FROM bookings b
               JOIN sessions s ON s.id = b.session_id
               WHERE s.start_time >= $1
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
        sqlx::query("SET TRANSACTION ISOLATION LEVEL REPEATABLE READ, READ ONLY")
            .execute(&mut *tx)
            .await
            .map_err(AppError::Database)?;

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
        let mut tx = self.pool.begin().await.map_err(AppError::Database)?;

        // Row lock: bookings for this session wait until the new capacity is committed.
        let locked: Option<String> = sqlx::query_scalar("SELECT id FROM sessions WHERE id = $1 FOR UPDATE")
            .bind(&session.id)
            .fetch_optional(&mut *tx)
            .await
            .map_err(AppError::Database)?;
        if locked.is_none() {
            return Err(AppError::NotFound(SESSION_NOT_FOUND.into()));
        }

        let bookings_count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM bookings WHERE session_id = $1")
            .bind(&session.id)
            .fetch_one(&mut *tx)
            .await
            .map_err(AppError::Database)?;
        if bookings_count > i64::from(session.max_players) {
            return Err(AppError::Validation(format!(
                "Cannot reduce capacity to {}. {} bookings already exist.",
                session.max_players, bookings_count
            )));
        }

        let updated = sqlx::query_as::<_, Session>(
            r#"UPDATE sessions
               SET name=$1, start_time=$2, end_time=$3, arrive_by_time=$4, cost_per_player=$5, max_players=$6, instructions=$7
               WHERE id=$8
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
            .fetch_one(&mut *tx)
            .await
            .map_err(AppError::Database)?;

        tx.commit().await.map_err(AppError::Database)?;
        Ok(updated)
    }

    async fn delete(&self, id: &str) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM sessions WHERE id = $1")
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
