use std::sync::Arc;
use sqlx::{PgPool, SqlitePool};
use crate::domain::ports::{BookingRepository, SessionRepository};
use crate::config::Config;
use crate::error::AppError;

/// The pool behind the repositories, kept for health checks.
#[derive(Clone, Debug)]
pub enum Database {
    Postgres(PgPool),
    Sqlite(SqlitePool),
}

impl Database {
    pub fn backend(&self) -> &'static str {
        match self {
            Database::Postgres(_) => "postgres",
            Database::Sqlite(_) => "sqlite",
        }
    }

    pub async fn ping(&self) -> Result<(), AppError> {
        match self {
            Database::Postgres(pool) => {
                sqlx::query("SELECT 1").execute(pool).await.map_err(AppError::Database)?;
            }
            Database::Sqlite(pool) => {
                sqlx::query("SELECT 1").execute(pool).await.map_err(AppError::Database)?;
            }
        }
        Ok(())
    }
}

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub session_repo: Arc<dyn SessionRepository>,
    pub booking_repo: Arc<dyn BookingRepository>,
    pub db: Database,
}
