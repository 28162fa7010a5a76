use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;
use sqlx::{postgres::{PgPoolOptions, PgConnectOptions}, sqlite::{SqlitePoolOptions, SqliteJournalMode, SqliteConnectOptions}};
use sqlx::{PgPool, SqlitePool, ConnectOptions};
use tracing::info;
use tracing::log::LevelFilter;

use crate::config::Config;
use crate::error::AppError;
use crate::state::{AppState, Database};
use crate::infra::repositories::{
    postgres_booking_repo::PostgresBookingRepo, postgres_session_repo::PostgresSessionRepo,
    sqlite_booking_repo::SqliteBookingRepo, sqlite_session_repo::SqliteSessionRepo,
};

const SLOW_STATEMENT_THRESHOLD: Duration = Duration::from_millis(500);

pub async fn bootstrap_state(config: &Config) -> Result<AppState, AppError> {
    if config.is_postgres() {
        info!("Initializing PostgreSQL connection...");
        let pool = connect_postgres(config).await?;
        run_postgres_migrations(&pool).await?;
        Ok(postgres_state(config, pool))
    } else {
        info!("Initializing SQLite connection with WAL Mode...");
        let pool = connect_sqlite(config).await?;
        run_sqlite_migrations(&pool).await?;
        Ok(sqlite_state(config, pool))
    }
}

pub async fn connect_postgres(config: &Config) -> Result<PgPool, AppError> {
    let opts = PgConnectOptions::from_str(&config.database_url)
        .map_err(AppError::Database)?
        .log_statements(LevelFilter::Debug)
        .log_slow_statements(LevelFilter::Warn, SLOW_STATEMENT_THRESHOLD);

    PgPoolOptions::new()
        .max_connections(config.max_connections.unwrap_or(10))
        .connect_with(opts)
        .await
        .map_err(AppError::Database)
}

pub async fn connect_sqlite(config: &Config) -> Result<SqlitePool, AppError> {
    let opts = SqliteConnectOptions::from_str(&config.database_url)
        .map_err(AppError::Database)?
        .create_if_missing(true)
        .foreign_keys(true)
        .journal_mode(SqliteJournalMode::Wal)
        .busy_timeout(Duration::from_secs(5))
        .log_statements(LevelFilter::Debug)
        .log_slow_statements(LevelFilter::Warn, SLOW_STATEMENT_THRESHOLD);

    SqlitePoolOptions::new()
        .max_connections(config.max_connections.unwrap_or(5))
        .connect_with(opts)
        .await
        .map_err(AppError::Database)
}

pub fn postgres_state(config: &Config, pool: PgPool) -> AppState {
    AppState {
        config: config.clone(),
        session_repo: Arc::new(PostgresSessionRepo::new(pool.clone())),
        booking_repo: Arc::new(PostgresBookingRepo::new(pool.clone())),
        db: Database::Postgres(pool),
    }
}

pub fn sqlite_state(config: &Config, pool: SqlitePool) -> AppState {
    AppState {
        config: config.clone(),
        session_repo: Arc::new(SqliteSessionRepo::new(pool.clone())),
        booking_repo: Arc::new(SqliteBookingRepo::new(pool.clone())),
        db: Database::Sqlite(pool),
    }
}

pub async fn run_postgres_migrations(pool: &PgPool) -> Result<(), AppError> {
    sqlx::migrate!("./migrations/postgres")
        .run(pool)
        .await
        .map_err(|e| AppError::Database(e.into()))
}

pub async fn run_sqlite_migrations(pool: &SqlitePool) -> Result<(), AppError> {
    sqlx::migrate!("./migrations/sqlite")
        .run(pool)
        .await
        .map_err(|e| AppError::Database(e.into()))
}
