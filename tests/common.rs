use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    response::Response,
    Router,
};
use chrono::{DateTime, Duration, Utc};
use club_booking::{
    api::router::create_router,
    config::Config,
    infra::factory::{connect_sqlite, run_sqlite_migrations, sqlite_state},
    state::AppState,
};
use serde_json::{json, Value};
use sqlx::SqlitePool;
use std::sync::Arc;
use tower::ServiceExt;
use uuid::Uuid;

#[allow(dead_code)]
pub struct TestApp {
    pub router: Router,
    pub pool: SqlitePool,
    pub db_filename: String,
    pub state: Arc<AppState>,
}

#[allow(dead_code)]
impl TestApp {
    pub async fn new() -> Self {
        let db_filename = format!("test_{}.db", Uuid::new_v4());
        let config = Config {
            database_url: format!("sqlite://{}", db_filename),
            port: 0,
            log_dir: "./logs".to_string(),
            max_connections: Some(8),
        };

        let pool = connect_sqlite(&config).await.expect("Failed to connect to test db");
        run_sqlite_migrations(&pool).await.expect("Failed to migrate test db");

        let state = Arc::new(sqlite_state(&config, pool.clone()));
        let router = create_router(state.clone());

        Self {
            router,
            pool,
            db_filename,
            state,
        }
    }

    pub async fn request(&self, method: &str, uri: &str, body: Option<Value>) -> Response {
        let builder = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string())),
            None => builder.body(Body::empty()),
        };
        self.router.clone().oneshot(request.unwrap()).await.unwrap()
    }

    /// Sends a request and returns the status with the parsed JSON body.
    pub async fn call(&self, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let response = self.request(method, uri, body).await;
        let status = response.status();
        (status, parse_body(response).await)
    }

    /// Creates a session starting `start` with a two hour slot; returns its id.
    pub async fn create_session(&self, name: &str, start: DateTime<Utc>, max_players: Option<i32>) -> String {
        let mut payload = session_payload(name, start);
        if let Some(max) = max_players {
            payload["maxPlayers"] = json!(max);
        }

        let (status, body) = self.call("POST", "/api/admin/sessions", Some(payload)).await;
        assert_eq!(status, StatusCode::OK, "session create failed: {}", body);
        body["id"].as_str().unwrap().to_string()
    }

    pub async fn book(&self, session_id: &str, name: &str, email: &str) -> (StatusCode, Value) {
        self.call(
            "POST",
            "/api/bookings",
            Some(json!({ "sessionId": session_id, "playerName": name, "playerEmail": email })),
        )
        .await
    }

    pub async fn booking_count(&self, session_id: &str) -> i64 {
        sqlx::query_scalar("SELECT COUNT(*) FROM bookings WHERE session_id = ?")
            .bind(session_id)
            .fetch_one(&self.pool)
            .await
            .unwrap()
    }
}

impl Drop for TestApp {
    fn drop(&mut self) {
        let _ = std::fs::remove_file(&self.db_filename);
        let _ = std::fs::remove_file(format!("{}-wal", self.db_filename));
        let _ = std::fs::remove_file(format!("{}-shm", self.db_filename));
    }
}

#[allow(dead_code)]
pub async fn parse_body(response: Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    if bytes.is_empty() {
        return Value::Null;
    }
    serde_json::from_slice(&bytes).unwrap_or(Value::Null)
}

#[allow(dead_code)]
pub fn session_payload(name: &str, start: DateTime<Utc>) -> Value {
    json!({
        "name": name,
        "startTime": start.to_rfc3339(),
        "endTime": (start + Duration::hours(2)).to_rfc3339(),
        "arriveByTime": (start - Duration::minutes(15)).to_rfc3339(),
    })
}

#[allow(dead_code)]
pub fn days_from_now(days: i64) -> DateTime<Utc> {
    Utc::now() + Duration::days(days)
}
