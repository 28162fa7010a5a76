use axum::{
    body::Body,
    extract::Request,
    routing::{get, post, put, delete},
    Router,
};
use std::sync::Arc;
use std::time::Duration;
use crate::state::AppState;
use crate::api::handlers::{booking, health, session};
use tower_http::{
    trace::TraceLayer,
    classify::ServerErrorsFailureClass,
};
use tracing::{info_span, Span, error, info};
use uuid::Uuid;

pub fn create_router(state: Arc<AppState>) -> Router {
    let api = Router::new()
        // Public
        .route("/sessions", get(session::list_upcoming_sessions).post(session::create_session))
        .route("/bookings", post(booking::create_booking))
        .route("/bookings/cancel", post(booking::cancel_booking))

        // Admin
        .route("/admin/sessions", get(session::list_all_sessions).post(session::create_session))
        .route("/admin/sessions/{id}", put(session::update_session).delete(session::delete_session))
        .route("/admin/bookings", post(booking::add_booking))
        .route("/admin/bookings/{id}", delete(booking::remove_booking));

    Router::new()
        .route("/health", get(health::health_check))
        .nest("/api", api)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|request: &Request<Body>| {
                    let request_id = Uuid::new_v4().to_string();
                    info_span!(
                        "http_request",
                        request_id = %request_id,
                        method = ?request.method(),
                        uri = ?request.uri(),
                        version = ?request.version(),
                    )
                })
                .on_request(|request: &Request<Body>, _span: &Span| {
                    info!("started processing request: {} {}", request.method(), request.uri().path());
                })
                .on_response(|response: &axum::http::Response<Body>, latency: Duration, _span: &Span| {
                    info!(
                        status = response.status().as_u16(),
                        latency_ms = latency.as_millis(),
                        "finished processing request"
                    );
                })
                .on_failure(|error: ServerErrorsFailureClass, _latency: Duration, _span: &Span| {
                    error!("request failed: {:?}", error);
                })
        )
        .with_state(state)
}
