use crate::api::dtos::requests::{CancelBookingRequest, CreateBookingRequest, UpsertSessionRequest};
use crate::api::dtos::responses::{
    BookingCancelledResponse, BookingCreatedResponse, BookingRemovedResponse, ErrorResponse,
    HealthResponse, SessionDeletedResponse, SessionUpdatedResponse,
};
use crate::domain::models::{booking::Booking, session::{Session, SessionDetails}};
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use std::time::Duration;
use thiserror::Error;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Error, Debug)]
pub enum ClientError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("{message} (status {status})")]
    Api { status: u16, message: String },
}

impl ClientError {
    /// Status code of an API rejection; `None` for transport failures.
    pub fn status(&self) -> Option<u16> {
        match self {
            ClientError::Api { status, .. } => Some(*status),
            ClientError::Http(e) => e.status().map(|s| s.as_u16()),
        }
    }
}

/// One method per endpoint. Failures are returned as-is; nothing is retried.
#[derive(Clone, Debug)]
pub struct BookingClient {
    http: Client,
    base_url: String,
}

impl BookingClient {
    pub fn new(base_url: impl Into<String>) -> Result<Self, ClientError> {
        let http = Client::builder().timeout(REQUEST_TIMEOUT).build()?;
        Ok(Self::with_client(http, base_url))
    }

    pub fn with_client(http: Client, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { http, base_url }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn api(&self, path: &str) -> String {
        format!("{}/api{}", self.base_url, path)
    }

    pub async fn health(&self) -> Result<HealthResponse, ClientError> {
        let res = self.http.get(format!("{}/health", self.base_url)).send().await?;
        decode(res).await
    }

    pub async fn list_sessions(&self) -> Result<Vec<SessionDetails>, ClientError> {
        let res = self.http.get(self.api("/sessions")).send().await?;
        decode(res).await
    }

    pub async fn book(&self, session_id: &str, player_name: &str, player_email: &str) -> Result<Booking, ClientError> {
        let body = booking_request(session_id, player_name, player_email);
        let res = self.http.post(self.api("/bookings")).json(&body).send().await?;
        let created: BookingCreatedResponse = decode(res).await?;
        Ok(created.booking)
    }

    pub async fn cancel(&self, session_id: &str, player_email: &str) -> Result<Booking, ClientError> {
        let body = CancelBookingRequest {
            session_id: Some(session_id.to_string()),
            player_email: Some(player_email.to_string()),
        };
        let res = self.http.post(self.api("/bookings/cancel")).json(&body).send().await?;
        let cancelled: BookingCancelledResponse = decode(res).await?;
        Ok(cancelled.cancelled_booking)
    }

    pub async fn admin_list_sessions(&self) -> Result<Vec<SessionDetails>, ClientError> {
        let res = self.http.get(self.api("/admin/sessions")).send().await?;
        decode(res).await
    }

    pub async fn create_session(&self, request: &UpsertSessionRequest) -> Result<Session, ClientError> {
        let res = self.http.post(self.api("/admin/sessions")).json(request).send().await?;
        decode(res).await
    }

    pub async fn update_session(&self, session_id: &str, request: &UpsertSessionRequest) -> Result<Session, ClientError> {
        let res = self.http
            .put(self.api(&format!("/admin/sessions/{}", session_id)))
            .json(request)
            .send()
            .await?;
        let updated: SessionUpdatedResponse = decode(res).await?;
        Ok(updated.session)
    }

    pub async fn delete_session(&self, session_id: &str) -> Result<(), ClientError> {
        let res = self.http
            .delete(self.api(&format!("/admin/sessions/{}", session_id)))
            .send()
            .await?;
        let _: SessionDeletedResponse = decode(res).await?;
        Ok(())
    }

    pub async fn add_booking(&self, session_id: &str, player_name: &str, player_email: &str) -> Result<Booking, ClientError> {
        let body = booking_request(session_id, player_name, player_email);
        let res = self.http.post(self.api("/admin/bookings")).json(&body).send().await?;
        let created: BookingCreatedResponse = decode(res).await?;
        Ok(created.booking)
    }

    pub async fn remove_booking(&self, booking_id: &str) -> Result<Booking, ClientError> {
        let res = self.http
            .delete(self.api(&format!("/admin/bookings/{}", booking_id)))
            .send()
            .await?;
        let removed: BookingRemovedResponse = decode(res).await?;
        Ok(removed.removed_booking)
    }
}

fn booking_request(session_id: &str, player_name: &str, player_email: &str) -> CreateBookingRequest {
    CreateBookingRequest {
        session_id: Some(session_id.to_string()),
        player_name: Some(player_name.trim().to_string()),
        player_email: Some(player_email.trim().to_lowercase()),
    }
}

async fn decode<T: DeserializeOwned>(res: Response) -> Result<T, ClientError> {
    let status = res.status();
    if status.is_success() {
        return Ok(res.json().await?);
    }

    let message = match res.json::<ErrorResponse>().await {
        Ok(body) => body.error,
        Err(_) => status.canonical_reason().unwrap_or("Request failed").to_string(),
    };
    Err(ClientError::Api { status: status.as_u16(), message })
}
