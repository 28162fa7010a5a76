use crate::error::AppError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Serialize, Deserialize, FromRow, Clone, PartialEq)]
pub struct Booking {
    pub id: String,
    pub session_id: String,
    pub player_name: String,
    pub player_email: String,
    pub created_at: DateTime<Utc>,
}

impl Booking {
    pub fn new(session_id: String, player_name: &str, player_email: &str) -> Result<Self, AppError> {
        let player_name = player_name.trim();
        if player_name.is_empty() {
            return Err(AppError::Validation("Player name must not be empty".into()));
        }

        let player_email = normalize_email(player_email);
        if !looks_like_email(&player_email) {
            return Err(AppError::Validation("Invalid email address".into()));
        }

        Ok(Self {
            id: Uuid::new_v4().to_string(),
            session_id,
            player_name: player_name.to_string(),
            player_email,
            created_at: Utc::now(),
        })
    }
}

/// Emails are compared case-insensitively; they are stored and looked up in this form.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

fn looks_like_email(email: &str) -> bool {
    match email.split_once('@') {
        Some((local, domain)) => !local.is_empty() && !domain.is_empty() && !domain.contains('@'),
        None => false,
    }
}
