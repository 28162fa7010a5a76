use super::{booking::Booking, price::Price};
use crate::error::AppError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

pub const DEFAULT_COST_PER_PLAYER: Price = Price::from_minor_units(400);
pub const DEFAULT_MAX_PLAYERS: i32 = 16;

#[derive(Debug, Serialize, Deserialize, FromRow, Clone, PartialEq)]
pub struct Session {
    pub id: String,
    pub name: String,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub arrive_by_time: DateTime<Utc>,
    pub cost_per_player: Price,
    pub max_players: i32,
    pub instructions: String,
    pub created_at: DateTime<Utc>,
}

/// The admin-editable fields of a session, already defaulted and validated.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionInput {
    pub name: String,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub arrive_by_time: DateTime<Utc>,
    pub cost_per_player: Price,
    pub max_players: i32,
    pub instructions: String,
}

impl SessionInput {
    pub fn validate(mut self) -> Result<Self, AppError> {
        self.name = self.name.trim().to_string();
        if self.name.is_empty() {
            return Err(AppError::Validation("Session name must not be empty".into()));
        }
        if self.end_time <= self.start_time {
            return Err(AppError::Validation("End time must be after start time".into()));
        }
        if self.max_players < 1 {
            return Err(AppError::Validation("Max players must be at least 1".into()));
        }
        Ok(self)
    }
}

impl Session {
    pub fn new(input: SessionInput) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            name: input.name,
            start_time: input.start_time,
            end_time: input.end_time,
            arrive_by_time: input.arrive_by_time,
            cost_per_player: input.cost_per_player,
            max_players: input.max_players,
            instructions: input.instructions,
            created_at: Utc::now(),
        }
    }

    /// Full replace of the mutable fields; identity and `created_at` are kept.
    pub fn replace_with(&mut self, input: SessionInput) {
        self.name = input.name;
        self.start_time = input.start_time;
        self.end_time = input.end_time;
        self.arrive_by_time = input.arrive_by_time;
        self.cost_per_player = input.cost_per_player;
        self.max_players = input.max_players;
        self.instructions = input.instructions;
    }
}

/// A session as listed to clients: the row itself plus its bookings and derived counts.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct SessionDetails {
    #[serde(flatten)]
    pub session: Session,
    pub booking_count: i64,
    pub available_spots: i64,
    pub bookings: Vec<Booking>,
}

impl SessionDetails {
    pub fn new(session: Session, bookings: Vec<Booking>) -> Self {
        let booking_count = bookings.len() as i64;
        let available_spots = (i64::from(session.max_players) - booking_count).max(0);
        Self {
            session,
            booking_count,
            available_spots,
            bookings,
        }
    }

    pub fn is_full(&self) -> bool {
        self.available_spots == 0
    }
}
