use crate::domain::models::{
    price::Price,
    session::{SessionInput, DEFAULT_COST_PER_PLAYER, DEFAULT_MAX_PLAYERS},
};
use crate::error::AppError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Body of `POST /bookings` and `POST /admin/bookings`.
#[derive(Deserialize, Serialize, Default, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct CreateBookingRequest {
    pub session_id: Option<String>,
    pub player_name: Option<String>,
    pub player_email: Option<String>,
}

pub struct BookingFields {
    pub session_id: String,
    pub player_name: String,
    pub player_email: String,
}

impl CreateBookingRequest {
    pub fn into_fields(self) -> Result<BookingFields, AppError> {
        match (present(self.session_id), present(self.player_name), present(self.player_email)) {
            (Some(session_id), Some(player_name), Some(player_email)) => Ok(BookingFields {
                session_id,
                player_name,
                player_email,
            }),
            _ => Err(AppError::Validation(
                "Missing required fields: sessionId, playerName, playerEmail".into(),
            )),
        }
    }
}

#[derive(Deserialize, Serialize, Default, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct CancelBookingRequest {
    pub session_id: Option<String>,
    pub player_email: Option<String>,
}

impl CancelBookingRequest {
    /// Returns `(session_id, player_email)`.
    pub fn into_fields(self) -> Result<(String, String), AppError> {
        match (present(self.session_id), present(self.player_email)) {
            (Some(session_id), Some(player_email)) => Ok((session_id, player_email)),
            _ => Err(AppError::Validation("Missing required fields: sessionId, playerEmail".into())),
        }
    }
}

/// Body of session create and update; both are full writes.
#[derive(Deserialize, Serialize, Default, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct UpsertSessionRequest {
    pub name: Option<String>,
    pub start_time: Option<DateTime<Utc>>,
    pub end_time: Option<DateTime<Utc>>,
    pub arrive_by_time: Option<DateTime<Utc>>,
    pub cost_per_player: Option<Price>,
    pub max_players: Option<i32>,
    pub instructions: Option<String>,
}

impl UpsertSessionRequest {
    pub fn into_input(self) -> Result<SessionInput, AppError> {
        let (Some(name), Some(start_time), Some(end_time), Some(arrive_by_time)) =
            (present(self.name), self.start_time, self.end_time, self.arrive_by_time)
        else {
            return Err(AppError::Validation(
                "Missing required fields: name, startTime, endTime, arriveByTime".into(),
            ));
        };

        SessionInput {
            name,
            start_time,
            end_time,
            arrive_by_time,
            cost_per_player: self.cost_per_player.unwrap_or(DEFAULT_COST_PER_PLAYER),
            max_players: self.max_players.unwrap_or(DEFAULT_MAX_PLAYERS),
            instructions: self.instructions.unwrap_or_default(),
        }
        .validate()
    }
}

fn present(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn blank_booking_fields_count_as_missing() {
        let req: CreateBookingRequest = serde_json::from_value(json!({
            "sessionId": "abc",
            "playerName": "  ",
            "playerEmail": "a@x.com"
        }))
        .unwrap();
        let err = req.into_fields().err().unwrap();
        assert_eq!(err.to_string(), "Invalid input: Missing required fields: sessionId, playerName, playerEmail");
    }

    #[test]
    fn session_defaults_apply() {
        let req: UpsertSessionRequest = serde_json::from_value(json!({
            "name": "Club Night",
            "startTime": "2030-01-10T19:00:00Z",
            "endTime": "2030-01-10T21:00:00Z",
            "arriveByTime": "2030-01-10T18:45:00+00:00"
        }))
        .unwrap();
        let input = req.into_input().unwrap();
        assert_eq!(input.cost_per_player, DEFAULT_COST_PER_PLAYER);
        assert_eq!(input.max_players, DEFAULT_MAX_PLAYERS);
        assert_eq!(input.instructions, "");
    }

    #[test]
    fn session_offsets_are_converted_to_utc() {
        let req: UpsertSessionRequest = serde_json::from_value(json!({
            "name": "Club Night",
            "startTime": "2030-06-10T19:00:00+01:00",
            "endTime": "2030-06-10T21:00:00+01:00",
            "arriveByTime": "2030-06-10T18:45:00+01:00",
            "costPerPlayer": "5.50",
            "maxPlayers": 12
        }))
        .unwrap();
        let input = req.into_input().unwrap();
        assert_eq!(input.start_time.to_rfc3339(), "2030-06-10T18:00:00+00:00");
        assert_eq!(input.cost_per_player.minor_units(), 550);
        assert_eq!(input.max_players, 12);
    }

    #[test]
    fn session_missing_time_is_rejected() {
        let req = UpsertSessionRequest {
            name: Some("Club Night".into()),
            ..Default::default()
        };
        assert!(matches!(req.into_input(), Err(AppError::Validation(msg)) if msg.starts_with("Missing required fields")));
    }
}
