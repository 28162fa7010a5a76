use crate::domain::models::{
    booking::Booking,
    session::{Session, SessionDetails},
};
use std::collections::HashMap;

/// Groups bookings (already ordered by `created_at`) under their sessions, keeping the
/// session order. Bookings whose session is not in `sessions` are dropped.
pub fn attach_bookings(sessions: Vec<Session>, bookings: Vec<Booking>) -> Vec<SessionDetails> {
    let mut by_session: HashMap<String, Vec<Booking>> = HashMap::new();
    for booking in bookings {
        by_session.entry(booking.session_id.clone()).or_default().push(booking);
    }

    sessions
        .into_iter()
        .map(|session| {
            let bookings = by_session.remove(&session.id).unwrap_or_default();
            SessionDetails::new(session, bookings)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::session::{SessionInput, DEFAULT_COST_PER_PLAYER};
    use chrono::{Duration, Utc};

    fn session(name: &str, max_players: i32) -> Session {
        let start = Utc::now() + Duration::days(1);
        Session::new(SessionInput {
            name: name.into(),
            start_time: start,
            end_time: start + Duration::hours(1),
            arrive_by_time: start,
            cost_per_player: DEFAULT_COST_PER_PLAYER,
            max_players,
            instructions: String::new(),
        })
    }

    #[test]
    fn keeps_session_order_and_booking_order() {
        let first = session("first", 4);
        let second = session("second", 4);
        let b1 = Booking::new(second.id.clone(), "One", "one@x.com").unwrap();
        let b2 = Booking::new(first.id.clone(), "Two", "two@x.com").unwrap();
        let b3 = Booking::new(second.id.clone(), "Three", "three@x.com").unwrap();
        let stray = Booking::new("gone".into(), "Stray", "stray@x.com").unwrap();

        let listed = attach_bookings(
            vec![first.clone(), second.clone()],
            vec![b1.clone(), b2.clone(), stray, b3.clone()],
        );

        assert_eq!(listed.len(), 2);
        assert_eq!(listed[0].session.id, first.id);
        assert_eq!(listed[0].bookings, vec![b2]);
        assert_eq!(listed[1].session.id, second.id);
        assert_eq!(listed[1].bookings, vec![b1, b3]);
        assert_eq!(listed[1].booking_count, 2);
        assert_eq!(listed[1].available_spots, 2);
    }

    #[test]
    fn sessions_without_bookings_are_empty() {
        let listed = attach_bookings(vec![session("quiet", 16)], vec![]);
        assert_eq!(listed[0].booking_count, 0);
        assert_eq!(listed[0].available_spots, 16);
    }
}
