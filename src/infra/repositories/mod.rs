pub mod sqlite_booking_repo;
pub mod sqlite_session_repo;

pub mod postgres_booking_repo;
pub mod postgres_session_repo;
