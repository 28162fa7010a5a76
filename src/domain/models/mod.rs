pub mod booking;
pub mod price;
pub mod session;
