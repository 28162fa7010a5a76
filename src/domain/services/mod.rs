pub mod session_listing;
