//! HTTP client for the booking API, plus a poller that keeps a live view of the
//! session list.

pub mod http_client;
pub mod watcher;

pub use http_client::{BookingClient, ClientError};
pub use watcher::{SessionWatcher, DEFAULT_POLL_INTERVAL, MIN_POLL_INTERVAL};
