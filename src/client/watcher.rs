use super::http_client::BookingClient;
use crate::domain::models::session::SessionDetails;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{watch, Notify};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, warn};

/// How often the public booking page refreshes availability.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(3);
/// Shorter periods, including zero, are raised to this.
pub const MIN_POLL_INTERVAL: Duration = Duration::from_millis(100);

type Snapshot = Option<Vec<SessionDetails>>;

/// Polls the upcoming-session list in a background task and publishes each result.
///
/// Polls run one after another, so the latest published snapshot is always the most
/// recent successful fetch. A failed poll keeps the previous snapshot. The task is
/// aborted when the watcher is dropped.
pub struct SessionWatcher {
    receiver: watch::Receiver<Snapshot>,
    refresh: Arc<Notify>,
    task: JoinHandle<()>,
}

impl SessionWatcher {
    pub fn spawn(client: BookingClient, period: Duration) -> Self {
        let period = period.max(MIN_POLL_INTERVAL);
        let (sender, receiver) = watch::channel(None);
        let refresh = Arc::new(Notify::new());
        let task = tokio::spawn(poll_loop(client, period, sender, refresh.clone()));

        Self { receiver, refresh, task }
    }

    /// A receiver that sees every future snapshot. It reports closed once the watcher stops.
    pub fn subscribe(&self) -> watch::Receiver<Snapshot> {
        self.receiver.clone()
    }

    pub fn latest(&self) -> Snapshot {
        self.receiver.borrow().clone()
    }

    /// Waits for the next snapshot. Returns `None` if polling has stopped.
    pub async fn next_snapshot(&mut self) -> Option<Vec<SessionDetails>> {
        loop {
            self.receiver.changed().await.ok()?;
            if let Some(sessions) = self.receiver.borrow_and_update().clone() {
                return Some(sessions);
            }
        }
    }

    /// Fetches now instead of waiting for the next tick, e.g. right after a mutation.
    pub fn refresh(&self) {
        self.refresh.notify_one();
    }

    pub fn is_running(&self) -> bool {
        !self.task.is_finished()
    }

    /// Stops polling. Dropping the watcher has the same effect.
    pub fn stop(self) {}
}

impl Drop for SessionWatcher {
    fn drop(&mut self) {
        self.task.abort();
    }
}

async fn poll_loop(
    client: BookingClient,
    period: Duration,
    sender: watch::Sender<Snapshot>,
    refresh: Arc<Notify>,
) {
    let mut ticker = tokio::time::interval(period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            _ = ticker.tick() => {}
            _ = refresh.notified() => ticker.reset(),
        }

        match client.list_sessions().await {
            Ok(sessions) => {
                debug!(count = sessions.len(), "Fetched session snapshot");
                sender.send_replace(Some(sessions));
            }
            Err(e) => warn!("Session poll failed: {}", e),
        }
    }
}
