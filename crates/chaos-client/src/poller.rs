//! Periodic traffic feed polling.

use crate::client::AdminClient;
use chaos_types::TrafficLog;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

/// Polls `/api/activity` on a fixed interval and publishes each response.
#[derive(Debug, Clone)]
pub struct TrafficFeedPoller {
    admin: AdminClient,
    interval: Duration,
    max_entries: Option<usize>,
}

impl TrafficFeedPoller {
    /// Interval and cap come from the client config.
    pub fn new(admin: AdminClient) -> Self {
        let interval = Duration::from_millis(admin.config().poll_interval_ms);
        let max_entries = admin.config().max_feed_entries;
        Self { admin, interval, max_entries }
    }

    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    /// Keep at most `max` entries of each response.
    pub fn with_max_entries(mut self, max: Option<usize>) -> Self {
        self.max_entries = max;
        self
    }

    /// Spawn the polling task. The first poll runs immediately.
    pub fn start(self) -> FeedHandle {
        let (feed_tx, feed_rx) = watch::channel(Vec::new());
        let (shutdown_tx, mut shutdown_rx) = watch::channel(false);

        let task = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(self.interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                tokio::select! {
                    _ = ticker.tick() => {}
                    _ = shutdown_rx.changed() => break,
                }

                // Shutdown also cancels an in-flight fetch.
                let result = tokio::select! {
                    result = self.admin.fetch_activity() => result,
                    _ = shutdown_rx.changed() => break,
                };
                match result {
                    Ok(mut logs) => {
                        if let Some(max) = self.max_entries {
                            logs.truncate(max);
                        }
                        feed_tx.send_replace(logs);
                    },
                    Err(e) => tracing::warn!("Traffic poll failed: {}", e),
                }
            }
            tracing::debug!("Traffic feed poller shutting down");
        });

        FeedHandle { feed_rx, shutdown_tx, task }
    }
}

/// Running poller. Polling stops on [`FeedHandle::stop`] or when the handle
/// is dropped.
#[derive(Debug)]
pub struct FeedHandle {
    feed_rx: watch::Receiver<Vec<TrafficLog>>,
    shutdown_tx: watch::Sender<bool>,
    task: JoinHandle<()>,
}

impl FeedHandle {
    /// Receiver notified whenever a poll replaces the feed.
    pub fn subscribe(&self) -> watch::Receiver<Vec<TrafficLog>> {
        self.feed_rx.clone()
    }

    /// Feed as of the last successful poll.
    pub fn latest(&self) -> Vec<TrafficLog> {
        self.feed_rx.borrow().clone()
    }

    pub fn stop(&self) {
        let _ = self.shutdown_tx.send(true);
    }

    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }
}

impl Drop for FeedHandle {
    fn drop(&mut self) {
        self.stop();
    }
}
